//! Statistical transforms behind the LVR dashboard: a logit-linked proportion
//! regression, mergeable streaming moments, histogram tail consolidation,
//! percentile band alignment and category grouping, plus the job layer that
//! runs them from JSON.

pub mod bands;
pub mod categories;
pub mod core;
pub mod error;
pub mod estimators;
pub mod histogram;
pub mod logging;
pub mod regression;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{TransformError, TransformResult};
pub use logging::init_logging;
