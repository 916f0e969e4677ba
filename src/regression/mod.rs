mod bounded_ratio;

pub use bounded_ratio::{BoundedRatioRegressor, EffectSummary, LogitFit};
