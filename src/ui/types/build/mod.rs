mod error;
mod inputs;
mod transforms;

pub use error::BuildError;
pub use inputs::{BandInput, CategoryInput};
pub use transforms::{
    CategoryReport, Evaluated, RegressionReport, band, categories, histogram, moments, read_input,
    read_job, regress, run_transform,
};
