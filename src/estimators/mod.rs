mod activity;
mod estimator;
mod moments;
mod quartiles;
mod ratios;

pub use activity::{ActivityTally, observations_by_markout};
pub use estimator::Estimator;
pub use moments::{CentralMoments, MomentState};
pub use quartiles::{Quartiles, percentile};
pub use ratios::{LvrTotals, MarkoutRatio, RATIO_CAP_PERCENT, observations_by_ratio};
