mod aggregator;
mod clusters;

pub use aggregator::{
    CategoryAggregate, CategorySeries, CategoryShare, StackLayer, StackedSeries, aggregate,
    cumulative_sum,
};
pub use clusters::{aggregate_by_cluster, rows_by_cluster};
