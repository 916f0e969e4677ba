mod consolidator;
mod layout;

pub use consolidator::consolidate;
pub use layout::{BucketLayout, LVR_DOLLAR_EDGES, reorder_by_labels};
