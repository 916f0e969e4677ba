pub mod markout;
pub mod pools;
pub mod records;
pub mod units;

pub use markout::MarkoutTime;
pub use pools::{Pool, PoolCluster, cluster_of, find_pool, pool_name, pools};
pub use records::{Bucket, CategoryRow, IndexKey, Observation, PercentileTriple};
pub use units::{all_cents_to_dollars, cents_to_dollars, signed_cents_to_dollars};
