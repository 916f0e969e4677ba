use crate::categories::{CategoryAggregate, aggregate};
use crate::core::{CategoryRow, PoolCluster, cluster_of};
use crate::error::{TransformError, TransformResult};

/// Relabels pool-address rows with their cluster name.
pub fn rows_by_cluster<K: Clone>(rows: &[CategoryRow<K>]) -> TransformResult<Vec<CategoryRow<K>>> {
    rows.iter()
        .map(|row| {
            let cluster = cluster_of(&row.category)
                .ok_or_else(|| TransformError::UnknownCategory(row.category.clone()))?;
            Ok(CategoryRow::new(cluster.to_string(), row.index_key.clone(), row.value))
        })
        .collect()
}

/// Pool-address rows grouped over every cluster in canonical order.
pub fn aggregate_by_cluster<K: Ord + Clone>(
    rows: &[CategoryRow<K>],
) -> TransformResult<CategoryAggregate<K>> {
    aggregate(&rows_by_cluster(rows)?, &PoolCluster::universe())
}
