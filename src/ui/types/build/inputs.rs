//! Dataset shapes accepted by each transform kind.

use crate::core::{CategoryRow, IndexKey, PercentileTriple};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BandInput {
    pub series: Vec<PercentileTriple<IndexKey>>,
    pub index: Vec<IndexKey>,
}

/// `categories` may be omitted only when grouping by pool cluster.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    pub rows: Vec<CategoryRow<IndexKey>>,
}
