use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// One `(covariate, proportion)` pair fed to the bounded-ratio regression.
///
/// The covariate is any real number (typically a markout offset in seconds);
/// the proportion is clamped into `(0, 1)` at fit time, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub covariate: f64,
    pub proportion: f64,
}

impl Observation {
    #[inline]
    pub fn new(covariate: f64, proportion: f64) -> Self {
        Self {
            covariate,
            proportion,
        }
    }
}

/// Histogram bucket. `range_end == None` marks the open-ended top bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub range_start: f64,
    pub range_end: Option<f64>,
    pub count: u64,
    pub label: String,
}

impl Bucket {
    pub fn new<L: Into<String>>(
        range_start: f64,
        range_end: Option<f64>,
        count: u64,
        label: L,
    ) -> Self {
        Self {
            range_start,
            range_end,
            count,
            label: label.into(),
        }
    }

    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.range_end.is_none()
    }

    /// Half-open membership test: `[range_start, range_end)`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.range_start && self.range_end.is_none_or(|end| value < end)
    }
}

/// Lower quartile, median and upper quartile for one window.
///
/// `p25 <= median <= p75` is expected but not enforced; estimated
/// percentiles may cross slightly. See [`PercentileTriple::is_ordered`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileTriple<T> {
    pub index_key: T,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
}

impl<T> PercentileTriple<T> {
    pub fn new(index_key: T, p25: f64, median: f64, p75: f64) -> Self {
        Self {
            index_key,
            p25,
            median,
            p75,
        }
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.p25 <= self.median && self.median <= self.p75
    }
}

/// A raw per-entity value tagged with its category and position on the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow<K> {
    pub category: String,
    pub index_key: K,
    pub value: f64,
}

impl<K> CategoryRow<K> {
    pub fn new<C: Into<String>>(category: C, index_key: K, value: f64) -> Self {
        Self {
            category: category.into(),
            index_key,
            value,
        }
    }
}

/// Axis key whose concrete type is only known at runtime (JSON jobs).
///
/// Block numbers arrive as integers, dates and block-range labels as text.
/// Integers order before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexKey {
    Integer(i64),
    Text(String),
}

impl Display for IndexKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            IndexKey::Integer(n) => write!(f, "{n}"),
            IndexKey::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for IndexKey {
    fn from(n: i64) -> Self {
        IndexKey::Integer(n)
    }
}

impl From<&str> for IndexKey {
    fn from(s: &str) -> Self {
        IndexKey::Text(s.to_string())
    }
}
