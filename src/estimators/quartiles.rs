use crate::core::PercentileTriple;
use crate::error::{TransformError, TransformResult};
use serde::{Deserialize, Serialize};

/// Percentile of an ascending slice by linear interpolation between the two
/// nearest ranks (`rank = (n - 1) * q`).
///
/// Returns `None` for an empty slice or `q` outside `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (sorted.len() - 1) as f64 * q;
    let k = rank.floor() as usize;
    let d = rank - k as f64;

    if k + 1 >= sorted.len() {
        sorted.last().copied()
    } else {
        Some((1.0 - d) * sorted[k] + d * sorted[k + 1])
    }
}

/// Five-number summary of a sample (box plot / quartile chart input).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub count: usize,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Quartiles {
    /// Non-finite values are dropped before ranking.
    pub fn from_values(values: &[f64]) -> TransformResult<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Err(TransformError::EmptyInput);
        }
        sorted.sort_by(f64::total_cmp);

        let at = |q: f64| percentile(&sorted, q).ok_or(TransformError::EmptyInput);
        Ok(Self {
            count: sorted.len(),
            min: sorted[0],
            p25: at(0.25)?,
            median: at(0.5)?,
            p75: at(0.75)?,
            max: sorted[sorted.len() - 1],
        })
    }

    #[inline]
    pub fn interquartile_range(&self) -> f64 {
        self.p75 - self.p25
    }

    pub fn as_triple<T>(&self, index_key: T) -> PercentileTriple<T> {
        PercentileTriple::new(index_key, self.p25, self.median, self.p75)
    }
}
