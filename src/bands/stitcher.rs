use crate::core::PercentileTriple;
use crate::error::{TransformError, TransformResult};
use serde::Serialize;
use tracing::debug;

/// One stitched window: the index slot it landed in, the percentiles, and
/// whether `p25 <= median <= p75` holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandPoint<K, T> {
    pub key: K,
    pub triple: PercentileTriple<T>,
    pub valid: bool,
}

/// Closed polygon for a filled band: upper bound left to right, then lower
/// bound right to left. `keys` and `values` always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandOutline<K> {
    pub keys: Vec<K>,
    pub values: Vec<f64>,
}

impl<K> BandOutline<K> {
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchedBand<K, T> {
    pub points: Vec<BandPoint<K, T>>,
    pub outline: BandOutline<K>,
}

impl<K: Clone, T> StitchedBand<K, T> {
    pub fn median_line(&self) -> Vec<(K, f64)> {
        self.points
            .iter()
            .map(|p| (p.key.clone(), p.triple.median))
            .collect()
    }

    pub fn invalid_points(&self) -> usize {
        self.points.iter().filter(|p| !p.valid).count()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.invalid_points() == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Right-aligns `series` onto `index`: the last window lands on the last key
/// and the leading `index.len() - series.len()` keys are dropped.
///
/// Fails with [`TransformError::AlignmentError`] when there are more windows
/// than keys. Crossed percentiles are flagged per point, never rejected.
pub fn stitch<K: Clone, T: Clone>(
    series: &[PercentileTriple<T>],
    index: &[K],
) -> TransformResult<StitchedBand<K, T>> {
    if series.len() > index.len() {
        return Err(TransformError::AlignmentError {
            series: series.len(),
            index: index.len(),
        });
    }

    let skipped = index.len() - series.len();
    let keys = &index[skipped..];

    let points: Vec<BandPoint<K, T>> = keys
        .iter()
        .zip(series)
        .map(|(key, triple)| BandPoint {
            key: key.clone(),
            triple: triple.clone(),
            valid: triple.is_ordered(),
        })
        .collect();

    let outline = BandOutline {
        keys: keys.iter().chain(keys.iter().rev()).cloned().collect(),
        values: series
            .iter()
            .map(|t| t.p75)
            .chain(series.iter().rev().map(|t| t.p25))
            .collect(),
    };

    let band = StitchedBand { points, outline };
    debug!(
        points = band.len(),
        skipped,
        crossed = band.invalid_points(),
        "stitched percentile band"
    );
    Ok(band)
}
