use crate::core::Bucket;
use crate::error::{TransformError, TransformResult};

/// Bucket edges in dollars used by the LVR distribution charts.
pub const LVR_DOLLAR_EDGES: [f64; 8] = [
    0.01, 10.0, 100.0, 500.0, 1_000.0, 3_000.0, 10_000.0, 30_000.0,
];

/// Ascending edges; bucket `i` spans `[edges[i], edges[i + 1])` and the last
/// one is open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketLayout {
    edges: Vec<f64>,
}

impl BucketLayout {
    pub fn new(edges: Vec<f64>) -> TransformResult<Self> {
        if edges.is_empty() {
            return Err(TransformError::InvalidParameter(
                "bucket layout needs at least one edge".into(),
            ));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(TransformError::InvalidParameter(
                "bucket edges must be finite".into(),
            ));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TransformError::InvalidParameter(
                "bucket edges must be strictly increasing".into(),
            ));
        }
        Ok(Self { edges })
    }

    pub fn lvr_dollars() -> Self {
        Self {
            edges: LVR_DOLLAR_EDGES.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.edges.len())
            .map(|i| match self.edges.get(i + 1) {
                Some(&end) => format!("{}-{}", dollars(self.edges[i]), dollars(end)),
                None => format!("{}+", dollars(self.edges[i])),
            })
            .collect()
    }

    /// Labelled buckets from one count per bucket.
    pub fn buckets(&self, counts: &[u64]) -> TransformResult<Vec<Bucket>> {
        if counts.len() != self.edges.len() {
            return Err(TransformError::InvalidParameter(format!(
                "expected {} bucket counts, got {}",
                self.edges.len(),
                counts.len()
            )));
        }

        Ok(self
            .labels()
            .into_iter()
            .zip(counts)
            .enumerate()
            .map(|(i, (label, &count))| {
                Bucket::new(self.edges[i], self.edges.get(i + 1).copied(), count, label)
            })
            .collect())
    }

    /// Counts raw values into the layout. Values below the first edge (zero
    /// LVR blocks) and non-finite values are not counted.
    pub fn bucketize(&self, values: &[f64]) -> Vec<Bucket> {
        let mut counts = vec![0u64; self.edges.len()];
        for &v in values {
            if !v.is_finite() || v < self.edges[0] {
                continue;
            }
            let idx = self.edges.partition_point(|&e| e <= v) - 1;
            counts[idx] += 1;
        }
        // Lengths match by construction.
        self.buckets(&counts).unwrap_or_default()
    }
}

fn dollars(x: f64) -> String {
    if x >= 1_000.0 && x % 1_000.0 == 0.0 {
        format!("${}K", x / 1_000.0)
    } else {
        format!("${x}")
    }
}

/// Orders buckets by a canonical label list; buckets with labels not in
/// `order` keep their relative order after the listed ones.
pub fn reorder_by_labels(buckets: &[Bucket], order: &[&str]) -> Vec<Bucket> {
    let rank = |b: &Bucket| {
        order
            .iter()
            .position(|l| *l == b.label)
            .unwrap_or(order.len())
    };
    let mut out = buckets.to_vec();
    out.sort_by_key(rank);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::consolidate;

    #[test]
    fn lvr_labels() {
        let labels = BucketLayout::lvr_dollars().labels();
        assert_eq!(
            labels,
            vec![
                "$0.01-$10",
                "$10-$100",
                "$100-$500",
                "$500-$1K",
                "$1K-$3K",
                "$3K-$10K",
                "$10K-$30K",
                "$30K+"
            ]
        );
    }

    #[test]
    fn rejects_bad_edges() {
        assert!(BucketLayout::new(vec![]).is_err());
        assert!(BucketLayout::new(vec![1.0, 1.0]).is_err());
        assert!(BucketLayout::new(vec![2.0, 1.0]).is_err());
        assert!(BucketLayout::new(vec![0.0, f64::INFINITY]).is_err());
        assert!(BucketLayout::new(vec![0.0, 5.0]).is_ok());
    }

    #[test]
    fn buckets_require_matching_counts() {
        let layout = BucketLayout::new(vec![0.0, 10.0]).unwrap();
        assert!(layout.buckets(&[1]).is_err());
        let b = layout.buckets(&[1, 2]).unwrap();
        assert_eq!(b[0], Bucket::new(0.0, Some(10.0), 1, "$0-$10"));
        assert_eq!(b[1], Bucket::new(10.0, None, 2, "$10+"));
    }

    #[test]
    fn bucketize_counts_half_open_ranges_and_skips_zero() {
        let layout = BucketLayout::lvr_dollars();
        let b = layout.bucketize(&[0.0, 0.005, 0.01, 9.99, 10.0, 750.0, 45_000.0, f64::NAN]);
        let counts: Vec<u64> = b.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn consolidated_layout_can_be_reordered() {
        let layout = BucketLayout::lvr_dollars();
        let buckets = layout.buckets(&[5, 4, 3, 2, 1, 1, 1, 1]).unwrap();
        let merged = consolidate(&buckets, 1_000.0).unwrap();
        assert_eq!(merged.last().unwrap().label, "1000+");

        let order = ["1000+", "$0.01-$10"];
        let sorted = reorder_by_labels(&merged, &order);
        assert_eq!(sorted[0].label, "1000+");
        assert_eq!(sorted[1].label, "$0.01-$10");
        assert_eq!(sorted[2].label, "$10-$100");
        assert_eq!(sorted.len(), merged.len());
    }
}
