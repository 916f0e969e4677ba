use crate::core::{MarkoutTime, Observation};
use crate::estimators::Estimator;
use serde::{Deserialize, Serialize};

/// Counts blocks and the blocks with non-zero LVR for one pool/markout slice.
///
/// The resulting proportion is what the bounded-ratio regression models
/// against the markout offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTally {
    pub total_blocks: u64,
    pub non_zero_blocks: u64,
}

impl ActivityTally {
    pub fn new(total_blocks: u64, non_zero_blocks: u64) -> Self {
        Self {
            total_blocks,
            non_zero_blocks: non_zero_blocks.min(total_blocks),
        }
    }

    #[inline]
    pub fn record(&mut self, lvr: f64) {
        self.add(lvr);
    }

    /// Share of blocks with non-zero LVR; 0 when nothing has been recorded.
    pub fn proportion(&self) -> f64 {
        if self.total_blocks > 0 {
            self.non_zero_blocks as f64 / self.total_blocks as f64
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            total_blocks: self.total_blocks.saturating_add(other.total_blocks),
            non_zero_blocks: self.non_zero_blocks.saturating_add(other.non_zero_blocks),
        }
    }

    /// `None` for the observed (`brontes`) series, which has no offset, and
    /// for empty tallies.
    pub fn to_observation(&self, markout: MarkoutTime) -> Option<Observation> {
        if self.total_blocks == 0 {
            return None;
        }
        markout
            .as_seconds()
            .map(|secs| Observation::new(secs, self.proportion()))
    }
}

impl Estimator for ActivityTally {
    fn add(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.total_blocks = self.total_blocks.saturating_add(1);
        if v != 0.0 {
            self.non_zero_blocks = self.non_zero_blocks.saturating_add(1);
        }
    }

    fn estimation(&self) -> f64 {
        if self.total_blocks > 0 {
            self.proportion()
        } else {
            f64::NAN
        }
    }
}

/// Regression observations for every markout slice that has a covariate.
pub fn observations_by_markout<'a, I>(tallies: I) -> Vec<Observation>
where
    I: IntoIterator<Item = &'a (MarkoutTime, ActivityTally)>,
{
    tallies
        .into_iter()
        .filter_map(|(m, t)| t.to_observation(*m))
        .collect()
}
