use crate::core::{MarkoutTime, Observation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Ratios are reported in percent and never exceed this.
pub const RATIO_CAP_PERCENT: f64 = 100.0;

/// Realized (`brontes`) and per-markout theoretical LVR, in cents.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LvrTotals {
    pub realized: u64,
    pub theoretical: BTreeMap<MarkoutTime, u64>,
}

/// Realized over theoretical LVR for one markout offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkoutRatio {
    pub markout: MarkoutTime,
    /// Percent, capped at 100.
    pub ratio: f64,
    pub realized_lvr_cents: u64,
    pub theoretical_lvr_cents: u64,
}

impl LvrTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one interval's LVR. Zero amounts are skipped so markouts with no
    /// activity do not appear.
    pub fn record(&mut self, markout: MarkoutTime, lvr_cents: u64) {
        if lvr_cents == 0 {
            return;
        }
        match markout {
            MarkoutTime::Brontes => self.realized = self.realized.saturating_add(lvr_cents),
            m => {
                let total = self.theoretical.entry(m).or_insert(0);
                *total = total.saturating_add(lvr_cents);
            }
        }
    }

    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.realized = self.realized.saturating_add(other.realized);
        for (m, cents) in other.theoretical {
            let total = self.theoretical.entry(m).or_insert(0);
            *total = total.saturating_add(cents);
        }
        self
    }

    /// One ratio per markout with theoretical LVR, ascending by offset.
    /// Empty when nothing was realized.
    pub fn ratios(&self) -> Vec<MarkoutRatio> {
        if self.realized == 0 {
            debug!("no realized LVR, skipping ratios");
            return vec![];
        }

        self.theoretical
            .iter()
            .filter(|&(_, &theoretical)| theoretical > 0)
            .map(|(&markout, &theoretical)| {
                let ratio = self.realized as f64 / theoretical as f64 * 100.0;
                MarkoutRatio {
                    markout,
                    ratio: ratio.min(RATIO_CAP_PERCENT),
                    realized_lvr_cents: self.realized,
                    theoretical_lvr_cents: theoretical,
                }
            })
            .collect()
    }
}

impl MarkoutRatio {
    /// Ratio as a share in `[0, 1]`.
    #[inline]
    pub fn proportion(&self) -> f64 {
        self.ratio / 100.0
    }

    /// `None` for `brontes`, which has no offset.
    pub fn to_observation(&self) -> Option<Observation> {
        self.markout
            .as_seconds()
            .map(|secs| Observation::new(secs, self.proportion()))
    }
}

/// Regression observations for every ratio with a covariate.
pub fn observations_by_ratio<'a, I>(ratios: I) -> Vec<Observation>
where
    I: IntoIterator<Item = &'a MarkoutRatio>,
{
    ratios
        .into_iter()
        .filter_map(MarkoutRatio::to_observation)
        .collect()
}
