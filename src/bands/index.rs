//! Canonical, fully populated axes that percentile series are stitched onto.

use crate::error::{TransformError, TransformResult};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Blocks per interval in the precomputed LVR files (about one day).
pub const BLOCKS_PER_INTERVAL: u64 = 7_200;
/// First proof-of-stake block; the study period starts here.
pub const MERGE_BLOCK: u64 = 15_537_393;

/// Every calendar day from `start` to `end`, inclusive.
pub fn calendar_days(start: NaiveDate, end: NaiveDate) -> TransformResult<Vec<NaiveDate>> {
    if end < start {
        return Err(TransformError::InvalidParameter(format!(
            "calendar range ends ({end}) before it starts ({start})"
        )));
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

/// First day of every month touched by `start..=end`.
pub fn calendar_months(start: NaiveDate, end: NaiveDate) -> TransformResult<Vec<NaiveDate>> {
    if end < start {
        return Err(TransformError::InvalidParameter(format!(
            "calendar range ends ({end}) before it starts ({start})"
        )));
    }

    let mut out = Vec::new();
    let mut cur = start.with_day(1);
    while let Some(month) = cur {
        if month > end {
            break;
        }
        out.push(month);
        cur = month.checked_add_months(Months::new(1));
    }
    Ok(out)
}

/// Half-open block span `[start, end)`, displayed as `"start-end"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl Display for BlockRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Splits `[start_block, end_block)` into consecutive intervals of
/// `blocks_per_interval`; the last one is truncated at `end_block`.
pub fn block_intervals(
    start_block: u64,
    end_block: u64,
    blocks_per_interval: u64,
) -> TransformResult<Vec<BlockRange>> {
    if blocks_per_interval == 0 {
        return Err(TransformError::InvalidParameter(
            "blocks_per_interval must be > 0".into(),
        ));
    }
    if end_block < start_block {
        return Err(TransformError::InvalidParameter(format!(
            "block range ends ({end_block}) before it starts ({start_block})"
        )));
    }

    let mut out = Vec::new();
    let mut start = start_block;
    while start < end_block {
        let end = start.saturating_add(blocks_per_interval).min(end_block);
        out.push(BlockRange { start, end });
        start = end;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_are_inclusive() {
        let days = calendar_days(date(2024, 2, 27), date(2024, 3, 1)).unwrap();
        assert_eq!(
            days,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
        assert_eq!(calendar_days(date(2024, 1, 1), date(2024, 1, 1)).unwrap().len(), 1);
        assert!(calendar_days(date(2024, 1, 2), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn months_start_on_the_first() {
        let months = calendar_months(date(2022, 11, 15), date(2023, 2, 1)).unwrap();
        assert_eq!(
            months,
            vec![date(2022, 11, 1), date(2022, 12, 1), date(2023, 1, 1), date(2023, 2, 1)]
        );
        assert!(calendar_months(date(2023, 2, 1), date(2022, 2, 1)).is_err());
    }

    #[test]
    fn block_intervals_truncate_last() {
        let r = block_intervals(100, 350, 100).unwrap();
        assert_eq!(
            r,
            vec![
                BlockRange { start: 100, end: 200 },
                BlockRange { start: 200, end: 300 },
                BlockRange { start: 300, end: 350 },
            ]
        );
        assert_eq!(r[2].to_string(), "300-350");
        assert!(block_intervals(5, 5, 10).unwrap().is_empty());
    }

    #[test]
    fn block_intervals_validate_arguments() {
        assert!(block_intervals(0, 10, 0).is_err());
        assert!(block_intervals(10, 0, 5).is_err());
    }

    #[test]
    fn one_day_of_blocks_after_the_merge() {
        let end = MERGE_BLOCK + 3 * BLOCKS_PER_INTERVAL;
        let r = block_intervals(MERGE_BLOCK, end, BLOCKS_PER_INTERVAL).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r[0].start, MERGE_BLOCK);
    }
}
