use crate::core::Bucket;
use crate::error::{TransformError, TransformResult};
use tracing::debug;

/// Merges every bucket starting at or above `cutoff` into one open-ended
/// `"{cutoff}+"` bucket appended after the untouched lower buckets.
///
/// Total count is preserved. Consolidating the output again with the same
/// cutoff returns it unchanged. No overflow bucket is emitted when nothing
/// starts at or above the cutoff.
pub fn consolidate(buckets: &[Bucket], cutoff: f64) -> TransformResult<Vec<Bucket>> {
    if !cutoff.is_finite() {
        return Err(TransformError::InvalidParameter(format!(
            "cutoff must be finite, got {cutoff}"
        )));
    }

    let mut out = Vec::with_capacity(buckets.len());
    let mut overflow: Option<(u64, usize)> = None;

    for b in buckets {
        if b.range_start < cutoff {
            out.push(b.clone());
        } else {
            let (count, merged) = overflow.get_or_insert((0, 0));
            *count = count.saturating_add(b.count);
            *merged += 1;
        }
    }

    if let Some((count, merged)) = overflow {
        debug!(cutoff, merged, count, "consolidated tail buckets");
        out.push(Bucket::new(cutoff, None, count, format!("{cutoff}+")));
    }

    Ok(out)
}
