//! Monetary fields arrive in integer cents; charts want dollars.

pub const CENTS_PER_DOLLAR: f64 = 100.0;

#[inline]
pub fn cents_to_dollars(cents: u64) -> f64 {
    cents as f64 / CENTS_PER_DOLLAR
}

#[inline]
pub fn signed_cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / CENTS_PER_DOLLAR
}

pub fn all_cents_to_dollars(cents: &[u64]) -> Vec<f64> {
    cents.iter().copied().map(cents_to_dollars).collect()
}
