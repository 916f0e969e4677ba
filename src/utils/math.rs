/// Lower bound applied to proportions before the logit transform.
pub const PROPORTION_FLOOR: f64 = 0.0001;
/// Upper bound applied to proportions before the logit transform.
pub const PROPORTION_CEIL: f64 = 0.9999;

#[inline]
pub fn clamp_proportion(p: f64) -> f64 {
    p.clamp(PROPORTION_FLOOR, PROPORTION_CEIL)
}

/// `ln(p / (1 - p))`. Callers clamp first; `p` of 0 or 1 gives an infinity.
#[inline]
pub fn logit(p: f64) -> f64 {
    libm::log(p / (1.0 - p))
}

/// Logistic function, the inverse of [`logit`].
#[inline]
pub fn inverse_logit(z: f64) -> f64 {
    1.0 / (1.0 + libm::exp(-z))
}

#[inline]
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (n, sum) = values.fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
    (n > 0).then(|| sum / n as f64)
}
