use crate::core::{Bucket, CategoryRow, Observation, PercentileTriple};
use crate::utils::math::inverse_logit;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Proportions following `inverse_logit(alpha + beta * x)` at the markout
/// offsets `-2.0..=2.0` in half-second steps, with optional jitter on the
/// logit scale.
pub fn logit_observations(alpha: f64, beta: f64, jitter: f64, seed: u64) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(seed);
    (-4..=4)
        .map(|i| {
            let x = i as f64 * 0.5;
            let noise = if jitter > 0.0 {
                rng.random_range(-jitter..jitter)
            } else {
                0.0
            };
            Observation::new(x, inverse_logit(alpha + beta * x + noise))
        })
        .collect()
}

/// Heavy-tailed positive values shaped like per-block LVR in dollars.
pub fn lvr_values(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let u: f64 = rng.random_range(-4.0..4.0);
            u.exp() * 25.0
        })
        .collect()
}

pub fn sample_buckets() -> Vec<Bucket> {
    vec![
        Bucket::new(0.0, Some(10.0), 120, "0-10"),
        Bucket::new(10.0, Some(100.0), 64, "10-100"),
        Bucket::new(100.0, Some(1000.0), 17, "100-1000"),
        Bucket::new(1000.0, Some(10000.0), 6, "1000-10000"),
        Bucket::new(10000.0, None, 2, "10000+"),
    ]
}

/// Daily quartiles of `lvr_values`, one triple per day, keyed by day number.
pub fn daily_triples(days: usize, per_day: usize, seed: u64) -> Vec<PercentileTriple<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..days)
        .map(|d| {
            let mut v = lvr_values(per_day, rng.random());
            v.sort_by(f64::total_cmp);
            let q = |p: f64| crate::estimators::percentile(&v, p).unwrap_or(0.0);
            PercentileTriple::new(d as u32, q(0.25), q(0.5), q(0.75))
        })
        .collect()
}

/// Random rows over `categories`, keys drawn from `0..keys`.
pub fn random_rows(categories: &[&str], keys: u32, n: usize, seed: u64) -> Vec<CategoryRow<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let c = categories[rng.random_range(0..categories.len())];
            CategoryRow::new(c, rng.random_range(0..keys), rng.random_range(0.0..100.0))
        })
        .collect()
}
