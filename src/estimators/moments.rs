//! Population central moments in a single pass.
//!
//! [`MomentState`] holds the sufficient statistics `(n, mean, M2, M3, M4)`
//! and is updated with Pébay's closed-form recurrences, so no observation is
//! ever revisited and long streams do not suffer the cancellation of naive
//! sum-of-powers formulas. States built on disjoint partitions combine with
//! [`MomentState::merge`].

use crate::error::{TransformError, TransformResult};
use crate::estimators::Estimator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentState {
    count: u64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

/// Finalized population moments. `excess_kurtosis` is 0 for a normal sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralMoments {
    pub count: u64,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
}

impl MomentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Streams every value of `values` through [`observe`](Self::observe).
    pub fn from_values(values: &[f64]) -> Self {
        values.iter().fold(Self::new(), |s, &v| s.observe(v))
    }

    /// Two-pass computation: mean first, then the central sums.
    pub fn exact(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self::new();
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let (m2, m3, m4) = finite.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &x| {
            let d = x - mean;
            let d2 = d * d;
            (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
        });

        Self {
            count: finite.len() as u64,
            mean,
            m2,
            m3,
            m4,
        }
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the state after seeing `value`. Non-finite values leave the
    /// state unchanged.
    #[must_use]
    pub fn observe(self, value: f64) -> Self {
        if !value.is_finite() {
            return self;
        }

        let n1 = self.count as f64;
        let count = self.count + 1;
        let n = count as f64;

        let delta = value - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * n1;

        // M4 and M3 read the previous M2/M3, so they are computed first.
        let m4 = self.m4 + term1 * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        let m3 = self.m3 + term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        let m2 = self.m2 + term1;

        Self {
            count,
            mean: self.mean + delta_n,
            m2,
            m3,
            m4,
        }
    }

    /// Combines states accumulated over disjoint partitions of one series.
    /// Commutative; an empty state is the identity.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if other.count == 0 {
            return self;
        }
        if self.count == 0 {
            return other;
        }

        let na = self.count as f64;
        let nb = other.count as f64;
        let count = self.count + other.count;
        let n = count as f64;

        let delta = other.mean - self.mean;
        let delta2 = delta * delta;
        let delta3 = delta2 * delta;
        let delta4 = delta2 * delta2;

        let m2 = self.m2 + other.m2 + delta2 * na * nb / n;
        let m3 = self.m3
            + other.m3
            + delta3 * na * nb * (na - nb) / (n * n)
            + 3.0 * delta * (na * other.m2 - nb * self.m2) / n;
        let m4 = self.m4
            + other.m4
            + delta4 * na * nb * (na * na - na * nb + nb * nb) / (n * n * n)
            + 6.0 * delta2 * (na * na * other.m2 + nb * nb * self.m2) / (n * n)
            + 4.0 * delta * (na * other.m3 - nb * self.m3) / n;

        Self {
            count,
            mean: self.mean + delta * nb / n,
            m2,
            m3,
            m4,
        }
    }

    pub fn merge_all<I: IntoIterator<Item = MomentState>>(states: I) -> Self {
        states.into_iter().fold(Self::new(), Self::merge)
    }

    /// Fails with [`TransformError::NumericOverflow`] when a central sum left
    /// the `f64` range, e.g. fourth powers of deviations above ~1e77.
    pub fn finalize(&self) -> TransformResult<CentralMoments> {
        if self.count == 0 {
            return Err(TransformError::EmptyInput);
        }

        let n = self.count as f64;
        let variance = self.m2 / n;

        // With a single value, or all values equal, the higher moments are
        // reported as zero rather than 0/0.
        let (skewness, excess_kurtosis) = if self.count == 1 || self.m2 == 0.0 {
            (0.0, 0.0)
        } else {
            // Divide before multiplying: m2 squared overflows long before m4.
            (
                n.sqrt() * (self.m3 / self.m2) / self.m2.sqrt(),
                n * (self.m4 / self.m2) / self.m2 - 3.0,
            )
        };

        if !variance.is_finite() {
            return Err(TransformError::NumericOverflow("variance"));
        }
        if !skewness.is_finite() {
            return Err(TransformError::NumericOverflow("skewness"));
        }
        if !excess_kurtosis.is_finite() {
            return Err(TransformError::NumericOverflow("kurtosis"));
        }

        Ok(CentralMoments {
            count: self.count,
            mean: self.mean,
            variance: if self.count == 1 { 0.0 } else { variance },
            std_dev: if self.count == 1 { 0.0 } else { variance.sqrt() },
            skewness,
            excess_kurtosis,
        })
    }
}

impl FromIterator<f64> for MomentState {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::observe)
    }
}

impl Estimator for MomentState {
    #[inline]
    fn add(&mut self, v: f64) {
        *self = self.observe(v);
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.count > 0 { self.mean } else { f64::NAN }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::lvr_values;

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1.0)
    }

    fn assert_moments_close(a: &CentralMoments, b: &CentralMoments, rel: f64) {
        assert_eq!(a.count, b.count);
        assert!(close(a.mean, b.mean, rel), "mean {} vs {}", a.mean, b.mean);
        assert!(close(a.variance, b.variance, rel), "var {} vs {}", a.variance, b.variance);
        assert!(close(a.skewness, b.skewness, rel), "skew {} vs {}", a.skewness, b.skewness);
        assert!(
            close(a.excess_kurtosis, b.excess_kurtosis, rel),
            "kurt {} vs {}",
            a.excess_kurtosis,
            b.excess_kurtosis
        );
    }

    #[test]
    fn empty_state_cannot_be_finalized() {
        assert_eq!(MomentState::new().finalize(), Err(TransformError::EmptyInput));
        assert!(MomentState::new().estimation().is_nan());
    }

    #[test]
    fn single_value_reports_zero_spread() {
        let m = MomentState::new().observe(42.0).finalize().unwrap();
        assert_eq!(m.count, 1);
        assert_eq!(m.mean, 42.0);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.std_dev, 0.0);
        assert_eq!(m.skewness, 0.0);
        assert_eq!(m.excess_kurtosis, 0.0);
    }

    #[test]
    fn constant_series_has_zero_higher_moments() {
        let m = MomentState::from_values(&[3.0; 10]).finalize().unwrap();
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.skewness, 0.0);
        assert_eq!(m.excess_kurtosis, 0.0);
    }

    #[test]
    fn known_population_values() {
        let m = MomentState::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .finalize()
            .unwrap();
        assert!(close(m.mean, 5.0, 1e-12));
        assert!(close(m.variance, 4.0, 1e-12));
        assert!(close(m.std_dev, 2.0, 1e-12));
        assert!(close(m.skewness, 0.65625, 1e-12));
        assert!(close(m.excess_kurtosis, -0.21875, 1e-12));
    }

    #[test]
    fn large_spread_without_squaring_m2() {
        let values: Vec<f64> = (0..1_000)
            .map(|i| if i % 2 == 0 { 1e76 } else { -1e76 })
            .collect();
        let m = MomentState::from_values(&values).finalize().unwrap();
        assert!(close(m.variance, 1e152, 1e-9));
        assert!(m.skewness.abs() < 1e-6);
        assert!(close(m.excess_kurtosis, -2.0, 1e-9));
    }

    #[test]
    fn fourth_moment_overflow_is_reported() {
        let state = MomentState::from_values(&[1e80, -1e80, 3e80]);
        assert!(matches!(state.finalize(), Err(TransformError::NumericOverflow(_))));
    }

    #[test]
    fn uses_population_denominator() {
        let m = MomentState::from_values(&[1.0, 3.0]).finalize().unwrap();
        assert!(close(m.variance, 1.0, 1e-12));
    }

    #[test]
    fn streaming_matches_two_pass() {
        for seed in [1, 7, 42] {
            let values = lvr_values(2_000, seed);
            let streamed = MomentState::from_values(&values).finalize().unwrap();
            let exact = MomentState::exact(&values).finalize().unwrap();
            assert_moments_close(&streamed, &exact, 1e-9);
        }
    }

    #[test]
    fn merging_partitions_equals_concatenation() {
        let values = lvr_values(1_500, 99);
        let whole = MomentState::from_values(&values).finalize().unwrap();

        for split in [1, 500, 1_499] {
            let (a, b) = values.split_at(split);
            let merged = MomentState::from_values(a)
                .merge(MomentState::from_values(b))
                .finalize()
                .unwrap();
            assert_moments_close(&merged, &whole, 1e-9);

            let reversed = MomentState::from_values(b)
                .merge(MomentState::from_values(a))
                .finalize()
                .unwrap();
            assert_moments_close(&reversed, &whole, 1e-9);
        }
    }

    #[test]
    fn merge_all_over_many_chunks() {
        let values = lvr_values(1_000, 5);
        let whole = MomentState::from_values(&values).finalize().unwrap();
        let merged = MomentState::merge_all(values.chunks(37).map(MomentState::from_values))
            .finalize()
            .unwrap();
        assert_moments_close(&merged, &whole, 1e-9);
    }

    #[test]
    fn empty_is_merge_identity() {
        let s = MomentState::from_values(&[1.0, 2.0, 4.0]);
        assert_eq!(s.merge(MomentState::new()), s);
        assert_eq!(MomentState::new().merge(s), s);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let s = MomentState::from_values(&[1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(s.count(), 2);
        assert_eq!(s.finalize().unwrap().mean, 2.0);
        assert_eq!(MomentState::exact(&[1.0, f64::NAN, 3.0]).count(), 2);
    }

    #[test]
    fn estimator_and_collect_agree() {
        let mut est = MomentState::new();
        est.add_all([1.0, 2.0, 3.0, 6.0]);
        let collected: MomentState = [1.0, 2.0, 3.0, 6.0].into_iter().collect();
        assert_eq!(est, collected);
        assert_eq!(est.estimation(), 3.0);
    }
}
