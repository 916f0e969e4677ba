use crate::core::Observation;
use crate::error::{TransformError, TransformResult};
use crate::utils::math::{clamp_proportion, inverse_logit, logit, mean};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Intercept and slope of `logit(p) = alpha + beta * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogitFit {
    pub alpha: f64,
    pub beta: f64,
}

impl LogitFit {
    /// Predicted proportion in `(0, 1)` at covariate `x`.
    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        inverse_logit(self.alpha + self.beta * x)
    }

    #[inline]
    pub fn predict_percent(&self, x: f64) -> f64 {
        self.predict(x) * 100.0
    }

    /// `d p / d x` at `x`, i.e. `beta * p * (1 - p)`.
    #[inline]
    pub fn marginal_effect(&self, x: f64) -> f64 {
        let p = self.predict(x);
        self.beta * p * (1.0 - p)
    }

    pub fn curve(&self, xs: &[f64]) -> Vec<(f64, f64)> {
        xs.iter().map(|&x| (x, self.predict(x))).collect()
    }
}

/// Fitted curve summarised at the sample mean of the covariate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectSummary {
    pub fit: LogitFit,
    pub mean_covariate: f64,
    pub predicted: f64,
    pub marginal_effect: f64,
}

/// Logit-linked least squares for proportions.
///
/// Each proportion is clamped to `[0.0001, 0.9999]`, mapped through the logit
/// and regressed on the covariate by ordinary least squares.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundedRatioRegressor;

impl BoundedRatioRegressor {
    pub fn fit(observations: &[Observation]) -> TransformResult<LogitFit> {
        let first = observations.first().ok_or(TransformError::EmptyInput)?;

        if let Some(index) = observations
            .iter()
            .position(|o| !o.covariate.is_finite() || !o.proportion.is_finite())
        {
            return Err(TransformError::NonFiniteInput { index });
        }

        if observations.iter().all(|o| o.covariate == first.covariate) {
            return Err(TransformError::DegenerateCovariate);
        }

        let ys: Vec<f64> = observations
            .iter()
            .map(|o| logit(clamp_proportion(o.proportion)))
            .collect();

        // Regress on covariates scaled into [-1, 1] so the squared
        // deviations cannot overflow; the slope is scaled back afterwards.
        let scale = covariate_scale(observations);
        let us: Vec<f64> = observations.iter().map(|o| o.covariate / scale).collect();
        let mean_u = mean(us.iter().copied()).ok_or(TransformError::EmptyInput)?;
        let mean_y = mean(ys.iter().copied()).ok_or(TransformError::EmptyInput)?;

        let (sxy, sxx) = us
            .iter()
            .zip(&ys)
            .fold((0.0, 0.0), |(sxy, sxx), (&u, &y)| {
                let du = u - mean_u;
                (sxy + du * (y - mean_y), sxx + du * du)
            });

        if sxx <= 0.0 {
            return Err(TransformError::DegenerateCovariate);
        }

        let scaled_beta = sxy / sxx;
        let beta = scaled_beta / scale;
        let alpha = mean_y - scaled_beta * mean_u;
        debug!(n = observations.len(), alpha, beta, "fitted logit-linear model");

        Ok(LogitFit { alpha, beta })
    }

    pub fn effect_at_mean(observations: &[Observation]) -> TransformResult<EffectSummary> {
        let fit = Self::fit(observations)?;
        let scale = covariate_scale(observations);
        let mean_covariate = mean(observations.iter().map(|o| o.covariate / scale))
            .ok_or(TransformError::EmptyInput)?
            * scale;

        Ok(EffectSummary {
            fit,
            mean_covariate,
            predicted: fit.predict(mean_covariate),
            marginal_effect: fit.marginal_effect(mean_covariate),
        })
    }
}

/// Largest absolute covariate, or 1 when all are zero.
fn covariate_scale(observations: &[Observation]) -> f64 {
    let max = observations
        .iter()
        .map(|o| o.covariate.abs())
        .fold(0.0, f64::max);
    if max > 0.0 { max } else { 1.0 }
}
