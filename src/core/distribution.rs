//! Bounded beta and flat sampling
//!
//! Beta distributions are specified the intuitive way, by `(min, max, mean,
//! variance)`, and mapped onto shape parameters with the method of moments:
//!
//! ```text
//! wmean = (mean - min) / (max - min)
//! wvar  = variance / (max - min)
//! alpha = ((1 - wmean) / wvar - 1 / wmean) * wmean²
//! beta  = alpha * (1 / wmean - 1)
//! ```
//!
//! Note that `wvar` is scaled by the range, not the squared range. The
//! variance is not checked against the classical bound `wmean(1 - wmean)`;
//! a variance that is too large shows up as a non-positive shape parameter
//! and fails with [`SimError::DegenerateDistribution`].
//!
//! All sampling takes the random source explicitly so runs are reproducible.

use rand::Rng;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};

use crate::core::error::SimError;

/// Intuitive beta parameters: bounds, mean and (range-scaled) variance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BetaParams {
    /// Lower bound of the distribution
    pub min: f64,

    /// Upper bound of the distribution
    pub max: f64,

    /// Mean of the distribution
    pub mean: f64,

    /// Variance of the distribution
    #[serde(rename = "var", alias = "variance")]
    pub variance: f64,
}

impl BetaParams {
    pub const fn new(min: f64, max: f64, mean: f64, variance: f64) -> Self {
        Self {
            min,
            max,
            mean,
            variance,
        }
    }

    /// Fit shape parameters for these bounds
    pub fn fit(&self) -> Result<BetaShape, SimError> {
        BetaShape::fit(self)
    }

    /// Draw `n` samples
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>, SimError> {
        sample_beta(n, self.min, self.max, self.mean, self.variance, rng)
    }
}

/// Uniform distribution bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatParams {
    /// Lower bound of the distribution
    pub min: f64,

    /// Upper bound of the distribution
    pub max: f64,
}

impl FlatParams {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw `n` samples
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>, SimError> {
        sample_flat(n, self.min, self.max, rng)
    }
}

/// Fitted beta shape, rescaled onto `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaShape {
    pub alpha: f64,
    pub beta: f64,
    pub min: f64,
    pub max: f64,
}

impl BetaShape {
    /// Derive shape parameters from intuitive parameters
    pub fn fit(params: &BetaParams) -> Result<Self, SimError> {
        let BetaParams {
            min,
            max,
            mean,
            variance,
        } = *params;

        let dif = max - min;
        let wmean = (mean - min) / dif;
        let wvar = variance / dif;

        // NaN (zero range) fails here too
        if !(wmean > 0.0 && wmean < 1.0) {
            return Err(SimError::invalid(format!(
                "mean {} must lie strictly between min {} and max {}",
                mean, min, max
            )));
        }

        let alpha = ((1.0 - wmean) / wvar - 1.0 / wmean) * wmean.powi(2);
        let beta = alpha * (1.0 / wmean - 1.0);

        if !(alpha.is_finite() && beta.is_finite() && alpha > 0.0 && beta > 0.0) {
            return Err(SimError::DegenerateDistribution { alpha, beta });
        }

        let shape = Self {
            alpha,
            beta,
            min,
            max,
        };
        tracing::debug!(
            alpha,
            beta,
            mode = shape.mode(),
            mean = shape.mean(),
            median = shape.median(),
            variance = shape.variance(),
            "fitted beta distribution"
        );
        Ok(shape)
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Most frequent value (only meaningful for alpha, beta > 1)
    pub fn mode(&self) -> f64 {
        (self.alpha - 1.0) / (self.alpha + self.beta - 2.0) * self.range() + self.min
    }

    pub fn mean(&self) -> f64 {
        1.0 / (1.0 + self.beta / self.alpha) * self.range() + self.min
    }

    /// Approximate median
    pub fn median(&self) -> f64 {
        (self.alpha - 1.0 / 3.0) / (self.alpha + self.beta - 2.0 / 3.0) * self.range() + self.min
    }

    /// Variance, scaled by the range the same way the input variance is
    pub fn variance(&self) -> f64 {
        let ab = self.alpha + self.beta;
        self.alpha * self.beta / (ab.powi(2) * (ab + 1.0)) * self.range()
    }

    /// Draw `n` values in `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>, SimError> {
        let dist = Beta::new(self.alpha, self.beta).map_err(|_| {
            SimError::DegenerateDistribution {
                alpha: self.alpha,
                beta: self.beta,
            }
        })?;

        let range = self.range();
        Ok((0..n)
            .map(|_| {
                let variate: f64 = dist.sample(rng);
                (variate * range + self.min).clamp(self.min, self.max)
            })
            .collect())
    }
}

/// Draw `n` samples from a beta distribution bounded to `[min, max]`
pub fn sample_beta<R: Rng + ?Sized>(
    n: usize,
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
    rng: &mut R,
) -> Result<Vec<f64>, SimError> {
    BetaShape::fit(&BetaParams::new(min, max, mean, variance))?.sample(n, rng)
}

/// Draw `n` uniform samples in `[min, max]`
pub fn sample_flat<R: Rng + ?Sized>(
    n: usize,
    min: f64,
    max: f64,
    rng: &mut R,
) -> Result<Vec<f64>, SimError> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(SimError::invalid(format!(
            "flat distribution needs finite bounds with min <= max (got {}..{})",
            min, max
        )));
    }

    Ok((0..n).map(|_| rng.random_range(min..=max)).collect())
}
