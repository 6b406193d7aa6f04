//! General-Linear SDE maximum-likelihood estimation.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Sufficient statistics of an observation series for the General-Linear
/// estimator.
///
/// `squared_error` is accumulated with a Welford-style recurrence on the
/// online path; it tracks the batch residual statistic as a running
/// approximation rather than an exact identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralLinearComponents {
    /// Sum of squares of the series without its first element.
    pub lag_squared: f64,
    pub lead_lag_inner_product: f64,
    pub squared_error: f64,
    pub n_obs: u32,
}

/// Estimated General-Linear parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralLinearParameters {
    pub mu: f64,
    pub sigma: f64,
}

impl GeneralLinearParameters {
    /// Conditional variance `(2 sigma mu) / (e^(2 mu) - e^mu)`, 0 when
    /// `mu` is 0.
    pub fn conditional_variance(&self) -> f64 {
        if self.mu == 0.0 {
            return 0.0;
        }
        (2.0 * self.sigma * self.mu) / ((2.0 * self.mu).exp() - self.mu.exp())
    }
}

/// Stateless calculator for the General-Linear components and MLE.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralLinearLikelihood;

impl GeneralLinearLikelihood {
    pub fn new() -> Self {
        Self
    }

    /// 0-guarded ratio used for the multiplicative mean `e^mu`.
    fn series_mean(numerator: f64, denominator: f64) -> f64 {
        if denominator == 0.0 || numerator == 0.0 {
            0.0
        } else {
            numerator / denominator
        }
    }

    /// Compute the component bundle of `data`.
    ///
    /// Requires at least two observations.
    pub fn components(&self, data: &[f64]) -> Result<GeneralLinearComponents> {
        if data.len() < 2 {
            return Err(ModelError::InvalidArgument(
                "number of observations must be greater than 1".to_string(),
            ));
        }
        let n = data.len();
        let lead_lag_inner_product: f64 = data[..n - 1]
            .iter()
            .zip(&data[1..])
            .map(|(x, y)| x * y)
            .sum();
        let lag_squared: f64 = data[1..].iter().map(|x| x * x).sum();
        let mu = Self::series_mean(lead_lag_inner_product, lag_squared).ln();
        let squared_error = self.squared_error(data, mu);
        Ok(GeneralLinearComponents {
            lag_squared,
            lead_lag_inner_product,
            squared_error,
            n_obs: n as u32,
        })
    }

    fn squared_error(&self, data: &[f64], mu: f64) -> f64 {
        let exp_mean = mu.exp();
        data.windows(2)
            .map(|w| {
                let residual = w[1] - w[0] * exp_mean;
                residual * residual
            })
            .sum()
    }

    /// Fold one `(new, last)` observation pair into the bundle.
    ///
    /// The residual statistic is advanced with the ratio-weighted
    /// recurrence `squared_error += n/(n+1) (x_new - mean x_prev)^2`,
    /// where `mean` is recomputed from the updated sums.
    pub fn update_components(
        &self,
        components: &GeneralLinearComponents,
        new_observation: f64,
        last_observation: f64,
    ) -> GeneralLinearComponents {
        let lag_squared = components.lag_squared + last_observation * last_observation;
        let lead_lag_inner_product =
            components.lead_lag_inner_product + last_observation * new_observation;
        let mean = Self::series_mean(lead_lag_inner_product, lag_squared);
        let n = f64::from(components.n_obs);
        let ratio = n / (n + 1.0);
        let residual = new_observation - mean * last_observation;
        GeneralLinearComponents {
            lag_squared,
            lead_lag_inner_product,
            squared_error: components.squared_error + ratio * residual * residual,
            n_obs: components.n_obs + 1,
        }
    }

    /// Closed-form parameters from a component bundle.
    pub fn parameters(&self, components: &GeneralLinearComponents) -> GeneralLinearParameters {
        let mu =
            Self::series_mean(components.lead_lag_inner_product, components.lag_squared).ln();
        let sigma = if components.squared_error != 0.0 && components.n_obs > 0 {
            (components.squared_error / f64::from(components.n_obs)).sqrt()
        } else {
            0.0
        };
        GeneralLinearParameters { mu, sigma }
    }
}

/// Stateful wrapper keeping components and parameters together across
/// successive online updates.
#[derive(Debug, Clone)]
pub struct GeneralLinearUpdater {
    components: GeneralLinearComponents,
    parameters: GeneralLinearParameters,
    likelihood: GeneralLinearLikelihood,
}

impl GeneralLinearUpdater {
    pub fn new(components: GeneralLinearComponents, parameters: GeneralLinearParameters) -> Self {
        Self {
            components,
            parameters,
            likelihood: GeneralLinearLikelihood::new(),
        }
    }

    pub fn components(&self) -> &GeneralLinearComponents {
        &self.components
    }

    pub fn parameters(&self) -> &GeneralLinearParameters {
        &self.parameters
    }

    /// Fold in one observation pair and recompute the parameters.
    pub fn update(
        &mut self,
        new_observation: f64,
        last_observation: f64,
    ) -> GeneralLinearParameters {
        self.components =
            self.likelihood
                .update_components(&self.components, new_observation, last_observation);
        self.parameters = self.likelihood.parameters(&self.components);
        self.parameters
    }
}
