//! Ornstein-Uhlenbeck maximum-likelihood estimation.
//!
//! The estimator works over a fixed-size bundle of running sums
//! ([`OrnsteinUhlenbeckComponents`]) from which the closed-form
//! parameters are recomputed. Appending one observation updates the
//! bundle in O(1), and the updated bundle is exactly the one the batch
//! pass over the extended series would produce, so the online path is
//! bit-identical to the batch path.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Sufficient statistics of an observation series for the OU estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrnsteinUhlenbeckComponents {
    /// Sum of the series without its first element.
    pub lead_sum: f64,
    /// Sum of the series without its last element.
    pub lag_sum: f64,
    pub lead_sum_squared: f64,
    pub lag_sum_squared: f64,
    pub lead_lag_sum_product: f64,
    pub n_obs: u32,
}

/// Estimated OU parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrnsteinUhlenbeckParameters {
    pub mu: f64,
    pub alpha: f64,
    pub sigma: f64,
}

/// Stateless calculator for the OU components and closed-form MLE.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrnsteinUhlenbeckLikelihood;

impl OrnsteinUhlenbeckLikelihood {
    pub fn new() -> Self {
        Self
    }

    /// Compute the component bundle of `data`.
    ///
    /// Requires at least two observations.
    pub fn components(&self, data: &[f64]) -> Result<OrnsteinUhlenbeckComponents> {
        if data.len() < 2 {
            return Err(ModelError::InvalidArgument(
                "number of observations must be greater than 1".to_string(),
            ));
        }
        let n = data.len();
        let lead = &data[1..];
        let lag = &data[..n - 1];
        Ok(OrnsteinUhlenbeckComponents {
            lead_sum: lead.iter().sum(),
            lag_sum: lag.iter().sum(),
            lead_sum_squared: lead.iter().map(|x| x * x).sum(),
            lag_sum_squared: lag.iter().map(|x| x * x).sum(),
            lead_lag_sum_product: lag.iter().zip(lead).map(|(x, y)| x * y).sum(),
            n_obs: n as u32,
        })
    }

    /// Fold one `(new, last)` observation pair into the bundle.
    pub fn update_components(
        &self,
        components: &OrnsteinUhlenbeckComponents,
        new_observation: f64,
        last_observation: f64,
    ) -> OrnsteinUhlenbeckComponents {
        OrnsteinUhlenbeckComponents {
            lead_sum: components.lead_sum + new_observation,
            lag_sum: components.lag_sum + last_observation,
            lead_sum_squared: components.lead_sum_squared + new_observation * new_observation,
            lag_sum_squared: components.lag_sum_squared + last_observation * last_observation,
            lead_lag_sum_product: components.lead_lag_sum_product
                + last_observation * new_observation,
            n_obs: components.n_obs + 1,
        }
    }

    /// Closed-form parameters from a component bundle.
    pub fn parameters(
        &self,
        components: &OrnsteinUhlenbeckComponents,
    ) -> OrnsteinUhlenbeckParameters {
        let mu = self.mu(components);
        let alpha = self.alpha(components, mu);
        let sigma = self.sigma(components, mu, alpha);
        OrnsteinUhlenbeckParameters { mu, alpha, sigma }
    }

    fn mu(&self, c: &OrnsteinUhlenbeckComponents) -> f64 {
        let n = f64::from(c.n_obs);
        ((c.lead_sum * c.lag_sum_squared) - (c.lag_sum * c.lead_lag_sum_product))
            / ((n * (c.lag_sum_squared - c.lead_lag_sum_product))
                - (c.lag_sum * c.lag_sum - c.lead_sum * c.lag_sum))
    }

    fn alpha(&self, c: &OrnsteinUhlenbeckComponents, mu: f64) -> f64 {
        let n = f64::from(c.n_obs);
        (c.lag_sum_squared - 2.0 * mu * c.lag_sum + n * mu * mu).ln()
            - (c.lead_lag_sum_product - mu * c.lag_sum - mu * c.lead_sum + n * mu * mu).ln()
    }

    fn sigma(&self, c: &OrnsteinUhlenbeckComponents, mu: f64, alpha: f64) -> f64 {
        let n = f64::from(c.n_obs);
        let exp_alpha = (-alpha).exp();
        let mut sigma = c.lead_sum_squared - 2.0 * exp_alpha * c.lead_lag_sum_product
            + exp_alpha * exp_alpha * c.lag_sum_squared
            - (2.0 * mu * (1.0 - exp_alpha)) * (c.lead_sum - exp_alpha * c.lag_sum)
            + n * mu * mu * (1.0 - exp_alpha) * (1.0 - exp_alpha);
        sigma *= 1.0 / n;
        sigma *= (2.0 * exp_alpha) / (1.0 - exp_alpha * exp_alpha);
        sigma
    }
}

/// Stateful wrapper keeping components and parameters together across
/// successive online updates.
#[derive(Debug, Clone)]
pub struct OrnsteinUhlenbeckUpdater {
    components: OrnsteinUhlenbeckComponents,
    parameters: OrnsteinUhlenbeckParameters,
    likelihood: OrnsteinUhlenbeckLikelihood,
}

impl OrnsteinUhlenbeckUpdater {
    pub fn new(
        components: OrnsteinUhlenbeckComponents,
        parameters: OrnsteinUhlenbeckParameters,
    ) -> Self {
        Self {
            components,
            parameters,
            likelihood: OrnsteinUhlenbeckLikelihood::new(),
        }
    }

    pub fn components(&self) -> &OrnsteinUhlenbeckComponents {
        &self.components
    }

    pub fn parameters(&self) -> &OrnsteinUhlenbeckParameters {
        &self.parameters
    }

    /// Fold in one observation pair and recompute the parameters.
    pub fn update(
        &mut self,
        new_observation: f64,
        last_observation: f64,
    ) -> OrnsteinUhlenbeckParameters {
        self.components =
            self.likelihood
                .update_components(&self.components, new_observation, last_observation);
        self.parameters = self.likelihood.parameters(&self.components);
        self.parameters
    }
}
