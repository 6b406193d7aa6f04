//! General-Linear multiplicative SDE model.

use crate::distributions::GaussianDistribution;
use crate::error::{ModelError, Result};

/// Discrete General-Linear SDE `X_{t+1} = e^mu X_t + sigma eps_t`.
///
/// Used both standalone and as the driving dynamics of the KCA Kalman
/// filter transition.
#[derive(Debug, Clone)]
pub struct GeneralLinearModel {
    mu: f64,
    sigma: f64,
    noise: GaussianDistribution,
}

impl GeneralLinearModel {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if sigma <= 0.0 {
            return Err(ModelError::InvalidArgument(
                "sigma must be positive".to_string(),
            ));
        }
        Ok(Self {
            mu,
            sigma,
            noise: GaussianDistribution::standard(),
        })
    }

    /// Model with a seeded noise source for reproducible simulation.
    pub fn with_seed(mu: f64, sigma: f64, seed: u64) -> Result<Self> {
        let mut model = Self::new(mu, sigma)?;
        model.noise = GaussianDistribution::with_seed(0.0, 1.0, seed)?;
        Ok(model)
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn mean(&self) -> f64 {
        0.0
    }

    /// `sigma^2 / (2 mu) (e^(2 mu) - 1)`, 0 when `mu` is 0.
    pub fn unconditional_variance(&self) -> f64 {
        if self.mu == 0.0 {
            return 0.0;
        }
        (self.sigma * self.sigma / (2.0 * self.mu)) * ((2.0 * self.mu).exp() - 1.0)
    }

    /// `(2 sigma mu) / (e^(2 mu) - e^mu)`, 0 when `mu` is 0.
    pub fn conditional_variance(&self) -> f64 {
        if self.mu == 0.0 {
            return 0.0;
        }
        (2.0 * self.sigma * self.mu) / ((2.0 * self.mu).exp() - self.mu.exp())
    }

    /// Simulate `size` samples starting from `start` with step `dt`.
    pub fn simulate(&mut self, start: f64, size: usize, dt: f64) -> Vec<f64> {
        if size == 0 {
            return Vec::new();
        }
        let draws = self.noise.sample(size - 1);
        let mut path = Vec::with_capacity(size);
        let mut last = start;
        path.push(last);
        for noise in draws {
            last = self.step(last, noise, dt);
            path.push(last);
        }
        path
    }

    /// One step `x e^(mu dt) + sigma eps`.
    fn step(&self, x: f64, noise: f64, dt: f64) -> f64 {
        x * (self.mu * dt).exp() + self.sigma * noise
    }
}
