//! Ornstein-Uhlenbeck process model.

use crate::distributions::GaussianDistribution;
use crate::error::{ModelError, Result};

/// Ornstein-Uhlenbeck process `dX = alpha (mu - X) dt + sigma dW`.
///
/// `mu` is the long-run mean, `alpha` the mean-reversion speed and
/// `sigma` the diffusion coefficient.
#[derive(Debug, Clone)]
pub struct OrnsteinUhlenbeckModel {
    mu: f64,
    alpha: f64,
    sigma: f64,
    noise: GaussianDistribution,
}

impl OrnsteinUhlenbeckModel {
    pub fn new(mu: f64, alpha: f64, sigma: f64) -> Result<Self> {
        if alpha <= 0.0 {
            return Err(ModelError::InvalidArgument(
                "alpha must be positive".to_string(),
            ));
        }
        if sigma <= 0.0 {
            return Err(ModelError::InvalidArgument(
                "sigma must be positive".to_string(),
            ));
        }
        Ok(Self {
            mu,
            alpha,
            sigma,
            noise: GaussianDistribution::standard(),
        })
    }

    /// Model with a seeded noise source for reproducible simulation.
    pub fn with_seed(mu: f64, alpha: f64, sigma: f64, seed: u64) -> Result<Self> {
        let mut model = Self::new(mu, alpha, sigma)?;
        model.noise = GaussianDistribution::with_seed(0.0, 1.0, seed)?;
        Ok(model)
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Long-run mean of the process.
    pub fn mean(&self) -> f64 {
        self.mu
    }

    /// Stationary variance `sigma^2 / (2 alpha)`.
    pub fn unconditional_variance(&self) -> f64 {
        self.sigma * self.sigma / (2.0 * self.alpha)
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

    /// One exact-transition Euler-Maruyama step:
    /// `x e^(-alpha dt) + mu (1 - e^(-alpha dt)) + dt sigma eps`.
    fn step(&self, x: f64, noise: f64, dt: f64) -> f64 {
        let decay = (-self.alpha * dt).exp();
        x * decay + self.mu * (1.0 - decay) + dt * self.sigma * noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_moments() {
        let model = OrnsteinUhlenbeckModel::new(0.5, 0.02, 0.05).unwrap();
        assert_eq!(model.mean(), 0.5);
        assert!((model.unconditional_variance() - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(OrnsteinUhlenbeckModel::new(0.0, 0.0, 1.0).is_err());
        assert!(OrnsteinUhlenbeckModel::new(0.0, 1.0, -0.1).is_err());
    }

    #[test]
    fn simulation_has_requested_length_and_start() {
        let mut model = OrnsteinUhlenbeckModel::with_seed(1.0, 0.5, 0.1, 3).unwrap();
        let path = model.simulate(2.0, 100, 1.0);
        assert_eq!(path.len(), 100);
        assert_eq!(path[0], 2.0);
    }

    #[test]
    fn strong_reversion_pulls_towards_mean() {
        let mut model = OrnsteinUhlenbeckModel::with_seed(0.0, 50.0, 0.01, 11).unwrap();
        let path = model.simulate(5.0, 200, 1.0);
        let tail_mean = path[100..].iter().sum::<f64>() / 100.0;
        assert!(tail_mean.abs() < 0.5, "tail mean {tail_mean}");
    }
}
