//! First-hitting-time kernels for the Ornstein-Uhlenbeck process.

use crate::error::Result;
use crate::numerics::adaptive_integration;

/// Closed-form kernels entering the OU hitting-time density and the
/// optimal-trading integrals.
#[derive(Debug, Clone, Copy)]
pub struct HittingTimeKernel {
    pub mu: f64,
    pub alpha: f64,
    pub sigma: f64,
}

impl HittingTimeKernel {
    pub fn new(mu: f64, alpha: f64, sigma: f64) -> Self {
        Self { mu, alpha, sigma }
    }

    /// Density integrand `S(x) = exp(alpha x (x - 2 mu) / sigma^2)`.
    pub fn density_core(&self, x: f64) -> f64 {
        (x * self.alpha * (x - 2.0 * self.mu) / (self.sigma * self.sigma)).exp()
    }

    /// `F` integrand
    /// `u^(r/alpha - 1) exp(sqrt(2 alpha / sigma^2) (x - mu) u - u^2/2)`.
    pub fn trading_f_core(&self, x: f64, u: f64, r: f64) -> f64 {
        u.powf(r / self.alpha - 1.0)
            * ((2.0 * self.alpha / (self.sigma * self.sigma)).sqrt() * (x - self.mu) * u
                - u * u / 2.0)
                .exp()
    }

    /// `G` integrand, the reflection of `trading_f_core` about `mu`.
    pub fn trading_g_core(&self, x: f64, u: f64, r: f64) -> f64 {
        u.powf(r / self.alpha - 1.0)
            * ((2.0 * self.alpha / (self.sigma * self.sigma)).sqrt() * (self.mu - x) * u
                - u * u / 2.0)
                .exp()
    }

    /// `L*(r, c) = (alpha mu + r c) / (r + alpha)`.
    pub fn trading_l_core(&self, r: f64, c: f64) -> f64 {
        (self.alpha * self.mu + r * c) / (r + self.alpha)
    }
}

/// Probability that the process started at `x` hits `first` before
/// `second`, as the ratio of integrals of the density core:
/// `int_second^x S / int_second^first S`.
pub fn hitting_time_density(kernel: &HittingTimeKernel, x: f64, first: f64, second: f64) -> Result<f64> {
    let numerator = adaptive_integration(|u| kernel.density_core(u), second, x)?;
    let denominator = adaptive_integration(|u| kernel.density_core(u), second, first)?;
    Ok(numerator / denominator)
}
