//! Bracketing and root finding for the optimal trading thresholds.

use tracing::error;

use crate::error::Result;
use crate::hitting_times::HittingTimeKernel;
use crate::numerics::brent;
use crate::sde::OrnsteinUhlenbeckModel;
use crate::trading::optimizers::{ExponentialMeanReversion, LinearMeanReversion, OptimalTrading};

/// Threshold solver for a fitted OU model and a payoff backend.
///
/// Brackets each threshold from the model moments and runs Brent's
/// method on the matching residual. A failed solve logs one diagnostic
/// naming the call site and propagates the failure unchanged.
#[derive(Debug, Clone)]
pub struct TradingLevels<O: OptimalTrading> {
    model: OrnsteinUhlenbeckModel,
    kernel: HittingTimeKernel,
    optimizer: O,
}

/// Linear-payoff threshold solver.
pub type OrnsteinUhlenbeckTradingLevels = TradingLevels<LinearMeanReversion>;
/// Exponential-payoff (log-price) threshold solver.
pub type ExponentialTradingLevels = TradingLevels<ExponentialMeanReversion>;

impl OrnsteinUhlenbeckTradingLevels {
    pub fn new(mu: f64, alpha: f64, sigma: f64) -> Result<Self> {
        Ok(Self {
            model: OrnsteinUhlenbeckModel::new(mu, alpha, sigma)?,
            kernel: HittingTimeKernel::new(mu, alpha, sigma),
            optimizer: LinearMeanReversion::new(),
        })
    }
}

impl ExponentialTradingLevels {
    pub fn new(mu: f64, alpha: f64, sigma: f64) -> Result<Self> {
        Ok(Self {
            model: OrnsteinUhlenbeckModel::new(mu, alpha, sigma)?,
            kernel: HittingTimeKernel::new(mu, alpha, sigma),
            optimizer: ExponentialMeanReversion::new(),
        })
    }
}

impl<O: OptimalTrading> TradingLevels<O> {
    pub fn kernel(&self) -> &HittingTimeKernel {
        &self.kernel
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Upper end of the exit bracket: `mu + 4 sqrt(var)`.
    pub fn exit_upper_bound(&self) -> f64 {
        self.model.mean() + 4.0 * self.model.unconditional_variance().sqrt()
    }

    /// Lower end of the exit bracket: `max(L*(r, c), c)`.
    pub fn exit_lower_bound(&self, r: f64, c: f64) -> f64 {
        self.optimizer.l_star(&self.kernel, r, c).max(c)
    }

    /// Lower end of the entry bracket: `mu - 4 sqrt(var)`.
    pub fn entry_lower_bound(&self) -> f64 {
        self.model.mean() - 4.0 * self.model.unconditional_variance().sqrt()
    }

    /// Optimal exit level `b*`.
    pub fn optimal_exit(&self, r: f64, c: f64) -> Result<f64> {
        let lower = self.exit_lower_bound(r, c);
        let upper = self.exit_upper_bound();
        brent(
            |x| self.optimizer.exit_residual(&self.kernel, x, r, c),
            lower,
            upper,
        )
        .map_err(|e| {
            error!("optimal exit level solve failed: {e}");
            e
        })
    }

    /// Optimal exit level `b*` under a stop-loss constraint.
    pub fn optimal_exit_with_stop_loss(&self, stop_loss: f64, r: f64, c: f64) -> Result<f64> {
        let lower = self.exit_lower_bound(r, c);
        let upper = self.exit_upper_bound();
        brent(
            |x| {
                self.optimizer
                    .exit_residual_with_stop_loss(&self.kernel, x, stop_loss, r, c)
            },
            lower,
            upper,
        )
        .map_err(|e| {
            error!("optimal exit level solve with stop loss failed: {e}");
            e
        })
    }

    /// Optimal entry level `d*` given the exit level `b_star`.
    pub fn optimal_entry(&self, b_star: f64, r: f64, c: f64) -> Result<f64> {
        let lower = self.entry_lower_bound();
        brent(
            |x| self.optimizer.entry_residual(&self.kernel, x, b_star, r, c),
            lower,
            b_star,
        )
        .map_err(|e| {
            error!("optimal entry level solve failed: {e}");
            e
        })
    }

    /// Optimal entry level `d*` under a stop-loss constraint.
    pub fn optimal_entry_with_stop_loss(
        &self,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        brent(
            |x| {
                self.optimizer.entry_residual_with_stop_loss(
                    &self.kernel,
                    x,
                    b_star,
                    stop_loss,
                    r,
                    c,
                )
            },
            stop_loss,
            b_star,
        )
        .map_err(|e| {
            error!("optimal entry level solve with stop loss failed: {e}");
            e
        })
    }

    /// Lower boundary `a*` of the entry region.
    pub fn optimal_entry_lower(&self, d_star: f64, b_star: f64, r: f64, c: f64) -> Result<f64> {
        let lower = self.entry_lower_bound();
        brent(
            |x| {
                self.optimizer
                    .lower_entry_residual(&self.kernel, x, b_star, r, c)
            },
            lower,
            d_star,
        )
        .map_err(|e| {
            error!("lower entry level solve failed: {e}");
            e
        })
    }

    /// Lower boundary `a*` of the entry region under a stop-loss
    /// constraint.
    pub fn optimal_entry_lower_with_stop_loss(
        &self,
        d_star: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        brent(
            |x| {
                self.optimizer.lower_entry_residual_with_stop_loss(
                    &self.kernel,
                    x,
                    b_star,
                    stop_loss,
                    r,
                    c,
                )
            },
            stop_loss,
            d_star,
        )
        .map_err(|e| {
            error!("lower entry level solve with stop loss failed: {e}");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn exit_bracket_uses_model_moments() {
        let levels = OrnsteinUhlenbeckTradingLevels::new(0.3, 8.0, 0.3).unwrap();
        let variance: f64 = 0.09 / 16.0;
        assert!((levels.exit_upper_bound() - (0.3 + 4.0 * variance.sqrt())).abs() < 1e-12);
        assert!((levels.entry_lower_bound() - (0.3 - 4.0 * variance.sqrt())).abs() < 1e-12);
        // L* dominates the cost here.
        assert!(levels.exit_lower_bound(0.05, 0.02) > 0.02);
    }

    #[test]
    fn exponential_stop_loss_exit_is_not_applicable() {
        let levels = ExponentialTradingLevels::new(1.3499, 5.0, 0.15).unwrap();
        assert!(matches!(
            levels.optimal_exit_with_stop_loss(0.05, 0.05, 0.02),
            Err(ModelError::NotApplicable(_))
        ));
    }

    #[test]
    fn linear_lower_entry_without_stop_loss_is_not_applicable() {
        let levels = OrnsteinUhlenbeckTradingLevels::new(0.3, 8.0, 0.3).unwrap();
        assert!(matches!(
            levels.optimal_entry_lower(0.14, 0.45, 0.05, 0.02),
            Err(ModelError::NotApplicable(_))
        ));
    }
}
