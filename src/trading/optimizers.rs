//! Value functions and root residuals for the optimal-trading problem.
//!
//! Two backends share the `F`/`G` integral machinery: the linear payoff
//! (classical OU thresholds) and the exponential payoff (log-price
//! model). Stop-loss variants exist only on the linear backend; the
//! exponential backend rejects them as not applicable.

use crate::error::{ModelError, Result};
use crate::hitting_times::HittingTimeKernel;
use crate::numerics::{adaptive_central_difference, semi_infinite_integration_upper};

/// Capability set of a trading-threshold backend: the discounted
/// expected-reward building blocks `F`, `G`, `L*`, the value function
/// `V` and the residual functions whose roots are the thresholds
/// `b*`, `d*` and `a*`.
pub trait OptimalTrading {
    /// `F(x; rate) = int_0^inf F_core(x, u, rate) du`.
    fn f(&self, kernel: &HittingTimeKernel, x: f64, rate: f64) -> Result<f64> {
        Ok(semi_infinite_integration_upper(
            |u| kernel.trading_f_core(x, u, rate),
            0.0,
        )?)
    }

    /// `G(x; rate) = int_0^inf G_core(x, u, rate) du`.
    fn g(&self, kernel: &HittingTimeKernel, x: f64, rate: f64) -> Result<f64> {
        Ok(semi_infinite_integration_upper(
            |u| kernel.trading_g_core(x, u, rate),
            0.0,
        )?)
    }

    /// Discounted blend of mean and cost bounding the exit bracket.
    fn l_star(&self, kernel: &HittingTimeKernel, r: f64, c: f64) -> f64 {
        kernel.trading_l_core(r, c)
    }

    /// `dF/dx (x; rate)` by adaptive central difference.
    fn f_prime(&self, kernel: &HittingTimeKernel, x: f64, rate: f64) -> Result<f64> {
        adaptive_central_difference(|y| self.f(kernel, y, rate), x)
    }

    /// `dG/dx (x; rate)` by adaptive central difference.
    fn g_prime(&self, kernel: &HittingTimeKernel, x: f64, rate: f64) -> Result<f64> {
        adaptive_central_difference(|y| self.g(kernel, y, rate), x)
    }

    /// Value of the optimal liquidation problem at `x` given exit level
    /// `b_star`.
    fn value(&self, kernel: &HittingTimeKernel, x: f64, b_star: f64, r: f64, c: f64)
        -> Result<f64>;

    /// Value with a stop-loss floor at `stop_loss`.
    fn value_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64>;

    /// Residual whose root is the optimal exit level `b*`.
    fn exit_residual(&self, kernel: &HittingTimeKernel, x: f64, r: f64, c: f64) -> Result<f64>;

    /// Exit residual in the presence of a stop-loss.
    fn exit_residual_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64>;

    /// Residual whose root is the optimal entry level `d*`.
    fn entry_residual(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64>;

    /// Entry residual in the presence of a stop-loss.
    fn entry_residual_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64>;

    /// Residual whose root is the lower boundary `a*` of the entry
    /// region.
    fn lower_entry_residual(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64>;

    /// Lower-entry residual in the presence of a stop-loss.
    fn lower_entry_residual_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64>;
}

/// Linear-payoff backend: reward `x - c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearMeanReversion;

impl LinearMeanReversion {
    pub fn new() -> Self {
        Self
    }
}

impl OptimalTrading for LinearMeanReversion {
    fn value(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        if x < b_star {
            Ok((b_star - c) * self.f(kernel, x, r)? / self.f(kernel, b_star, r)?)
        } else {
            Ok(x - c)
        }
    }

    fn value_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        if b_star > x && x > stop_loss {
            let b_minus_c = b_star - c;
            let l_minus_c = stop_loss - c;
            let g_l = self.g(kernel, stop_loss, r)?;
            let g_b = self.g(kernel, b_star, r)?;
            let f_l = self.f(kernel, stop_loss, r)?;
            let f_b = self.f(kernel, b_star, r)?;
            let denominator = f_b * g_l - f_l * g_b;
            let upper_weight = (b_minus_c * g_l - l_minus_c * g_b) / denominator;
            let lower_weight = (l_minus_c * f_b - b_minus_c * f_l) / denominator;
            Ok(upper_weight * self.f(kernel, x, r)? + lower_weight * self.g(kernel, x, r)?)
        } else {
            Ok(x - c)
        }
    }

    fn exit_residual(&self, kernel: &HittingTimeKernel, x: f64, r: f64, c: f64) -> Result<f64> {
        Ok(self.f(kernel, x, r)? - (x - c) * self.f_prime(kernel, x, r)?)
    }

    fn exit_residual_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        stop_loss: f64,
        r: f64,
        _c: f64,
    ) -> Result<f64> {
        // The stop-loss exit solves the stop-loss-free residual with the
        // stop-loss level as the discount rate and the rate as the cost.
        self.exit_residual(kernel, x, stop_loss, r)
    }

    fn entry_residual(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        let v_prime =
            adaptive_central_difference(|y| self.value(kernel, y, b_star, r, c), x)?;
        // The transport-term derivative is discounted at the exit level,
        // not at r.
        let g_prime = self.g_prime(kernel, x, b_star)?;
        Ok(self.g(kernel, x, r)? * (v_prime - 1.0)
            - g_prime * (self.value(kernel, x, b_star, r, c)? - x - c))
    }

    fn entry_residual_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        let v_prime = adaptive_central_difference(
            |y| self.value_with_stop_loss(kernel, y, b_star, stop_loss, r, c),
            x,
        )?;
        let g_prime = self.g_prime(kernel, x, b_star)?;
        Ok(self.g(kernel, x, r)? * (v_prime - 1.0)
            - g_prime
                * (self.value_with_stop_loss(kernel, x, b_star, stop_loss, r, c)? - x - c))
    }

    fn lower_entry_residual(
        &self,
        _kernel: &HittingTimeKernel,
        _x: f64,
        _b_star: f64,
        _r: f64,
        _c: f64,
    ) -> Result<f64> {
        Err(ModelError::NotApplicable(
            "lower entry level of the linear model is only defined with a stop loss".to_string(),
        ))
    }

    fn lower_entry_residual_with_stop_loss(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        stop_loss: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        let v_prime = adaptive_central_difference(
            |y| self.value_with_stop_loss(kernel, y, b_star, stop_loss, r, c),
            x,
        )?;
        let f_prime = self.f_prime(kernel, x, b_star)?;
        Ok(self.f(kernel, x, r)? * (v_prime - 1.0)
            - f_prime
                * (self.value_with_stop_loss(kernel, x, b_star, stop_loss, r, c)? - x - c))
    }
}

/// Exponential-payoff backend: reward `e^x - c` (price given as
/// log-price).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialMeanReversion;

impl ExponentialMeanReversion {
    pub fn new() -> Self {
        Self
    }

    fn not_applicable(operation: &str) -> ModelError {
        ModelError::NotApplicable(format!(
            "the exponential model does not define {operation} with a stop loss"
        ))
    }
}

impl OptimalTrading for ExponentialMeanReversion {
    fn value(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        if x < b_star {
            Ok((b_star.exp() - c) * self.f(kernel, x, r)? / self.f(kernel, b_star, r)?)
        } else {
            Ok(x.exp() - c)
        }
    }

    fn value_with_stop_loss(
        &self,
        _kernel: &HittingTimeKernel,
        _x: f64,
        _b_star: f64,
        _stop_loss: f64,
        _r: f64,
        _c: f64,
    ) -> Result<f64> {
        Err(Self::not_applicable("the value function"))
    }

    fn exit_residual(&self, kernel: &HittingTimeKernel, x: f64, r: f64, c: f64) -> Result<f64> {
        Ok(x.exp() * self.f(kernel, x, r)? - (x.exp() - c) * self.f_prime(kernel, x, r)?)
    }

    fn exit_residual_with_stop_loss(
        &self,
        _kernel: &HittingTimeKernel,
        _x: f64,
        _stop_loss: f64,
        _r: f64,
        _c: f64,
    ) -> Result<f64> {
        Err(Self::not_applicable("the exit level"))
    }

    fn entry_residual(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        let v_prime =
            adaptive_central_difference(|y| self.value(kernel, y, b_star, r, c), x)?;
        // The transport-term derivative is discounted at the exit level,
        // not at r.
        let g_prime = self.g_prime(kernel, x, b_star)?;
        Ok(self.g(kernel, x, r)? * (v_prime - x.exp())
            - g_prime * (self.value(kernel, x, b_star, r, c)? - x.exp() - c))
    }

    fn entry_residual_with_stop_loss(
        &self,
        _kernel: &HittingTimeKernel,
        _x: f64,
        _b_star: f64,
        _stop_loss: f64,
        _r: f64,
        _c: f64,
    ) -> Result<f64> {
        Err(Self::not_applicable("the entry level"))
    }

    fn lower_entry_residual(
        &self,
        kernel: &HittingTimeKernel,
        x: f64,
        b_star: f64,
        r: f64,
        c: f64,
    ) -> Result<f64> {
        let v_prime =
            adaptive_central_difference(|y| self.value(kernel, y, b_star, r, c), x)?;
        let f_prime = self.f_prime(kernel, x, b_star)?;
        Ok(self.f(kernel, x, r)? * (v_prime - x.exp())
            - f_prime * (self.value(kernel, x, b_star, r, c)? - x.exp() - c))
    }

    fn lower_entry_residual_with_stop_loss(
        &self,
        _kernel: &HittingTimeKernel,
        _x: f64,
        _b_star: f64,
        _stop_loss: f64,
        _r: f64,
        _c: f64,
    ) -> Result<f64> {
        Err(Self::not_applicable("the lower entry level"))
    }
}
