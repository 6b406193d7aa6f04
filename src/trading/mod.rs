//! Optimal mean-reversion trading: discounted-reward value functions and
//! the entry/exit threshold solver.

pub mod levels;
pub mod optimizers;

pub use levels::{ExponentialTradingLevels, OrnsteinUhlenbeckTradingLevels, TradingLevels};
pub use optimizers::{ExponentialMeanReversion, LinearMeanReversion, OptimalTrading};
