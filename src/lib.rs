//! Numerical toolkit for one-dimensional mean-reverting stochastic
//! processes.
//!
//! The crate covers three tightly coupled subsystems:
//!
//! - Closed-form maximum-likelihood estimation for the
//!   Ornstein-Uhlenbeck and General-Linear SDEs, with O(1) online
//!   updates over running sufficient statistics.
//! - A Kinetic-Components-Analysis Kalman filter (level, velocity,
//!   acceleration) whose transition dynamics are fitted from the
//!   observation series, with a round-trippable JSON state codec.
//! - Optimal mean-reversion trading thresholds: entry, exit and
//!   lower-entry levels obtained as roots of residuals built from
//!   semi-infinite integrals of the OU hitting-time kernels, for
//!   linear and exponential (log-price) payoffs, with a stop-loss
//!   variant on the linear payoff.
//!
//! Everything is single-threaded and value-typed; the only source of
//! nondeterminism is the Gaussian sampler, which is seedable.

pub mod distributions;
pub mod error;
pub mod hitting_times;
pub mod interface;
pub mod kalman;
pub mod likelihood;
pub mod numerics;
pub mod sde;
pub mod trading;

pub use distributions::GaussianDistribution;
pub use error::{ModelError, NumericError, Result};
pub use hitting_times::{hitting_time_density, HittingTimeKernel};
pub use interface::*;
pub use kalman::{FilterSystemDimensions, KcaState, KineticComponents};
pub use likelihood::{
    GeneralLinearComponents, GeneralLinearLikelihood, GeneralLinearParameters,
    GeneralLinearUpdater, OrnsteinUhlenbeckComponents, OrnsteinUhlenbeckLikelihood,
    OrnsteinUhlenbeckParameters, OrnsteinUhlenbeckUpdater,
};
pub use sde::{GeneralLinearModel, OrnsteinUhlenbeckModel};
pub use trading::{
    ExponentialMeanReversion, ExponentialTradingLevels, LinearMeanReversion, OptimalTrading,
    OrnsteinUhlenbeckTradingLevels, TradingLevels,
};
