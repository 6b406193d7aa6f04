//! Closed-form maximum-likelihood estimation for the supported SDEs,
//! with O(1) online update paths over running sufficient statistics.

pub mod general_linear;
pub mod ornstein_uhlenbeck;

pub use general_linear::{
    GeneralLinearComponents, GeneralLinearLikelihood, GeneralLinearParameters,
    GeneralLinearUpdater,
};
pub use ornstein_uhlenbeck::{
    OrnsteinUhlenbeckComponents, OrnsteinUhlenbeckLikelihood, OrnsteinUhlenbeckParameters,
    OrnsteinUhlenbeckUpdater,
};
