//! Mean-reverting SDE models: moments and one-step Euler-Maruyama
//! simulation.

pub mod general_linear;
pub mod ornstein_uhlenbeck;

pub use general_linear::GeneralLinearModel;
pub use ornstein_uhlenbeck::OrnsteinUhlenbeckModel;
