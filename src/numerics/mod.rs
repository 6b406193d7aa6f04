//! Numerical primitives: quadrature, differentiation and root finding.

pub mod differentiation;
pub mod integration;
pub mod solvers;

pub use differentiation::{adaptive_central_difference, DIFFERENTIATION_STEP};
pub use integration::{
    adaptive_integration, semi_infinite_integration_upper, INTEGRATION_EPSREL, MAX_SUBDIVISIONS,
};
pub use solvers::{brent, BRENT_EPSREL, BRENT_MAX_ITERATIONS};
