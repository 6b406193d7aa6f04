//! Kinetic Components Analysis: a position/velocity/acceleration Kalman
//! filter whose transition dynamics are fitted from the observation
//! series via the General-Linear MLE.

pub mod codec;
pub mod filter;
pub mod states;

pub use codec::{parse_dimensions, parse_state, serialize_state, FilterSystemDimensions};
pub use filter::KineticComponents;
pub use states::{FilterSde, KcaState, OBSERVATION_DIMENSION, STATE_DIMENSION};
