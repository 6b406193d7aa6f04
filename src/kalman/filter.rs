//! High-level facade over the KCA filter state.

use crate::error::{ModelError, Result};
use crate::kalman::states::KcaState;

/// Owner of a KCA filter instance.
///
/// Wraps the raw state machine with contextual error messages while
/// preserving the failure kinds, and exposes the posterior mean as the
/// filter output.
#[derive(Debug, Clone, Default)]
pub struct KineticComponents {
    state: KcaState,
}

impl KineticComponents {
    pub fn new() -> Self {
        Self {
            state: KcaState::new(),
        }
    }

    /// Replace the internal state, e.g. with one restored by the codec.
    pub fn set_filter_state(&mut self, state: KcaState) {
        self.state = state;
    }

    pub fn filter_state(&self) -> &KcaState {
        &self.state
    }

    pub fn is_initialised(&self) -> bool {
        self.state.is_initialised()
    }

    pub fn priors_valid(&self) -> bool {
        self.state.priors_valid()
    }

    /// Posterior state mean (level, velocity, acceleration).
    pub fn current_state(&self) -> Vec<f64> {
        self.state.current_state_mean().iter().copied().collect()
    }

    /// Fit the filter to `series` with sampling step `h` and process
    /// noise `q`.
    pub fn initialise(&mut self, series: &[f64], h: f64, q: f64) -> Result<()> {
        self.state.initialise(series, h, q)
    }

    /// Advance the prior state through the transition.
    pub fn predict(&mut self) -> Result<()> {
        self.state.predict().map_err(|e| match e {
            ModelError::NotInitialised(msg) => ModelError::NotInitialised(format!(
                "error when updating the prior kinetic components state: {msg}"
            )),
            other => other,
        })
    }

    /// Fold one observation into the posterior state.
    pub fn update(&mut self, observation: f64, innovation_sigma: f64) -> Result<()> {
        self.state
            .update(observation, innovation_sigma)
            .map_err(|e| match e {
                ModelError::InvalidOperation(msg) => ModelError::InvalidOperation(format!(
                    "error when updating the posterior kinetic components state: {msg}"
                )),
                ModelError::NotInitialised(msg) => ModelError::NotInitialised(format!(
                    "error when updating the posterior kinetic components state: {msg}"
                )),
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_enforced() {
        let mut filter = KineticComponents::new();
        assert!(!filter.is_initialised());
        assert!(matches!(
            filter.predict(),
            Err(ModelError::NotInitialised(_))
        ));
        assert!(matches!(
            filter.update(1.0, 0.1),
            Err(ModelError::NotInitialised(_))
        ));

        let series = [1.0, 1.1, 1.05, 1.2, 1.15, 1.3];
        filter.initialise(&series, 1.0, 0.001).unwrap();
        assert!(filter.is_initialised());
        assert!(matches!(
            filter.update(1.25, 0.1),
            Err(ModelError::InvalidOperation(_))
        ));
        filter.predict().unwrap();
        assert!(filter.priors_valid());
        filter.update(1.25, 0.1).unwrap();
        assert!(!filter.priors_valid());
    }

    #[test]
    fn current_state_has_kinetic_dimension() {
        let mut filter = KineticComponents::new();
        filter
            .initialise(&[2.0, 2.1, 2.05, 2.2], 1.0, 0.001)
            .unwrap();
        assert_eq!(filter.current_state().len(), 3);
    }
}
