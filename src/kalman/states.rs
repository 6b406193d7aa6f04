//! KCA filter state and the predict/update equations.

use nalgebra::{Matrix1x3, Matrix3, Vector3};

use crate::error::{ModelError, NumericError, Result};
use crate::likelihood::GeneralLinearLikelihood;

/// Dimension of the kinetic state vector (level, velocity, acceleration).
pub const STATE_DIMENSION: usize = 3;
/// Dimension of the observation.
pub const OBSERVATION_DIMENSION: usize = 1;

/// Fitted General-Linear dynamics embedded in the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSde {
    pub mu: f64,
    pub sigma: f64,
    pub conditional_variance: f64,
}

/// Complete state bundle of the KCA filter.
///
/// Lifecycle: constructed empty, `initialise` fits the transition from a
/// series, then `predict`/`update` cycles alternate. `update` refuses to
/// run unless a `predict` has produced valid priors; both refuse to run
/// on an uninitialised filter. Failed calls leave the state untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct KcaState {
    transition_matrix: Matrix3<f64>,
    transition_covariance: Matrix3<f64>,
    observation_matrix: Matrix1x3<f64>,
    observation_offset: f64,
    current_state_mean: Vector3<f64>,
    current_state_covariance: Matrix3<f64>,
    predicted_state_mean: Vector3<f64>,
    predicted_state_covariance: Matrix3<f64>,
    predicted_observation_mean: f64,
    predicted_observation_covariance: f64,
    sde: FilterSde,
    initialised: bool,
    priors_valid: bool,
}

impl Default for KcaState {
    fn default() -> Self {
        Self::new()
    }
}

impl KcaState {
    /// Empty, uninitialised state.
    pub fn new() -> Self {
        Self {
            transition_matrix: Matrix3::zeros(),
            transition_covariance: Matrix3::zeros(),
            observation_matrix: Matrix1x3::zeros(),
            observation_offset: 0.0,
            current_state_mean: Vector3::zeros(),
            current_state_covariance: Matrix3::zeros(),
            predicted_state_mean: Vector3::zeros(),
            predicted_state_covariance: Matrix3::zeros(),
            predicted_observation_mean: 0.0,
            predicted_observation_covariance: 0.0,
            sde: FilterSde::default(),
            initialised: false,
            priors_valid: false,
        }
    }

    /// Fit the transition dynamics from `series` and set the initial
    /// state.
    ///
    /// `h` is the sampling step entering the kinematic transition and
    /// `q` the process noise of the velocity and acceleration
    /// components.
    pub fn initialise(&mut self, series: &[f64], h: f64, q: f64) -> Result<()> {
        let last = series.last().copied().ok_or_else(|| {
            ModelError::InvalidArgument("observation series must not be empty".to_string())
        })?;
        let likelihood = GeneralLinearLikelihood::new();
        let components = likelihood.components(series)?;
        let parameters = likelihood.parameters(&components);
        let conditional_variance = parameters.conditional_variance();
        let exp_mu = parameters.mu.exp();

        self.sde = FilterSde {
            mu: parameters.mu,
            sigma: parameters.sigma,
            conditional_variance,
        };
        self.transition_matrix =
            Matrix3::new(exp_mu, h, 0.5 * h * h, 0.0, 1.0, h, 0.0, 0.0, 1.0);
        self.transition_covariance =
            Matrix3::from_diagonal(&Vector3::new(conditional_variance, q, q));
        self.observation_matrix = Matrix1x3::new(1.0, 0.0, 0.0);
        self.observation_offset = 0.0;
        self.current_state_mean = Vector3::new(last * exp_mu, 0.0, 0.0);
        self.current_state_covariance = Matrix3::zeros();
        self.initialised = true;
        self.priors_valid = false;
        Ok(())
    }

    /// Predict step: roll the posterior through the transition.
    pub fn predict(&mut self) -> Result<()> {
        if !self.initialised {
            return Err(ModelError::NotInitialised(
                "the KCA kalman filter has not been initialised".to_string(),
            ));
        }
        self.predicted_state_mean = self.transition_matrix * self.current_state_mean;
        self.predicted_state_covariance = self.transition_matrix
            * self.current_state_covariance
            * self.transition_matrix.transpose()
            + self.transition_covariance;
        self.priors_valid = true;
        Ok(())
    }

    /// Update step: fold one observation into the predicted state.
    pub fn update(&mut self, observation: f64, innovation_sigma: f64) -> Result<()> {
        if !self.initialised {
            return Err(ModelError::NotInitialised(
                "the KCA kalman filter has not been initialised".to_string(),
            ));
        }
        if !self.priors_valid {
            return Err(ModelError::InvalidOperation(
                "the KCA kalman filter priors must be valid before updating the posterior"
                    .to_string(),
            ));
        }

        let predicted_observation_mean =
            (self.observation_matrix * self.predicted_state_mean)[0] + self.observation_offset;
        let predicted_observation_covariance = (self.observation_matrix
            * self.predicted_state_covariance
            * self.observation_matrix.transpose())[(0, 0)]
            + innovation_sigma * innovation_sigma;
        if predicted_observation_covariance == 0.0 {
            return Err(NumericError::ZeroDivision.into());
        }

        // The observation covariance is 1x1, so the gain reduces to a
        // scalar division.
        let kalman_gain = self.predicted_state_covariance
            * self.observation_matrix.transpose()
            / predicted_observation_covariance;
        let innovation = observation - predicted_observation_mean;

        let current_state_mean = self.predicted_state_mean + kalman_gain * innovation;
        let current_state_covariance = self.predicted_state_covariance
            - kalman_gain * self.observation_matrix * self.predicted_state_covariance;

        // Nothing is assigned until every product has been formed, so a
        // failure above cannot leave the state half-written.
        self.predicted_observation_mean = predicted_observation_mean;
        self.predicted_observation_covariance = predicted_observation_covariance;
        self.current_state_mean = current_state_mean;
        self.current_state_covariance = current_state_covariance;
        self.priors_valid = false;
        Ok(())
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub fn priors_valid(&self) -> bool {
        self.priors_valid
    }

    pub fn sde(&self) -> &FilterSde {
        &self.sde
    }

    pub fn transition_matrix(&self) -> &Matrix3<f64> {
        &self.transition_matrix
    }

    pub fn transition_covariance(&self) -> &Matrix3<f64> {
        &self.transition_covariance
    }

    pub fn observation_matrix(&self) -> &Matrix1x3<f64> {
        &self.observation_matrix
    }

    pub fn observation_offset(&self) -> f64 {
        self.observation_offset
    }

    pub fn current_state_mean(&self) -> &Vector3<f64> {
        &self.current_state_mean
    }

    pub fn current_state_covariance(&self) -> &Matrix3<f64> {
        &self.current_state_covariance
    }

    pub fn predicted_state_mean(&self) -> &Vector3<f64> {
        &self.predicted_state_mean
    }

    pub fn predicted_state_covariance(&self) -> &Matrix3<f64> {
        &self.predicted_state_covariance
    }

    pub fn predicted_observation_mean(&self) -> f64 {
        self.predicted_observation_mean
    }

    pub fn predicted_observation_covariance(&self) -> f64 {
        self.predicted_observation_covariance
    }

    /// Rebuild a state from externally supplied matrices, as the codec
    /// does when restoring a serialised filter. The restored state is
    /// initialised with stale priors, so a `predict` must precede the
    /// next `update`.
    pub(crate) fn from_parts(
        transition_matrix: Matrix3<f64>,
        transition_covariance: Matrix3<f64>,
        observation_matrix: Matrix1x3<f64>,
        observation_offset: f64,
        current_state_mean: Vector3<f64>,
        current_state_covariance: Matrix3<f64>,
    ) -> Self {
        Self {
            transition_matrix,
            transition_covariance,
            observation_matrix,
            observation_offset,
            current_state_mean,
            current_state_covariance,
            predicted_state_mean: Vector3::zeros(),
            predicted_state_covariance: Matrix3::zeros(),
            predicted_observation_mean: 0.0,
            predicted_observation_covariance: 0.0,
            sde: FilterSde::default(),
            initialised: true,
            priors_valid: false,
        }
    }
}
