//! Flat entry points: the outermost surface of the library.
//!
//! Each function is stateless and orchestrates the model, likelihood,
//! trading and filter layers; richer stateful workflows are available on
//! the underlying types.

use crate::error::Result;
use crate::hitting_times::{hitting_time_density, HittingTimeKernel};
use crate::kalman::{parse_dimensions, parse_state, serialize_state, KineticComponents};
use crate::likelihood::{
    GeneralLinearComponents, GeneralLinearLikelihood, GeneralLinearParameters,
    GeneralLinearUpdater, OrnsteinUhlenbeckComponents, OrnsteinUhlenbeckLikelihood,
    OrnsteinUhlenbeckParameters, OrnsteinUhlenbeckUpdater,
};
use crate::sde::OrnsteinUhlenbeckModel;
use crate::trading::{ExponentialTradingLevels, OrnsteinUhlenbeckTradingLevels};

/// Simulate `size` samples of an OU process.
pub fn simulate_ornstein_uhlenbeck(
    mu: f64,
    alpha: f64,
    sigma: f64,
    start: f64,
    size: usize,
    dt: f64,
) -> Result<Vec<f64>> {
    let mut model = OrnsteinUhlenbeckModel::new(mu, alpha, sigma)?;
    Ok(model.simulate(start, size, dt))
}

/// Closed-form OU maximum-likelihood estimate of a series.
pub fn ou_maximum_likelihood(series: &[f64]) -> Result<OrnsteinUhlenbeckParameters> {
    let likelihood = OrnsteinUhlenbeckLikelihood::new();
    let components = likelihood.components(series)?;
    Ok(likelihood.parameters(&components))
}

/// OU component bundle of a series, for callers tracking their own
/// online state.
pub fn ou_likelihood_components(series: &[f64]) -> Result<OrnsteinUhlenbeckComponents> {
    OrnsteinUhlenbeckLikelihood::new().components(series)
}

/// One online OU update: fold `(new, last)` into `components` and
/// return the refreshed parameters.
pub fn update_ou(
    parameters: OrnsteinUhlenbeckParameters,
    components: OrnsteinUhlenbeckComponents,
    new_observation: f64,
    last_observation: f64,
) -> OrnsteinUhlenbeckParameters {
    let mut updater = OrnsteinUhlenbeckUpdater::new(components, parameters);
    updater.update(new_observation, last_observation)
}

/// Closed-form General-Linear maximum-likelihood estimate of a series.
pub fn general_linear_maximum_likelihood(series: &[f64]) -> Result<GeneralLinearParameters> {
    let likelihood = GeneralLinearLikelihood::new();
    let components = likelihood.components(series)?;
    Ok(likelihood.parameters(&components))
}

/// General-Linear component bundle of a series.
pub fn general_linear_likelihood_components(series: &[f64]) -> Result<GeneralLinearComponents> {
    GeneralLinearLikelihood::new().components(series)
}

/// One online General-Linear update.
pub fn update_general_linear_sde(
    parameters: GeneralLinearParameters,
    components: GeneralLinearComponents,
    new_observation: f64,
    last_observation: f64,
) -> GeneralLinearParameters {
    let mut updater = GeneralLinearUpdater::new(components, parameters);
    updater.update(new_observation, last_observation)
}

/// Probability that an OU process at `x` hits `first` before `second`.
pub fn hitting_time_density_ou(
    x: f64,
    mu: f64,
    alpha: f64,
    sigma: f64,
    first: f64,
    second: f64,
) -> Result<f64> {
    let kernel = HittingTimeKernel::new(mu, alpha, sigma);
    hitting_time_density(&kernel, x, first, second)
}

/// Optimal exit level `b*` for the linear payoff.
pub fn optimal_exit_level(mu: f64, alpha: f64, sigma: f64, r: f64, c: f64) -> Result<f64> {
    OrnsteinUhlenbeckTradingLevels::new(mu, alpha, sigma)?.optimal_exit(r, c)
}

/// Optimal exit level `b*` for the linear payoff with a stop-loss.
pub fn optimal_exit_level_with_stop_loss(
    mu: f64,
    alpha: f64,
    sigma: f64,
    stop_loss: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    OrnsteinUhlenbeckTradingLevels::new(mu, alpha, sigma)?
        .optimal_exit_with_stop_loss(stop_loss, r, c)
}

/// Optimal exit level `b*` for the exponential (log-price) payoff.
pub fn optimal_exit_level_exponential(
    mu: f64,
    alpha: f64,
    sigma: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    ExponentialTradingLevels::new(mu, alpha, sigma)?.optimal_exit(r, c)
}

/// Stop-loss exit on the exponential payoff; always fails as not
/// applicable.
pub fn optimal_exit_level_exponential_with_stop_loss(
    mu: f64,
    alpha: f64,
    sigma: f64,
    stop_loss: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    ExponentialTradingLevels::new(mu, alpha, sigma)?
        .optimal_exit_with_stop_loss(stop_loss, r, c)
}

/// Optimal entry level `d*` for the linear payoff.
pub fn optimal_entry_level(
    b_star: f64,
    mu: f64,
    alpha: f64,
    sigma: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    OrnsteinUhlenbeckTradingLevels::new(mu, alpha, sigma)?.optimal_entry(b_star, r, c)
}

/// Optimal entry level `d*` for the linear payoff with a stop-loss.
pub fn optimal_entry_level_with_stop_loss(
    b_star: f64,
    mu: f64,
    alpha: f64,
    sigma: f64,
    stop_loss: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    OrnsteinUhlenbeckTradingLevels::new(mu, alpha, sigma)?
        .optimal_entry_with_stop_loss(b_star, stop_loss, r, c)
}

/// Optimal entry level `d*` for the exponential payoff.
pub fn optimal_entry_level_exponential(
    b_star: f64,
    mu: f64,
    alpha: f64,
    sigma: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    ExponentialTradingLevels::new(mu, alpha, sigma)?.optimal_entry(b_star, r, c)
}

/// Lower entry boundary `a*` for the linear payoff with a stop-loss.
pub fn optimal_entry_level_lower(
    d_star: f64,
    b_star: f64,
    mu: f64,
    alpha: f64,
    sigma: f64,
    stop_loss: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    OrnsteinUhlenbeckTradingLevels::new(mu, alpha, sigma)?
        .optimal_entry_lower_with_stop_loss(d_star, b_star, stop_loss, r, c)
}

/// Lower entry boundary `a*` for the exponential payoff.
pub fn optimal_entry_level_lower_exponential(
    d_star: f64,
    b_star: f64,
    mu: f64,
    alpha: f64,
    sigma: f64,
    r: f64,
    c: f64,
) -> Result<f64> {
    ExponentialTradingLevels::new(mu, alpha, sigma)?
        .optimal_entry_lower(d_star, b_star, r, c)
}

/// Initialise a KCA filter on `series` and return its serialised state.
pub fn get_initialised_kca_state(
    series: &[f64],
    h: f64,
    q: f64,
    system_dimensions: &str,
) -> Result<String> {
    parse_dimensions(system_dimensions)?;
    let mut kinetic_components = KineticComponents::new();
    kinetic_components.initialise(series, h, q)?;
    serialize_state(kinetic_components.filter_state())
}

/// Run one predict/update cycle on a serialised KCA state and return
/// the refreshed serialised state.
pub fn get_updated_kca_state(
    state: &str,
    system_dimensions: &str,
    observation: f64,
    innovation_sigma: f64,
) -> Result<String> {
    let dimensions = parse_dimensions(system_dimensions)?;
    let internal_state = parse_state(state, &dimensions)?;

    let mut kinetic_components = KineticComponents::new();
    kinetic_components.set_filter_state(internal_state);
    kinetic_components.predict()?;
    kinetic_components.update(observation, innovation_sigma)?;

    serialize_state(kinetic_components.filter_state())
}
