//! End-to-end scenarios through the flat entry points.

use stochastic_models::{
    general_linear_maximum_likelihood, hitting_time_density_ou, optimal_entry_level_exponential,
    optimal_entry_level_lower, optimal_entry_level_lower_exponential,
    optimal_entry_level_with_stop_loss, optimal_exit_level, optimal_exit_level_exponential,
    optimal_exit_level_exponential_with_stop_loss, optimal_exit_level_with_stop_loss,
    ou_maximum_likelihood, simulate_ornstein_uhlenbeck, ModelError,
};

const PRICE_SERIES: [f64; 20] = [
    1094.1, 1104.1, 1107.7, 1123.6, 1115.6, 1112.7, 1118.4, 1116.9, 1127.9, 1153.2, 1159.6,
    1153.6, 1138.3, 1124.6, 1122.6, 1134.0, 1132.5, 1139.8, 1133.6, 1124.5,
];

#[test]
fn ou_maximum_likelihood_reference_series() {
    let params = ou_maximum_likelihood(&[0.5, 0.25, 0.5, 0.75, 1.5, 0.5]).unwrap();
    assert!((params.mu - 0.58333333).abs() < 1e-5);
    assert!((params.alpha - 1.06784063).abs() < 1e-5);
    assert!((params.sigma - 0.15277777).abs() < 1e-5);
}

#[test]
fn general_linear_maximum_likelihood_reference_series() {
    let params = general_linear_maximum_likelihood(&PRICE_SERIES).unwrap();
    assert!((params.mu - (-0.00143647)).abs() < 1e-4);
    assert!((params.sigma - 10.4573).abs() < 1e-4);
}

#[test]
fn hitting_time_density_reference_value() {
    let value = hitting_time_density_ou(1.02, 0.998, 0.0045, 0.0038, 1.04, 1.0).unwrap();
    assert!((value - 0.43046005).abs() < 1e-5);
}

#[test]
fn exit_level_linear() {
    let b_star = optimal_exit_level(0.3, 8.0, 0.3, 0.05, 0.02).unwrap();
    assert!((b_star - 0.466836).abs() < 1e-5, "b* {b_star}");
}

#[test]
fn exit_level_linear_with_stop_loss() {
    let b_star = optimal_exit_level_with_stop_loss(0.3, 8.0, 0.3, 0.05, 0.05, 0.02).unwrap();
    assert!((b_star - 0.46912012).abs() < 1e-5, "b* {b_star}");
}

#[test]
fn entry_level_linear_with_stop_loss() {
    let d_star =
        optimal_entry_level_with_stop_loss(0.450895, 0.3, 8.0, 0.3, 0.05, 0.05, 0.02).unwrap();
    assert!((d_star - 0.136755).abs() < 1e-5, "d* {d_star}");
}

#[test]
fn lower_entry_level_linear_with_stop_loss() {
    let a_star =
        optimal_entry_level_lower(0.136755, 0.450895, 0.3, 8.0, 0.3, 0.05, 0.05, 0.02).unwrap();
    assert!((a_star - 0.118451).abs() < 1e-5, "a* {a_star}");
}

#[test]
fn exit_level_exponential() {
    let b_star = optimal_exit_level_exponential(1.3499, 5.0, 0.15, 0.05, 0.02).unwrap();
    assert!((b_star - 1.4093).abs() < 1e-4, "b* {b_star}");
}

#[test]
fn entry_level_exponential() {
    let d_star = optimal_entry_level_exponential(1.4093, 1.3499, 5.0, 0.15, 0.05, 0.02).unwrap();
    assert!((d_star - 1.24096).abs() < 1e-4, "d* {d_star}");
}

#[test]
fn lower_entry_level_exponential() {
    let a_star =
        optimal_entry_level_lower_exponential(1.24096, 1.4093, 1.3499, 5.0, 0.15, 0.05, 0.02)
            .unwrap();
    assert!((a_star - 1.16016).abs() < 2e-4, "a* {a_star}");
}

#[test]
fn exponential_stop_loss_exit_is_not_applicable() {
    let result = optimal_exit_level_exponential_with_stop_loss(1.3499, 5.0, 0.15, 0.05, 0.05, 0.02);
    assert!(matches!(result, Err(ModelError::NotApplicable(_))));
}

#[test]
fn degenerate_reversion_speed_fails_numerically() {
    // Near-zero alpha blows the trading integrals up; the solver must
    // surface a numeric failure rather than crash.
    let exit = optimal_exit_level_exponential(1.818978, 0.000116, 0.006623, 0.05, 0.02);
    assert!(matches!(exit, Err(ModelError::Numeric(_))), "{exit:?}");
    let entry = stochastic_models::optimal_entry_level(0.750895, 1.818978, 0.000116, 0.006623, 0.05, 0.02);
    assert!(matches!(entry, Err(ModelError::Numeric(_))), "{entry:?}");
}

#[test]
fn simulated_path_recovers_parameters() {
    let mu = 0.5;
    let alpha = 1.2;
    let sigma = 0.3;
    let n = 1_000_000;

    let mut model =
        stochastic_models::OrnsteinUhlenbeckModel::with_seed(mu, alpha, sigma, 20240117).unwrap();
    let path = model.simulate(mu, n, 1.0);
    let params = ou_maximum_likelihood(&path).unwrap();

    // The estimator's sigma is the variance-like closed form; compare
    // against the same transform of the true parameters.
    let sigma_transform =
        sigma * sigma * 2.0 * (-alpha).exp() / (1.0 - (-2.0 * alpha).exp());
    assert!((params.mu - mu).abs() / mu < 0.02, "mu {}", params.mu);
    assert!((params.alpha - alpha).abs() / alpha < 0.02, "alpha {}", params.alpha);
    assert!(
        (params.sigma - sigma_transform).abs() / sigma_transform < 0.02,
        "sigma {}",
        params.sigma
    );
}

#[test]
fn simulation_length_and_start() {
    let path = simulate_ornstein_uhlenbeck(0.5, 1.0, 0.1, 0.7, 250, 1.0).unwrap();
    assert_eq!(path.len(), 250);
    assert_eq!(path[0], 0.7);
    assert!(path.iter().all(|x| x.is_finite()));
}

#[test]
fn invalid_model_parameters_are_rejected() {
    assert!(matches!(
        optimal_exit_level(0.3, -1.0, 0.3, 0.05, 0.02),
        Err(ModelError::InvalidArgument(_))
    ));
    assert!(matches!(
        simulate_ornstein_uhlenbeck(0.0, 1.0, 0.0, 0.0, 10, 1.0),
        Err(ModelError::InvalidArgument(_))
    ));
    assert!(matches!(
        ou_maximum_likelihood(&[1.0]),
        Err(ModelError::InvalidArgument(_))
    ));
}
