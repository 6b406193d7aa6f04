//! KCA filter lifecycle and state codec behaviour through the flat
//! entry points.

use stochastic_models::{
    get_initialised_kca_state, get_updated_kca_state, KineticComponents, ModelError,
};

const SERIES: [f64; 20] = [
    10.51255, 10.51985, 10.52405, 10.4656, 10.47, 10.5403, 10.4425, 10.3087, 10.1994, 10.1839,
    10.24645, 10.1795, 10.21715, 10.14995, 10.194, 10.22505, 10.27325, 10.25095, 10.30575,
    10.27645,
];

const DIMENSIONS: &str = "{\"observation_covariance_columns\":1,\
\"observation_covariance_rows\":1,\"observation_matrix_columns\":3,\
\"observation_matrix_rows\":1,\"observation_offset\":0.0,\
\"state_covariance_columns\":3,\"state_covariance_rows\":3,\
\"state_mean_dimension\":3}";

fn field<'a>(json: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    json.get(name).unwrap_or_else(|| panic!("missing {name}"))
}

#[test]
fn initialised_state_matches_reference() {
    let blob = get_initialised_kca_state(&SERIES, 1.0, 0.001, DIMENSIONS).unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();

    let transition = field(&json, "transition_matrix");
    assert!((transition[0][0].as_f64().unwrap() - 1.0011961162353782).abs() < 1e-12);
    assert_eq!(transition[0][1].as_f64().unwrap(), 1.0);
    assert_eq!(transition[0][2].as_f64().unwrap(), 0.5);
    assert_eq!(transition[1][2].as_f64().unwrap(), 1.0);

    let covariance = field(&json, "transition_covariance");
    assert!((covariance[0][0].as_f64().unwrap() - 0.12695229227341848).abs() < 1e-11);
    assert_eq!(covariance[1][1].as_f64().unwrap(), 0.001);

    let mean = field(&json, "current_state_mean");
    assert!((mean[0].as_f64().unwrap() - 10.288741828687053).abs() < 1e-11);
    assert_eq!(mean[1].as_f64().unwrap(), 0.0);

    let observation = field(&json, "observation_matrix");
    assert_eq!(observation[0][0].as_f64().unwrap(), 1.0);
    assert_eq!(observation[0][1].as_f64().unwrap(), 0.0);
    assert_eq!(field(&json, "observation_offset").as_f64().unwrap(), 0.0);
}

#[test]
fn updated_state_matches_reference() {
    let initial = get_initialised_kca_state(&SERIES, 1.0, 0.001, DIMENSIONS).unwrap();
    let updated = get_updated_kca_state(&initial, DIMENSIONS, 10.3, 0.1).unwrap();
    let json: serde_json::Value = serde_json::from_str(&updated).unwrap();

    let mean = field(&json, "current_state_mean");
    assert!(
        (mean[0].as_f64().unwrap() - 10.3000765492722).abs() < 1e-10,
        "mean {}",
        mean[0]
    );
    assert_eq!(mean[1].as_f64().unwrap(), 0.0);
    assert_eq!(mean[2].as_f64().unwrap(), 0.0);

    let covariance = field(&json, "current_state_covariance");
    assert!((covariance[0][0].as_f64().unwrap() - 0.009269818720519449).abs() < 1e-12);
    assert!((covariance[1][1].as_f64().unwrap() - 0.001).abs() < 1e-15);

    // The transition block is untouched by the cycle.
    let transition = field(&json, "transition_matrix");
    assert!((transition[0][0].as_f64().unwrap() - 1.0011961162353782).abs() < 1e-12);
}

#[test]
fn state_blob_round_trips_through_update_entry_point() {
    let initial = get_initialised_kca_state(&SERIES, 1.0, 0.001, DIMENSIONS).unwrap();
    let once = get_updated_kca_state(&initial, DIMENSIONS, 10.3, 0.1).unwrap();
    let twice = get_updated_kca_state(&once, DIMENSIONS, 10.31, 0.1).unwrap();
    // Successive cycles stay finite and parse cleanly.
    let json: serde_json::Value = serde_json::from_str(&twice).unwrap();
    let mean = field(&json, "current_state_mean");
    assert!(mean[0].as_f64().unwrap().is_finite());
    // Keys come out sorted.
    let c = twice.find("current_state_covariance").unwrap();
    let t = twice.find("transition_matrix").unwrap();
    assert!(c < t);
}

#[test]
fn update_requires_predict_cycle() {
    let mut filter = KineticComponents::new();
    filter.initialise(&SERIES, 1.0, 0.001).unwrap();
    let before = filter.current_state();
    let result = filter.update(10.3, 0.1);
    assert!(matches!(result, Err(ModelError::InvalidOperation(_))));
    assert_eq!(filter.current_state(), before);
}

#[test]
fn uninitialised_filter_rejects_all_operations() {
    let mut filter = KineticComponents::new();
    assert!(matches!(
        filter.predict(),
        Err(ModelError::NotInitialised(_))
    ));
    assert!(matches!(
        filter.update(1.0, 0.1),
        Err(ModelError::NotInitialised(_))
    ));
}

#[test]
fn malformed_blobs_raise_state_parse() {
    assert!(matches!(
        get_initialised_kca_state(&SERIES, 1.0, 0.001, "{"),
        Err(ModelError::StateParse(_))
    ));
    assert!(matches!(
        get_updated_kca_state("not a state", DIMENSIONS, 10.3, 0.1),
        Err(ModelError::StateParse(_))
    ));
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let wrong = DIMENSIONS.replace(
        "\"observation_matrix_columns\":3",
        "\"observation_matrix_columns\":2",
    );
    assert!(matches!(
        get_initialised_kca_state(&SERIES, 1.0, 0.001, &wrong),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn short_series_is_rejected() {
    assert!(matches!(
        get_initialised_kca_state(&[10.0], 1.0, 0.001, DIMENSIONS),
        Err(ModelError::InvalidArgument(_))
    ));
}
