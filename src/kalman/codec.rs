//! JSON codec for the externally visible KCA state.
//!
//! Both blobs are UTF-8 JSON documents. Field declaration order is
//! lexicographic so serialisation emits sorted keys; deserialisation
//! accepts keys in any order. `parse ∘ serialise` is the identity on
//! the represented fields.

use nalgebra::{Matrix1x3, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::kalman::states::{KcaState, OBSERVATION_DIMENSION, STATE_DIMENSION};

/// Dimensions of the filter system as carried in the external contract.
///
/// The filter itself is fixed at 3x1; the blob stays parameterised for
/// forward compatibility and is validated on parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSystemDimensions {
    pub observation_covariance_columns: usize,
    pub observation_covariance_rows: usize,
    pub observation_matrix_columns: usize,
    pub observation_matrix_rows: usize,
    pub observation_offset: f64,
    pub state_covariance_columns: usize,
    pub state_covariance_rows: usize,
    pub state_mean_dimension: usize,
}

impl FilterSystemDimensions {
    /// Check the declared dimensions against the structural 3x1 system.
    pub fn validate(&self) -> Result<()> {
        let expected = [
            (self.state_mean_dimension, STATE_DIMENSION, "state_mean_dimension"),
            (self.state_covariance_rows, STATE_DIMENSION, "state_covariance_rows"),
            (
                self.state_covariance_columns,
                STATE_DIMENSION,
                "state_covariance_columns",
            ),
            (
                self.observation_matrix_rows,
                OBSERVATION_DIMENSION,
                "observation_matrix_rows",
            ),
            (
                self.observation_matrix_columns,
                STATE_DIMENSION,
                "observation_matrix_columns",
            ),
            (
                self.observation_covariance_rows,
                OBSERVATION_DIMENSION,
                "observation_covariance_rows",
            ),
            (
                self.observation_covariance_columns,
                OBSERVATION_DIMENSION,
                "observation_covariance_columns",
            ),
        ];
        for (actual, wanted, name) in expected {
            if actual != wanted {
                return Err(ModelError::InvalidArgument(format!(
                    "unsupported filter dimension: {name} must be {wanted}, got {actual}"
                )));
            }
        }
        Ok(())
    }
}

/// Wire form of the serialisable filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct KcaStateBlob {
    current_state_covariance: Vec<Vec<f64>>,
    current_state_mean: Vec<f64>,
    observation_matrix: Vec<Vec<f64>>,
    observation_offset: f64,
    transition_covariance: Vec<Vec<f64>>,
    transition_matrix: Vec<Vec<f64>>,
}

/// Parse and validate a dimensions blob.
pub fn parse_dimensions(blob: &str) -> Result<FilterSystemDimensions> {
    let dimensions: FilterSystemDimensions = serde_json::from_str(blob)?;
    dimensions.validate()?;
    Ok(dimensions)
}

fn matrix3_rows(matrix: &Matrix3<f64>) -> Vec<Vec<f64>> {
    (0..STATE_DIMENSION)
        .map(|i| (0..STATE_DIMENSION).map(|j| matrix[(i, j)]).collect())
        .collect()
}

fn rows_to_matrix3(rows: &[Vec<f64>], field: &str) -> Result<Matrix3<f64>> {
    if rows.len() != STATE_DIMENSION || rows.iter().any(|r| r.len() != STATE_DIMENSION) {
        return Err(ModelError::StateParse(format!(
            "{field} must be a {STATE_DIMENSION}x{STATE_DIMENSION} matrix"
        )));
    }
    Ok(Matrix3::from_fn(|i, j| rows[i][j]))
}

/// Serialise the represented fields of `state` to a JSON document with
/// sorted keys.
pub fn serialize_state(state: &KcaState) -> Result<String> {
    let blob = KcaStateBlob {
        current_state_covariance: matrix3_rows(state.current_state_covariance()),
        current_state_mean: state.current_state_mean().iter().copied().collect(),
        observation_matrix: vec![state.observation_matrix().iter().copied().collect()],
        observation_offset: state.observation_offset(),
        transition_covariance: matrix3_rows(state.transition_covariance()),
        transition_matrix: matrix3_rows(state.transition_matrix()),
    };
    Ok(serde_json::to_string(&blob)?)
}

/// Restore a filter state from its JSON document.
///
/// The restored state is initialised with stale priors; a `predict`
/// must precede the next `update`.
pub fn parse_state(blob: &str, dimensions: &FilterSystemDimensions) -> Result<KcaState> {
    dimensions.validate()?;
    let blob: KcaStateBlob = serde_json::from_str(blob)?;

    let transition_matrix = rows_to_matrix3(&blob.transition_matrix, "transition_matrix")?;
    let transition_covariance =
        rows_to_matrix3(&blob.transition_covariance, "transition_covariance")?;
    let current_state_covariance =
        rows_to_matrix3(&blob.current_state_covariance, "current_state_covariance")?;

    if blob.current_state_mean.len() != dimensions.state_mean_dimension {
        return Err(ModelError::StateParse(format!(
            "current_state_mean must have dimension {}",
            dimensions.state_mean_dimension
        )));
    }
    let current_state_mean = Vector3::from_fn(|i, _| blob.current_state_mean[i]);

    if blob.observation_matrix.len() != dimensions.observation_matrix_rows
        || blob.observation_matrix[0].len() != dimensions.observation_matrix_columns
    {
        return Err(ModelError::StateParse(format!(
            "observation_matrix must be {}x{}",
            dimensions.observation_matrix_rows, dimensions.observation_matrix_columns
        )));
    }
    let observation_matrix = Matrix1x3::from_fn(|_, j| blob.observation_matrix[0][j]);

    Ok(KcaState::from_parts(
        transition_matrix,
        transition_covariance,
        observation_matrix,
        blob.observation_offset,
        current_state_mean,
        current_state_covariance,
    ))
}
