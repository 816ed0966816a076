// src/validation/mod.rs

//! Checks for the invariants the engine depends on: power-of-two dimensions,
//! normalized state vectors and unitary gate matrices.

use crate::core::{AmplitudeVector, AutopsiError, Precision};
use crate::gates::GateMatrix;
use num_complex::Complex;

// --- Helper Functions ---

fn squared_norm<T: Precision>(amplitudes: &[Complex<T>]) -> f64 {
    amplitudes.iter().map(|c| -> f64 { c.norm_sqr().into() }).sum()
}

// --- Public Validation Functions ---

/// Checks that `dimension` is a power of two describing at least one qubit.
pub fn check_dimension(dimension: usize) -> Result<(), AutopsiError> {
    if dimension >= 2 && dimension.is_power_of_two() {
        Ok(())
    } else {
        Err(AutopsiError::InvalidDimension { dimension })
    }
}

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `AmplitudeVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to [`Precision::tolerance`].
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(AutopsiError::NotNormalized)` otherwise.
pub fn check_normalization<T: Precision>(
    state: &AmplitudeVector<T>,
    tolerance: Option<f64>,
) -> Result<(), AutopsiError> {
    let effective_tolerance = tolerance.unwrap_or_else(|| T::tolerance().into());
    let norm = squared_norm(state.as_slice());
    if (norm - 1.0).abs() > effective_tolerance {
        Err(AutopsiError::NotNormalized { norm })
    } else {
        Ok(())
    }
}

/// Checks that `matrix` satisfies `U U† = I` within `tolerance`
/// (default [`Precision::tolerance`]).
pub fn check_unitary<T: Precision>(
    matrix: &GateMatrix<T>,
    tolerance: Option<f64>,
) -> Result<(), AutopsiError> {
    let effective_tolerance = tolerance.unwrap_or_else(|| T::tolerance().into());
    let deviation: f64 = matrix.unitarity_deviation().into();
    if deviation > effective_tolerance {
        Err(AutopsiError::NotUnitary { deviation })
    } else {
        Ok(())
    }
}

/// Checks that a gate matrix can be applied to a state of `state_dim` entries.
pub fn check_compatible<T: Precision>(
    state_dim: usize,
    matrix: &GateMatrix<T>,
) -> Result<(), AutopsiError> {
    if matrix.dim() == state_dim {
        Ok(())
    } else {
        Err(AutopsiError::DimensionMismatch { expected: state_dim, actual: matrix.dim() })
    }
}

/// Performs the checks applied to every state handed to an engine:
/// dimension and normalization.
pub fn validate_state<T: Precision>(
    state: &AmplitudeVector<T>,
    norm_tolerance: Option<f64>,
) -> Result<(), AutopsiError> {
    check_dimension(state.dim())?;
    check_normalization(state, norm_tolerance)?;
    Ok(())
}
