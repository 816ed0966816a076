// src/backend/mod.rs

//! The numeric capabilities the engine relies on: multiplying a row vector by
//! a matrix, squaring magnitudes, and drawing a weighted random index.
//!
//! [`CpuBackend`] is the in-process implementation. Other backends only need
//! to honour the same contract; the engine never inspects which one it holds.

use crate::core::{AutopsiError, Precision};
use crate::gates::GateMatrix;
use num_complex::Complex;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug_span;

/// Opaque name of a compute device (for example `"cpu"` or `"gpu:0"`).
///
/// The engine passes it through to [`Backend::vecmat`] unchanged and never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device(String);

impl Device {
    /// Wraps a device label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The device label.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Device {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Device {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Linear-algebra and sampling capabilities required by the engine.
pub trait Backend: fmt::Debug {
    /// Row vector × matrix: `out[j] = Σ_i state[i] · matrix[i][j]`.
    ///
    /// `device` is the caller's hint for where the multiply should run. It is
    /// only in effect for the duration of this call. Callers guarantee that
    /// `state.len() == matrix.dim()`.
    fn vecmat<T: Precision>(
        &self,
        state: &[Complex<T>],
        matrix: &GateMatrix<T>,
        device: Option<&Device>,
    ) -> Vec<Complex<T>>;

    /// Elementwise squared magnitude `|a_i|^2`.
    fn probabilities<T: Precision>(&self, state: &[Complex<T>]) -> Vec<T>;

    /// Draws an index with probability proportional to `weights[index]`.
    fn weighted_choice(&self, weights: &[f64], rng: &mut StdRng) -> Result<usize, AutopsiError>;
}

/// Single-threaded in-process backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuBackend;

impl Backend for CpuBackend {
    fn vecmat<T: Precision>(
        &self,
        state: &[Complex<T>],
        matrix: &GateMatrix<T>,
        device: Option<&Device>,
    ) -> Vec<Complex<T>> {
        let device_label = device.map(Device::label).unwrap_or("cpu");
        let _span = debug_span!("vecmat", device = device_label, dim = matrix.dim()).entered();

        let n = matrix.dim();
        let elements = matrix.elements();
        let mut out = vec![Complex::new(T::zero(), T::zero()); n];
        for (row, amplitude) in state.iter().enumerate() {
            if amplitude.norm_sqr() == T::zero() {
                continue;
            }
            for (col, target) in out.iter_mut().enumerate() {
                *target = *target + *amplitude * elements[row * n + col];
            }
        }
        out
    }

    fn probabilities<T: Precision>(&self, state: &[Complex<T>]) -> Vec<T> {
        state.iter().map(|a| a.norm().powi(2)).collect()
    }

    fn weighted_choice(&self, weights: &[f64], rng: &mut StdRng) -> Result<usize, AutopsiError> {
        let distribution = WeightedIndex::new(weights)
            .map_err(|e| AutopsiError::Sampling { message: e.to_string() })?;
        Ok(distribution.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::Gate;
    use rand::SeedableRng;

    #[test]
    fn vecmat_uses_row_vector_convention() {
        // [1, 0] × RY(θ) picks the first row of the matrix.
        let ry = Gate::Ry { angle: 1.0 }.matrix::<f64>();
        let state = [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)];
        let out = CpuBackend.vecmat(&state, &ry, None);
        assert_eq!(out[0], ry.elements()[0]);
        assert_eq!(out[1], ry.elements()[1]);
    }

    #[test]
    fn device_hint_is_passed_through() {
        let x = Gate::PauliX.matrix::<f32>();
        let state = [Complex::new(1.0f32, 0.0), Complex::new(0.0, 0.0)];
        let device = Device::new("gpu:1");
        let out = CpuBackend.vecmat(&state, &x, Some(&device));
        assert_eq!(out, vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)]);
        assert_eq!(device.to_string(), "gpu:1");
    }

    #[test]
    fn weighted_choice_never_picks_zero_weight() -> Result<(), AutopsiError> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(CpuBackend.weighted_choice(&[0.0, 0.0, 1.0, 0.0], &mut rng)?, 2);
        }
        Ok(())
    }

    #[test]
    fn weighted_choice_rejects_degenerate_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            CpuBackend.weighted_choice(&[0.0, 0.0], &mut rng),
            Err(AutopsiError::Sampling { .. })
        ));
    }
}
