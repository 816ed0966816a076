// src/core/error.rs

//! Error handling logic

use crate::gates::GateKind;
use thiserror::Error;

/// Errors surfaced by gate construction, engine evolution and sampling.
///
/// Every failing operation leaves the engine it was called on untouched, so
/// callers may recover and continue with the same instance.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutopsiError {
    /// A rotation or phase gate was requested without one of its parameters.
    #[error("Gate '{gate}' requires parameter '{parameter}'")]
    MissingParameter {
        /// Gate being built
        gate: GateKind,
        /// Name of the absent parameter
        parameter: &'static str,
    },

    /// A gate parameter was NaN or infinite.
    #[error("Gate '{gate}' parameter '{parameter}' must be finite, got {value}")]
    InvalidParameter {
        /// Gate being built
        gate: GateKind,
        /// Name of the offending parameter
        parameter: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A gate name did not match any known gate.
    #[error("Unknown gate '{name}'")]
    UnknownGate {
        /// Unrecognised name
        name: String,
    },

    /// A vector or matrix dimension is not a power of two (or is too small).
    #[error("Invalid dimension {dimension}, expected a power of two >= 2")]
    InvalidDimension {
        /// Rejected dimension
        dimension: usize,
    },

    /// A gate matrix does not match the dimension of the state it is applied to.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension required by the receiver
        expected: usize,
        /// Dimension supplied
        actual: usize,
    },

    /// A basis-state index outside the state space.
    #[error("Basis state {index} out of range for dimension {dimension}")]
    InvalidBasisState {
        /// Requested index
        index: usize,
        /// Dimension of the state space
        dimension: usize,
    },

    /// A state vector whose squared magnitudes do not sum to one.
    #[error("State vector not normalized: sum(|a_i|^2) = {norm}")]
    NotNormalized {
        /// Observed squared norm
        norm: f64,
    },

    /// A matrix failed the `U U† = I` check.
    #[error("Matrix is not unitary: max deviation from identity {deviation}")]
    NotUnitary {
        /// Largest absolute deviation found
        deviation: f64,
    },

    /// A qubit index outside the register.
    #[error("Invalid qubit index {qubit} for {num_qubits}-qubit register")]
    InvalidQubit {
        /// Offending index
        qubit: usize,
        /// Register width
        num_qubits: usize,
    },

    /// The same qubit was targeted twice by one operation.
    #[error("Qubit {qubit} targeted more than once")]
    DuplicateQubit {
        /// Repeated index
        qubit: usize,
    },

    /// An operation supplied the wrong number of targets for its gate.
    #[error("Gate '{gate}' acts on {expected} qubit(s), {actual} target(s) given")]
    ArityMismatch {
        /// Gate being applied
        gate: GateKind,
        /// Qubits the gate acts on
        expected: usize,
        /// Targets supplied
        actual: usize,
    },

    /// The weighted sampler rejected the probability distribution.
    #[error("Sampling failed: {message}")]
    Sampling {
        /// Sampler failure message
        message: String,
    },
}
