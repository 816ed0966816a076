// src/core/state.rs

use super::error::AutopsiError;
use super::precision::Precision;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered vector of complex amplitudes describing the state of an
/// n-qubit register.
///
/// The length is always `2^n` with `n >= 1`. Basis state `|k>` is the entry at
/// index `k`, with qubit 0 as the most significant bit of `k`. Normalization
/// is checked by the engine when the vector is handed to it; gate application
/// preserves it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct AmplitudeVector<T> {
    amplitudes: Vec<Complex<T>>,
}

impl<T: Precision> AmplitudeVector<T> {
    /// Wraps a vector of amplitudes. The length must be a power of two >= 2.
    pub fn new(amplitudes: Vec<Complex<T>>) -> Result<Self, AutopsiError> {
        let dimension = amplitudes.len();
        if dimension < 2 || !dimension.is_power_of_two() {
            return Err(AutopsiError::InvalidDimension { dimension });
        }
        Ok(Self { amplitudes })
    }

    /// Builds the computational basis state `|index>` over `num_qubits` qubits.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self, AutopsiError> {
        if num_qubits == 0 || num_qubits >= usize::BITS as usize {
            let dimension = 1usize.checked_shl(num_qubits as u32).unwrap_or(0);
            return Err(AutopsiError::InvalidDimension { dimension });
        }
        let dimension = 1usize << num_qubits;
        if index >= dimension {
            return Err(AutopsiError::InvalidBasisState { index, dimension });
        }
        let mut amplitudes = vec![Complex::new(T::zero(), T::zero()); dimension];
        amplitudes[index] = Complex::new(T::one(), T::zero());
        Ok(Self { amplitudes })
    }

    /// Wraps amplitudes produced internally whose length is already known good.
    pub(crate) fn from_raw(amplitudes: Vec<Complex<T>>) -> Self {
        debug_assert!(amplitudes.len().is_power_of_two());
        Self { amplitudes }
    }

    /// Read-only access to the amplitudes.
    pub fn as_slice(&self) -> &[Complex<T>] {
        &self.amplitudes
    }

    /// Number of basis states (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits (`log2(dim)`).
    pub fn num_qubits(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> T {
        self.amplitudes
            .iter()
            .fold(T::zero(), |acc, a| acc + a.norm_sqr())
    }

    /// Consumes the vector, returning the amplitudes.
    pub fn into_inner(self) -> Vec<Complex<T>> {
        self.amplitudes
    }
}

impl<T: Precision> fmt::Display for AmplitudeVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

/// Which projection of the state a conversion reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// The complex amplitudes.
    #[default]
    Amplitudes,
    /// The squared magnitudes of the amplitudes.
    Probabilities,
}

/// Representation requested for a measurement outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// The basis-state index.
    #[default]
    Integer,
    /// A fixed-width binary string, one character per qubit.
    Binary,
}

/// A classical outcome drawn from a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The measured basis-state index.
    Index(usize),
    /// The measured basis state as a binary string, qubit 0 first.
    Bits(String),
}

impl Outcome {
    /// Renders `index` in the requested representation over `num_qubits` qubits.
    pub fn render(index: usize, num_qubits: usize, result_type: ResultType) -> Self {
        match result_type {
            ResultType::Integer => Outcome::Index(index),
            ResultType::Binary => Outcome::Bits(format!("{:0width$b}", index, width = num_qubits)),
        }
    }

    /// The basis-state index this outcome denotes.
    pub fn index(&self) -> Option<usize> {
        match self {
            Outcome::Index(index) => Some(*index),
            Outcome::Bits(bits) => usize::from_str_radix(bits, 2).ok(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Index(index) => write!(f, "{}", index),
            Outcome::Bits(bits) => write!(f, "{}", bits),
        }
    }
}
