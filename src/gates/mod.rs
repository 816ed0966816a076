// src/gates/mod.rs

//! The gate library: a closed set of quantum logic gates, each a pure
//! function from validated real parameters to a unitary [`GateMatrix`].
//!
//! Gates are plain values. Their parameters are checked once, when the gate is
//! built, and [`Gate::matrix`] then produces a fresh matrix at whatever
//! [`Precision`] the caller asks for. Nothing is cached or shared between calls.

mod matrix;

pub use matrix::GateMatrix;

use crate::core::{AutopsiError, Precision};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A quantum logic gate together with its parameters.
///
/// Angles are in radians. Build parameterised gates through the checked
/// constructors ([`Gate::ry`], [`Gate::u2`], ...) or a [`GateBuilder`] so that
/// non-finite values are rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum Gate {
    /// Identity.
    Identity,
    /// Hadamard: `(1/√2)·[[1, 1], [1, -1]]`.
    Hadamard,
    /// Pauli X (bit flip).
    PauliX,
    /// Pauli Y.
    PauliY,
    /// Pauli Z (phase flip).
    PauliZ,
    /// Phase gate `diag(1, i)`.
    S,
    /// π/8 gate `diag(1, e^(iπ/4))`.
    T,
    /// Rotation about the X axis.
    Rx {
        /// Rotation angle θ
        angle: f64,
    },
    /// Rotation about the Y axis: `[[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]`.
    Ry {
        /// Rotation angle θ
        angle: f64,
    },
    /// Rotation about the Z axis.
    Rz {
        /// Rotation angle θ
        angle: f64,
    },
    /// Phase gate `[[1, 0], [0, e^(iλ)]]`.
    U1 {
        /// Phase λ
        lambda: f64,
    },
    /// `(1/√2)·[[1, -e^(iλ)], [e^(iφ), e^(i(φ+λ))]]`.
    U2 {
        /// Phase φ
        phi: f64,
        /// Phase λ
        lambda: f64,
    },
    /// General single-qubit rotation.
    U3 {
        /// Rotation angle θ
        angle: f64,
        /// Phase φ
        phi: f64,
        /// Phase λ
        lambda: f64,
    },
    /// Controlled NOT; the first target is the control.
    Cnot,
    /// Controlled Z.
    Cz,
    /// Exchange of two qubits.
    Swap,
}

impl Gate {
    /// RX(θ) with a finite angle.
    pub fn rx(angle: f64) -> Result<Self, AutopsiError> {
        GateBuilder::new(GateKind::Rx).angle(angle).build()
    }

    /// RY(θ) with a finite angle.
    pub fn ry(angle: f64) -> Result<Self, AutopsiError> {
        GateBuilder::new(GateKind::Ry).angle(angle).build()
    }

    /// RZ(θ) with a finite angle.
    pub fn rz(angle: f64) -> Result<Self, AutopsiError> {
        GateBuilder::new(GateKind::Rz).angle(angle).build()
    }

    /// U1(λ) with a finite phase.
    pub fn u1(lambda: f64) -> Result<Self, AutopsiError> {
        GateBuilder::new(GateKind::U1).lambda(lambda).build()
    }

    /// U2(φ, λ) with finite phases.
    pub fn u2(phi: f64, lambda: f64) -> Result<Self, AutopsiError> {
        GateBuilder::new(GateKind::U2).phi(phi).lambda(lambda).build()
    }

    /// U3(θ, φ, λ) with finite parameters.
    pub fn u3(angle: f64, phi: f64, lambda: f64) -> Result<Self, AutopsiError> {
        GateBuilder::new(GateKind::U3).angle(angle).phi(phi).lambda(lambda).build()
    }

    /// The parameter-free identity of this gate.
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::Identity => GateKind::Identity,
            Gate::Hadamard => GateKind::Hadamard,
            Gate::PauliX => GateKind::PauliX,
            Gate::PauliY => GateKind::PauliY,
            Gate::PauliZ => GateKind::PauliZ,
            Gate::S => GateKind::S,
            Gate::T => GateKind::T,
            Gate::Rx { .. } => GateKind::Rx,
            Gate::Ry { .. } => GateKind::Ry,
            Gate::Rz { .. } => GateKind::Rz,
            Gate::U1 { .. } => GateKind::U1,
            Gate::U2 { .. } => GateKind::U2,
            Gate::U3 { .. } => GateKind::U3,
            Gate::Cnot => GateKind::Cnot,
            Gate::Cz => GateKind::Cz,
            Gate::Swap => GateKind::Swap,
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        self.kind().num_qubits()
    }

    /// Produces the gate's unitary matrix at precision `T`.
    ///
    /// Trigonometric and exponential terms are evaluated in `T` itself, so an
    /// `f32` matrix is a genuine single-precision computation rather than a
    /// rounded `f64` one.
    pub fn matrix<T: Precision>(&self) -> GateMatrix<T> {
        let zero = Complex::new(T::zero(), T::zero());
        let one = Complex::new(T::one(), T::zero());
        let i = Complex::new(T::zero(), T::one());
        let real = |x: T| Complex::new(x, T::zero());
        let two = T::one() + T::one();
        let half = |x: f64| T::from_f64(x) / two;
        let cis = |x: f64| Complex::cis(T::from_f64(x));

        match *self {
            Gate::Identity => GateMatrix::from_rows([[one, zero], [zero, one]]),
            Gate::Hadamard => {
                let s = real(T::FRAC_1_SQRT_2());
                GateMatrix::from_rows([[s, s], [s, -s]])
            }
            Gate::PauliX => GateMatrix::from_rows([[zero, one], [one, zero]]),
            Gate::PauliY => GateMatrix::from_rows([[zero, -i], [i, zero]]),
            Gate::PauliZ => GateMatrix::from_rows([[one, zero], [zero, -one]]),
            Gate::S => GateMatrix::from_rows([[one, zero], [zero, i]]),
            Gate::T => GateMatrix::from_rows([[one, zero], [zero, Complex::cis(T::FRAC_PI_4())]]),
            Gate::Rx { angle } => {
                let (s, c) = half(angle).sin_cos();
                GateMatrix::from_rows([[real(c), -i * s], [-i * s, real(c)]])
            }
            Gate::Ry { angle } => {
                let (s, c) = half(angle).sin_cos();
                GateMatrix::from_rows([[real(c), real(-s)], [real(s), real(c)]])
            }
            Gate::Rz { angle } => {
                let h = half(angle);
                GateMatrix::from_rows([[Complex::cis(-h), zero], [zero, Complex::cis(h)]])
            }
            Gate::U1 { lambda } => GateMatrix::from_rows([[one, zero], [zero, cis(lambda)]]),
            Gate::U2 { phi, lambda } => {
                let s = T::FRAC_1_SQRT_2();
                let e_phi = cis(phi);
                let e_lambda = cis(lambda);
                GateMatrix::from_rows([
                    [one * s, -e_lambda * s],
                    [e_phi * s, e_phi * e_lambda * s],
                ])
            }
            Gate::U3 { angle, phi, lambda } => {
                let (s, c) = half(angle).sin_cos();
                let e_phi = cis(phi);
                let e_lambda = cis(lambda);
                GateMatrix::from_rows([
                    [real(c), -e_lambda * s],
                    [e_phi * s, e_phi * e_lambda * c],
                ])
            }
            Gate::Cnot => GateMatrix::from_rows([
                [one, zero, zero, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one],
                [zero, zero, one, zero],
            ]),
            Gate::Cz => GateMatrix::from_rows([
                [one, zero, zero, zero],
                [zero, one, zero, zero],
                [zero, zero, one, zero],
                [zero, zero, zero, -one],
            ]),
            Gate::Swap => GateMatrix::from_rows([
                [one, zero, zero, zero],
                [zero, zero, one, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one],
            ]),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Gate::Rx { angle } | Gate::Ry { angle } | Gate::Rz { angle } => {
                write!(f, "{}({:.4})", self.kind(), angle)
            }
            Gate::U1 { lambda } => write!(f, "u1({:.4})", lambda),
            Gate::U2 { phi, lambda } => write!(f, "u2({:.4}, {:.4})", phi, lambda),
            Gate::U3 { angle, phi, lambda } => {
                write!(f, "u3({:.4}, {:.4}, {:.4})", angle, phi, lambda)
            }
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// Names a gate without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GateKind {
    /// See [`Gate::Identity`]
    Identity,
    /// See [`Gate::Hadamard`]
    Hadamard,
    /// See [`Gate::PauliX`]
    PauliX,
    /// See [`Gate::PauliY`]
    PauliY,
    /// See [`Gate::PauliZ`]
    PauliZ,
    /// See [`Gate::S`]
    S,
    /// See [`Gate::T`]
    T,
    /// See [`Gate::Rx`]
    Rx,
    /// See [`Gate::Ry`]
    Ry,
    /// See [`Gate::Rz`]
    Rz,
    /// See [`Gate::U1`]
    U1,
    /// See [`Gate::U2`]
    U2,
    /// See [`Gate::U3`]
    U3,
    /// See [`Gate::Cnot`]
    Cnot,
    /// See [`Gate::Cz`]
    Cz,
    /// See [`Gate::Swap`]
    Swap,
}

impl GateKind {
    /// Every gate kind, in declaration order.
    pub const ALL: [GateKind; 16] = [
        GateKind::Identity,
        GateKind::Hadamard,
        GateKind::PauliX,
        GateKind::PauliY,
        GateKind::PauliZ,
        GateKind::S,
        GateKind::T,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::U1,
        GateKind::U2,
        GateKind::U3,
        GateKind::Cnot,
        GateKind::Cz,
        GateKind::Swap,
    ];

    /// Canonical lower-case name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Identity => "id",
            GateKind::Hadamard => "h",
            GateKind::PauliX => "x",
            GateKind::PauliY => "y",
            GateKind::PauliZ => "z",
            GateKind::S => "s",
            GateKind::T => "t",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::U1 => "u1",
            GateKind::U2 => "u2",
            GateKind::U3 => "u3",
            GateKind::Cnot => "cx",
            GateKind::Cz => "cz",
            GateKind::Swap => "swap",
        }
    }

    /// Number of qubits a gate of this kind acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Cz | GateKind::Swap => 2,
            _ => 1,
        }
    }

    /// Names of the parameters a gate of this kind requires.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz => &["angle"],
            GateKind::U1 => &["lambda"],
            GateKind::U2 => &["phi", "lambda"],
            GateKind::U3 => &["angle", "phi", "lambda"],
            _ => &[],
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = AutopsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "id" | "i" | "identity" => GateKind::Identity,
            "h" | "hadamard" => GateKind::Hadamard,
            "x" | "not" => GateKind::PauliX,
            "y" => GateKind::PauliY,
            "z" => GateKind::PauliZ,
            "s" => GateKind::S,
            "t" => GateKind::T,
            "rx" => GateKind::Rx,
            "ry" => GateKind::Ry,
            "rz" => GateKind::Rz,
            "u1" | "phase" => GateKind::U1,
            "u2" => GateKind::U2,
            "u3" | "u" => GateKind::U3,
            "cx" | "cnot" => GateKind::Cnot,
            "cz" => GateKind::Cz,
            "swap" => GateKind::Swap,
            _ => return Err(AutopsiError::UnknownGate { name: s.to_string() }),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for GateKind {
    type Error = AutopsiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GateKind> for String {
    fn from(kind: GateKind) -> Self {
        kind.name().to_string()
    }
}

/// Builds a [`Gate`] from a kind and optional parameters.
///
/// A parameter the kind requires but that was never set is an error; it is
/// never silently taken as zero. Parameters the kind does not use are ignored.
///
/// ```
/// use autopsi::{AutopsiError, GateBuilder, GateKind};
///
/// let ry = GateBuilder::new(GateKind::Ry).angle(1.0).build().unwrap();
/// assert_eq!(ry.kind(), GateKind::Ry);
///
/// let missing = GateBuilder::new(GateKind::U2).phi(1.0).build();
/// assert_eq!(
///     missing,
///     Err(AutopsiError::MissingParameter { gate: GateKind::U2, parameter: "lambda" })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateBuilder {
    kind: GateKind,
    angle: Option<f64>,
    lambda: Option<f64>,
    phi: Option<f64>,
}

impl GateBuilder {
    /// Starts a builder for `kind` with no parameters set.
    pub fn new(kind: GateKind) -> Self {
        Self { kind, angle: None, lambda: None, phi: None }
    }

    /// Sets the rotation angle θ.
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Sets the phase λ.
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = Some(lambda);
        self
    }

    /// Sets the phase φ.
    pub fn phi(mut self, phi: f64) -> Self {
        self.phi = Some(phi);
        self
    }

    /// Validates the parameters and produces the gate.
    pub fn build(self) -> Result<Gate, AutopsiError> {
        let gate = match self.kind {
            GateKind::Identity => Gate::Identity,
            GateKind::Hadamard => Gate::Hadamard,
            GateKind::PauliX => Gate::PauliX,
            GateKind::PauliY => Gate::PauliY,
            GateKind::PauliZ => Gate::PauliZ,
            GateKind::S => Gate::S,
            GateKind::T => Gate::T,
            GateKind::Rx => Gate::Rx { angle: self.require("angle", self.angle)? },
            GateKind::Ry => Gate::Ry { angle: self.require("angle", self.angle)? },
            GateKind::Rz => Gate::Rz { angle: self.require("angle", self.angle)? },
            GateKind::U1 => Gate::U1 { lambda: self.require("lambda", self.lambda)? },
            GateKind::U2 => Gate::U2 {
                phi: self.require("phi", self.phi)?,
                lambda: self.require("lambda", self.lambda)?,
            },
            GateKind::U3 => Gate::U3 {
                angle: self.require("angle", self.angle)?,
                phi: self.require("phi", self.phi)?,
                lambda: self.require("lambda", self.lambda)?,
            },
            GateKind::Cnot => Gate::Cnot,
            GateKind::Cz => Gate::Cz,
            GateKind::Swap => Gate::Swap,
        };
        Ok(gate)
    }

    fn require(&self, parameter: &'static str, value: Option<f64>) -> Result<f64, AutopsiError> {
        match value {
            None => Err(AutopsiError::MissingParameter { gate: self.kind, parameter }),
            Some(v) if !v.is_finite() => Err(AutopsiError::InvalidParameter {
                gate: self.kind,
                parameter,
                value: v,
            }),
            Some(v) => Ok(v),
        }
    }
}
