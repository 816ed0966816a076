// src/lib.rs

//! `autopsi` - A small quantum state-vector simulator
//!
//! The library provides a fixed library of quantum logic gates as unitary
//! matrices and a simulation engine that evolves an amplitude vector under
//! them, records the states it passed through, and samples measurement
//! outcomes from the squared magnitudes of its amplitudes.

pub mod backend;
pub mod circuits;
pub mod core;
pub mod gates;
pub mod operations;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use backend::{Backend, CpuBackend, Device};
pub use circuits::{Circuit, CircuitBuilder};
pub use core::{AmplitudeVector, AutopsiError, Element, Outcome, Precision, ResultType, View};
pub use gates::{Gate, GateBuilder, GateKind, GateMatrix};
pub use operations::Operation;
pub use simulation::{
    EngineBuilder, EngineConfig, SampleCounts, SimulationEngine, SimulationResult, Simulator,
};
pub use validation::{check_normalization, check_unitary, validate_state};

// Example 1: Single Qubit Superposition
// Steps the default engine with a Hadamard matrix and reads the state back.
/// ```
/// use autopsi::{AutopsiError, Gate, ResultType, SimulationEngine};
///
/// fn main() -> Result<(), AutopsiError> {
///     let mut engine = SimulationEngine::<f64>::builder().seed(42).build()?;
///     engine.step(Some(&Gate::Hadamard.matrix()))?;
///
///     // [1, 0] x H = [1/sqrt(2), 1/sqrt(2)]
///     for amplitude in engine.amplitudes() {
///         assert!((amplitude.re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
///     }
///     for p in engine.probabilities() {
///         assert!((p - 0.5).abs() < 1e-9);
///     }
///
///     // Measuring does not disturb the state.
///     let shots = engine.batch_measure(100, ResultType::Binary)?;
///     assert_eq!(shots.len(), 100);
///     assert!(shots.iter().all(|s| s.to_string() == "0" || s.to_string() == "1"));
///     assert_eq!(engine.history().map(|h| h.len()), Some(1));
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Bell State Circuit
// Builds H on q0 followed by CNOT(q0 -> q1) and runs it through the Simulator.
/// ```
/// use autopsi::{AutopsiError, CircuitBuilder, EngineConfig, Gate, Simulator};
///
/// fn main() -> Result<(), AutopsiError> {
///     let circuit = CircuitBuilder::new()
///         .add(Gate::Hadamard, [0])
///         .add(Gate::Cnot, [0, 1])
///         .build()?;
///
///     let simulator = Simulator::with_config(EngineConfig { seed: Some(7), ..Default::default() })
///         .shots(256);
///     let result = simulator.run(&circuit)?;
///     println!("Circuit:\n{}", circuit);
///     println!("Result:\n{}", result);
///
///     // Only |00> and |11> are ever observed.
///     let counts = result.counts();
///     assert_eq!(counts.get_count(0b00) + counts.get_count(0b11), 256);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = ();

// Example 3: Configuring Parameterized Gates
// Missing parameters are reported instead of defaulted.
/// ```
/// use autopsi::{AutopsiError, GateBuilder, GateKind};
///
/// let ry = GateBuilder::new(GateKind::Ry).angle(1.0).build();
/// assert!(ry.is_ok());
///
/// let u2 = GateBuilder::new(GateKind::U2).lambda(1.0).build();
/// assert_eq!(
///     u2,
///     Err(AutopsiError::MissingParameter { gate: GateKind::U2, parameter: "phi" })
/// );
///
/// let kind: GateKind = "cx".parse().unwrap();
/// assert_eq!(kind, GateKind::Cnot);
/// ```
#[doc(hidden)]
const _: () = ();
