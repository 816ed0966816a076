// src/operations/mod.rs

//! A gate bound to the qubits it acts on.

use crate::core::{AutopsiError, Precision};
use crate::gates::{Gate, GateMatrix};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Applies `gate` to `targets`, in order.
///
/// For controlled gates the first target is the control. Targets are qubit
/// indices in the register, qubit 0 being the most significant bit of a
/// basis-state index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The gate to apply.
    pub gate: Gate,
    /// The qubits it acts on.
    pub targets: Vec<usize>,
}

impl Operation {
    /// Binds `gate` to `targets`. Validation happens against a register size,
    /// see [`Operation::validate`].
    pub fn new(gate: Gate, targets: impl Into<Vec<usize>>) -> Self {
        Self { gate, targets: targets.into() }
    }

    /// Returns the qubits directly mentioned by the operation.
    pub fn involved_qubits(&self) -> &[usize] {
        &self.targets
    }

    /// Checks arity, distinctness and range of the targets for a register of
    /// `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> Result<(), AutopsiError> {
        let expected = self.gate.num_qubits();
        if self.targets.len() != expected {
            return Err(AutopsiError::ArityMismatch {
                gate: self.gate.kind(),
                expected,
                actual: self.targets.len(),
            });
        }
        for (i, &qubit) in self.targets.iter().enumerate() {
            if qubit >= num_qubits {
                return Err(AutopsiError::InvalidQubit { qubit, num_qubits });
            }
            if self.targets[..i].contains(&qubit) {
                return Err(AutopsiError::DuplicateQubit { qubit });
            }
        }
        Ok(())
    }

    /// The full-register matrix for this operation on `num_qubits` qubits.
    pub fn matrix<T: Precision>(&self, num_qubits: usize) -> Result<GateMatrix<T>, AutopsiError> {
        self.validate(num_qubits)?;
        self.gate.matrix::<T>().embed(&self.targets, num_qubits)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gate)?;
        for (i, qubit) in self.targets.iter().enumerate() {
            write!(f, "{}q{}", if i == 0 { " " } else { ", " }, qubit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::GateKind;

    #[test]
    fn validate_checks_arity_and_range() {
        assert_eq!(
            Operation::new(Gate::Cnot, [0]).validate(2),
            Err(AutopsiError::ArityMismatch { gate: GateKind::Cnot, expected: 2, actual: 1 })
        );
        assert_eq!(
            Operation::new(Gate::Hadamard, [3]).validate(2),
            Err(AutopsiError::InvalidQubit { qubit: 3, num_qubits: 2 })
        );
        assert_eq!(
            Operation::new(Gate::Swap, [1, 1]).validate(2),
            Err(AutopsiError::DuplicateQubit { qubit: 1 })
        );
        assert!(Operation::new(Gate::Cz, [1, 0]).validate(2).is_ok());
    }

    #[test]
    fn display_lists_targets() {
        assert_eq!(Operation::new(Gate::Cnot, [0, 2]).to_string(), "cx q0, q2");
        assert_eq!(Operation::new(Gate::Ry { angle: 0.5 }, [1]).to_string(), "ry(0.5000) q1");
    }

    #[test]
    fn matrix_spans_whole_register() -> Result<(), AutopsiError> {
        let matrix = Operation::new(Gate::PauliX, [2]).matrix::<f64>(3)?;
        assert_eq!(matrix.dim(), 8);
        assert!(matrix.is_unitary(1e-12));
        Ok(())
    }
}
