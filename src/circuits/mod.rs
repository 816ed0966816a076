// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operations (`autopsi::operations::Operation`).
//!
//! A `Circuit` is validated as operations are added, so compiling it into
//! register-wide matrices for an engine can only fail on the register size.

use crate::core::{AutopsiError, Precision};
use crate::gates::{Gate, GateMatrix};
use crate::operations::Operation;
use std::fmt;

/// An ordered sequence of operations on a register of qubits.
///
/// The register width is implied by the highest qubit index any operation
/// touches. Order matters: gates are applied exactly in insertion order.
#[derive(Clone, PartialEq, Default)]
pub struct Circuit {
    operations: Vec<Operation>,
    num_qubits: usize,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation after checking its arity and targets.
    pub fn add_operation(&mut self, op: Operation) -> Result<(), AutopsiError> {
        let width = op.targets.iter().max().map_or(0, |&q| q + 1);
        op.validate(width.max(self.num_qubits))?;
        self.num_qubits = self.num_qubits.max(width);
        self.operations.push(op);
        Ok(())
    }

    /// Appends several operations, stopping at the first invalid one.
    pub fn add_operations<I>(&mut self, ops: I) -> Result<(), AutopsiError>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(())
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of qubits touched (highest target index + 1).
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Expands every operation to a matrix over `num_qubits` qubits.
    ///
    /// `num_qubits` may exceed [`Circuit::num_qubits`]; the extra qubits are
    /// left untouched.
    pub fn matrices<T: Precision>(&self, num_qubits: usize) -> Result<Vec<GateMatrix<T>>, AutopsiError> {
        if num_qubits < self.num_qubits {
            return Err(AutopsiError::InvalidQubit { qubit: self.num_qubits - 1, num_qubits });
        }
        self.operations.iter().map(|op| op.matrix::<T>(num_qubits)).collect()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for constructing `Circuit` instances using method chaining.
///
/// Errors are held until [`CircuitBuilder::build`], which reports the first one.
#[derive(Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<AutopsiError>,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.add_operation(op) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Shorthand for `add_op(Operation::new(gate, targets))`.
    pub fn add(self, gate: Gate, targets: impl Into<Vec<usize>>) -> Self {
        self.add_op(Operation::new(gate, targets))
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self = self.add_op(op);
        }
        self
    }

    /// Finalizes the construction process, returning the circuit or the first
    /// error encountered while adding operations.
    pub fn build(self) -> Result<Circuit, AutopsiError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }
}

fn gate_symbol(gate: &Gate) -> String {
    match gate {
        Gate::Identity => "I".to_string(),
        Gate::Hadamard => "H".to_string(),
        Gate::PauliX => "X".to_string(),
        Gate::PauliY => "Y".to_string(),
        Gate::PauliZ => "Z".to_string(),
        Gate::S => "S".to_string(),
        Gate::T => "T".to_string(),
        Gate::Rx { .. } => "RX".to_string(),
        Gate::Ry { .. } => "RY".to_string(),
        Gate::Rz { .. } => "RZ".to_string(),
        Gate::U1 { .. } => "U1".to_string(),
        Gate::U2 { .. } => "U2".to_string(),
        Gate::U3 { .. } => "U3".to_string(),
        Gate::Cnot => "X".to_string(),
        Gate::Cz => "●".to_string(),
        Gate::Swap => "×".to_string(),
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "Circuit[0 operations on 0 qubits]");
        }

        let num_ops = self.operations.len();
        let num_qubits = self.num_qubits;
        let max_label_width = format!("q{}", num_qubits - 1).len();
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_qubits];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in self.operations.iter().enumerate() {
            let symbol = gate_symbol(&op.gate);
            match op.targets.as_slice() {
                [target] => {
                    if matches!(op.gate, Gate::Identity) {
                        continue;
                    }
                    op_grid[*target][t] = format_gate(&symbol);
                }
                [first, second] => {
                    let first_symbol = match op.gate {
                        Gate::Swap => "×",
                        _ => "@",
                    };
                    op_grid[*first][t] = format_gate(first_symbol);
                    op_grid[*second][t] = format_gate(&symbol);
                    let r_min = (*first).min(*second);
                    let r_max = (*first).max(*second);
                    for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                        row_vec[t] = V_WIRE;
                    }
                }
                _ => {}
            }
        }

        writeln!(f, "Circuit[{} operations on {} qubits]", num_ops, num_qubits)?;
        for r in 0..num_qubits {
            let label = format!("q{}: ", r);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
