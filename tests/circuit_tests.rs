// tests/circuit_tests.rs

use autopsi::{
    AutopsiError, Circuit, CircuitBuilder, EngineConfig, Gate, GateKind, Operation, SimulationEngine,
    Simulator,
};
use approx::assert_abs_diff_eq;
use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

const TEST_TOLERANCE: f64 = 1e-9;

fn seeded_simulator(seed: u64, shots: usize) -> Simulator {
    Simulator::with_config(EngineConfig { seed: Some(seed), ..Default::default() }).shots(shots)
}

#[test]
fn test_empty_circuit() -> Result<(), AutopsiError> {
    let result = seeded_simulator(1, 16).run(&Circuit::new())?;
    assert_eq!(result.steps(), 0);
    assert_eq!(result.counts().get_count(0), 16);
    Ok(())
}

#[test]
fn test_bell_state() -> Result<(), AutopsiError> {
    let circuit = CircuitBuilder::new()
        .add(Gate::Hadamard, [0])
        .add(Gate::Cnot, [0, 1])
        .build()?;
    let result = seeded_simulator(2024, 2000).run(&circuit)?;

    let amplitudes = result.state().as_slice();
    assert_abs_diff_eq!(amplitudes[0].re, FRAC_1_SQRT_2, epsilon = TEST_TOLERANCE);
    assert_abs_diff_eq!(amplitudes[3].re, FRAC_1_SQRT_2, epsilon = TEST_TOLERANCE);
    assert_abs_diff_eq!(amplitudes[1].norm(), 0.0, epsilon = TEST_TOLERANCE);
    assert_abs_diff_eq!(amplitudes[2].norm(), 0.0, epsilon = TEST_TOLERANCE);

    let bits = result.counts().to_bitstring_counts();
    assert_eq!(bits.keys().map(String::as_str).collect::<Vec<_>>(), vec!["00", "11"]);
    assert_abs_diff_eq!(result.counts().frequency(0), 0.5, epsilon = 0.05);
    assert!(result.to_string().contains("|11>"));
    Ok(())
}

#[test]
fn test_ghz_state_on_engine() -> Result<(), AutopsiError> {
    let circuit = CircuitBuilder::new()
        .add(Gate::Hadamard, [0])
        .add(Gate::Cnot, [0, 1])
        .add(Gate::Cnot, [1, 2])
        .build()?;
    let mut engine = SimulationEngine::<f64>::builder().qubits(3).build()?;
    engine.run_circuit(&circuit)?;

    let probabilities = engine.probabilities();
    assert_abs_diff_eq!(probabilities[0b000], 0.5, epsilon = TEST_TOLERANCE);
    assert_abs_diff_eq!(probabilities[0b111], 0.5, epsilon = TEST_TOLERANCE);
    assert_eq!(engine.history().map(<[_]>::len), Some(3));
    Ok(())
}

#[test]
fn test_reversed_control_and_swap() -> Result<(), AutopsiError> {
    // |01> -> CNOT(control q1, target q0) -> |11>
    let circuit = CircuitBuilder::new()
        .add(Gate::PauliX, [1])
        .add(Gate::Cnot, [1, 0])
        .build()?;
    let mut engine = SimulationEngine::<f64>::builder().qubits(2).build()?;
    engine.run_circuit(&circuit)?;
    assert_abs_diff_eq!(engine.probabilities()[0b11], 1.0, epsilon = TEST_TOLERANCE);

    // |10> -> SWAP -> |01>
    let mut swapped = SimulationEngine::<f64>::builder().qubits(2).build()?;
    swapped.apply(&Gate::PauliX, &[0])?;
    swapped.apply(&Gate::Swap, &[0, 1])?;
    assert_eq!(swapped.amplitudes()[0b01], Complex::new(1.0, 0.0));
    Ok(())
}

#[test]
fn test_circuit_wider_than_register_is_rejected() -> Result<(), AutopsiError> {
    let circuit = CircuitBuilder::new()
        .add(Gate::Hadamard, [0])
        .add(Gate::Cz, [0, 2])
        .build()?;
    let mut engine = SimulationEngine::<f64>::builder().qubits(2).build()?;
    assert_eq!(
        engine.run_circuit(&circuit),
        Err(AutopsiError::InvalidQubit { qubit: 2, num_qubits: 2 })
    );
    // Nothing was applied, not even the leading Hadamard.
    assert_eq!(engine.amplitudes()[0], Complex::new(1.0, 0.0));
    assert!(engine.history().is_none());
    Ok(())
}

#[test]
fn test_invalid_operations_are_reported() {
    assert_eq!(
        CircuitBuilder::new().add(Gate::Cz, [1, 1]).build().err(),
        Some(AutopsiError::DuplicateQubit { qubit: 1 })
    );
    assert_eq!(
        CircuitBuilder::new().add(Gate::Hadamard, [0, 1]).build().err(),
        Some(AutopsiError::ArityMismatch { gate: GateKind::Hadamard, expected: 1, actual: 2 })
    );
}

#[test]
fn test_operations_deserialize_from_json() -> Result<(), AutopsiError> {
    let json = r#"[
        { "gate": { "gate": "ry", "angle": 3.141592653589793 }, "targets": [0] },
        { "gate": { "gate": "cnot" }, "targets": [0, 1] }
    ]"#;
    let operations: Vec<Operation> = serde_json::from_str(json).expect("valid operation list");
    let mut circuit = Circuit::new();
    circuit.add_operations(operations)?;
    assert_eq!(circuit.len(), 2);

    let result = seeded_simulator(5, 100).run(&circuit)?;
    assert_eq!(result.counts().get_count(0b11), 100);
    Ok(())
}
