// tests/engine_tests.rs

use autopsi::{
    AutopsiError, Backend, CpuBackend, Device, Gate, GateMatrix, Outcome, Precision, ResultType,
    SimulationEngine, View,
};
use approx::assert_abs_diff_eq;
use num_complex::Complex;
use rand::rngs::StdRng;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::{Arc, Mutex};

const TEST_TOLERANCE: f64 = 1e-9;

/// Asserts that two complex state vectors are approximately equal component-wise.
fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
    assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).norm() < TEST_TOLERANCE,
            "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
            i, a, e, context
        );
    }
}

#[test]
fn test_hadamard_on_ground_state() -> Result<(), AutopsiError> {
    let mut engine = SimulationEngine::<f64>::new();
    engine.step(Some(&Gate::Hadamard.matrix()))?;
    assert_complex_vec_approx_equal(
        engine.amplitudes(),
        &[Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(FRAC_1_SQRT_2, 0.0)],
        "H|0>",
    );
    for a in engine.amplitudes() {
        assert_abs_diff_eq!(a.re, 0.70710678, epsilon = 1e-8);
    }
    Ok(())
}

#[test]
fn test_probabilities_match_squared_magnitudes() -> Result<(), AutopsiError> {
    let mut engine = SimulationEngine::<f64>::builder().qubits(2).build()?;
    engine.apply(&Gate::u3(0.7, 1.1, -0.4)?, &[0])?;
    engine.apply(&Gate::ry(2.2)?, &[1])?;
    engine.apply(&Gate::Cz, &[0, 1])?;

    let probabilities = engine.probabilities();
    for (a, p) in engine.amplitudes().iter().zip(&probabilities) {
        assert_abs_diff_eq!(a.norm_sqr(), *p, epsilon = TEST_TOLERANCE);
    }
    assert_abs_diff_eq!(probabilities.iter().sum::<f64>(), 1.0, epsilon = TEST_TOLERANCE);
    // Reads are repeatable and do not touch the history.
    assert_eq!(engine.probabilities(), probabilities);
    assert_eq!(engine.history().map(<[_]>::len), Some(3));
    Ok(())
}

#[test]
fn test_u1_phase_on_excited_state() -> Result<(), AutopsiError> {
    let mut engine = SimulationEngine::<f64>::builder()
        .initial_state(vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)])
        .build()?;
    engine.step(Some(&Gate::u1(1.0)?.matrix()))?;
    assert_complex_vec_approx_equal(
        engine.amplitudes(),
        &[Complex::new(0.0, 0.0), Complex::from_polar(1.0, 1.0)],
        "U1(1)|1>",
    );
    Ok(())
}

#[test]
fn test_batch_step_matches_sequential_steps() -> Result<(), AutopsiError> {
    let gates = [Gate::Hadamard, Gate::ry(0.3)?, Gate::u2(0.5, -1.2)?, Gate::T];
    let matrices: Vec<GateMatrix<f64>> = gates.iter().map(|g| g.matrix()).collect();

    let mut batched = SimulationEngine::<f64>::new();
    batched.batch_step(&matrices)?;

    let mut sequential = SimulationEngine::<f64>::new();
    for matrix in &matrices {
        sequential.step(Some(matrix))?;
    }

    assert_complex_vec_approx_equal(batched.amplitudes(), sequential.amplitudes(), "batch vs sequential");
    assert_eq!(batched.history(), sequential.history());
    assert_eq!(batched.history().map(<[_]>::len), Some(4));
    Ok(())
}

#[test]
fn test_history_tracks_traced_steps_only() -> Result<(), AutopsiError> {
    let mut traced = SimulationEngine::<f64>::new();
    assert!(traced.history().is_none());
    for n in 1..=5 {
        traced.step(Some(&Gate::PauliX.matrix()))?;
        assert_eq!(traced.history().map(<[_]>::len), Some(n));
    }
    // X applied five times leaves |1>; the last snapshot is |0>.
    let history = traced.history().expect("traced steps");
    assert_eq!(history[4].as_slice()[0], Complex::new(1.0, 0.0));
    assert_eq!(traced.amplitudes()[1], Complex::new(1.0, 0.0));

    let mut untraced = SimulationEngine::<f64>::builder().trace(false).build()?;
    for _ in 0..5 {
        untraced.step(Some(&Gate::PauliX.matrix()))?;
    }
    assert!(untraced.history().is_none());
    Ok(())
}

#[test]
fn test_dimension_mismatch_is_rejected() -> Result<(), AutopsiError> {
    let mut engine = SimulationEngine::<f64>::builder().qubits(2).build()?;
    let before = engine.state().clone();
    assert_eq!(
        engine.step(Some(&Gate::Hadamard.matrix())),
        Err(AutopsiError::DimensionMismatch { expected: 4, actual: 2 })
    );
    assert_eq!(engine.state(), &before);
    assert!(engine.history().is_none());
    Ok(())
}

#[test]
fn test_batch_measure_frequencies_converge() -> Result<(), AutopsiError> {
    // RY(2π/3)|0> has P(1) = sin²(π/3) = 0.75.
    let mut engine = SimulationEngine::<f64>::builder().seed(42).build()?;
    engine.step(Some(&Gate::ry(2.0 * PI / 3.0)?.matrix()))?;

    let shots = 20_000;
    let outcomes = engine.batch_measure(shots, ResultType::Integer)?;
    assert_eq!(outcomes.len(), shots);
    let ones = outcomes.iter().filter(|o| **o == Outcome::Index(1)).count();
    assert!(outcomes.iter().all(|o| matches!(o, Outcome::Index(0) | Outcome::Index(1))));
    assert_abs_diff_eq!(ones as f64 / shots as f64, 0.75, epsilon = 0.02);

    let counts = engine.sample_counts(shots)?;
    assert_eq!(counts.shots(), shots);
    assert_abs_diff_eq!(counts.frequency(1), 0.75, epsilon = 0.02);
    Ok(())
}

#[test]
fn test_seeded_engines_sample_identically() -> Result<(), AutopsiError> {
    let run = |seed| -> Result<Vec<Outcome>, AutopsiError> {
        let mut engine = SimulationEngine::<f64>::builder().qubits(3).seed(seed).build()?;
        for q in 0..3 {
            engine.apply(&Gate::Hadamard, &[q])?;
        }
        engine.batch_measure(64, ResultType::Binary)
    };
    let first = run(9)?;
    assert_eq!(first, run(9)?);
    assert!(first.iter().all(|o| matches!(o, Outcome::Bits(bits) if bits.len() == 3)));
    Ok(())
}

#[test]
fn test_zero_probability_outcomes_are_never_drawn() -> Result<(), AutopsiError> {
    let mut engine = SimulationEngine::<f64>::builder().qubits(2).seed(1).build()?;
    engine.apply(&Gate::PauliX, &[1])?;
    for outcome in engine.batch_measure(200, ResultType::Binary)? {
        assert_eq!(outcome, Outcome::Bits("01".to_string()));
    }
    Ok(())
}

#[test]
fn test_as_type_probabilities_in_single_precision() -> Result<(), AutopsiError> {
    let mut engine = SimulationEngine::<f64>::new();
    engine.step(Some(&Gate::ry(1.0)?.matrix()))?;
    let probabilities: Vec<f32> = engine.as_type(View::Probabilities);
    assert_abs_diff_eq!(probabilities[0], (0.5f64.cos().powi(2)) as f32, epsilon = 1e-6);
    assert_abs_diff_eq!(probabilities[1], (0.5f64.sin().powi(2)) as f32, epsilon = 1e-6);

    let amplitudes: Vec<Complex<f64>> = engine.as_type(View::default());
    assert_eq!(amplitudes.as_slice(), engine.amplitudes());
    Ok(())
}

/// Delegates to the CPU backend and records the device hint of every multiply.
#[derive(Debug, Clone, Default)]
struct RecordingBackend {
    devices: Arc<Mutex<Vec<Option<String>>>>,
}

impl Backend for RecordingBackend {
    fn vecmat<T: Precision>(
        &self,
        state: &[Complex<T>],
        matrix: &GateMatrix<T>,
        device: Option<&Device>,
    ) -> Vec<Complex<T>> {
        self.devices
            .lock()
            .expect("device log lock")
            .push(device.map(|d| d.label().to_string()));
        CpuBackend.vecmat(state, matrix, device)
    }

    fn probabilities<T: Precision>(&self, state: &[Complex<T>]) -> Vec<T> {
        CpuBackend.probabilities(state)
    }

    fn weighted_choice(&self, weights: &[f64], rng: &mut StdRng) -> Result<usize, AutopsiError> {
        CpuBackend.weighted_choice(weights, rng)
    }
}

#[test]
fn test_custom_backend_receives_device_hint() -> Result<(), AutopsiError> {
    let backend = RecordingBackend::default();
    let mut engine = SimulationEngine::<f32>::builder()
        .device(Device::new("gpu:0"))
        .backend(backend.clone())
        .build()?;
    engine.step(Some(&Gate::Hadamard.matrix()))?;
    engine.step(Some(&Gate::Hadamard.matrix()))?;

    let devices = backend.devices.lock().expect("device log lock").clone();
    assert_eq!(devices, vec![Some("gpu:0".to_string()); 2]);
    assert_abs_diff_eq!(engine.probabilities()[0], 1.0f32, epsilon = 1e-5);
    Ok(())
}
