//! Applies a short gate sequence and prints every recorded state.
//!
//! Run with `RUST_LOG=autopsi=trace` to also see the backend spans.

use autopsi::{AutopsiError, Gate, GateMatrix, ResultType, SimulationEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AutopsiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let gates = [Gate::Hadamard, Gate::T, Gate::u2(0.25, 1.0)?, Gate::ry(1.0)?];
    let matrices: Vec<GateMatrix<f64>> = gates.iter().map(Gate::matrix).collect();

    let mut engine = SimulationEngine::<f64>::builder().device("cpu").seed(1).build()?;
    engine.batch_step(&matrices)?;

    if let Some(history) = engine.history() {
        for (gate, before) in gates.iter().zip(history) {
            println!("{:<24} applied to {}", gate.to_string(), before);
        }
    }
    println!("final state: {}", engine.state());
    println!("probabilities: {:?}", engine.probabilities());

    // A projective measurement collapses the state; it is not a step.
    let outcome = engine.measure_collapse(ResultType::Integer)?;
    println!("collapsed onto |{}>: {}", outcome, engine.state());
    Ok(())
}
