//! Prepares a Bell pair with a circuit and samples it.
//!
//! Run with `RUST_LOG=autopsi=debug` to see each step.

use autopsi::{AutopsiError, CircuitBuilder, EngineConfig, Gate, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AutopsiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // |00> -> H(q0) -> CNOT(q0, q1) -> (|00> + |11>)/√2
    let circuit = CircuitBuilder::new()
        .add(Gate::Hadamard, [0])
        .add(Gate::Cnot, [0, 1])
        .build()?;
    println!("{}", circuit);

    let config = EngineConfig { seed: Some(2024), ..Default::default() };
    let result = Simulator::with_config(config).shots(1000).run(&circuit)?;
    println!("{}", result);

    let counts = result.counts();
    println!(
        "P(00) ~ {:.3}, P(11) ~ {:.3}",
        counts.frequency(0b00),
        counts.frequency(0b11)
    );
    Ok(())
}
