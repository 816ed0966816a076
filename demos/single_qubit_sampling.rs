//! Rotates a single qubit and compares sampled frequencies with the exact
//! probabilities.

use autopsi::{AutopsiError, GateBuilder, GateKind, ResultType, SimulationEngine, View};
use std::f64::consts::PI;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AutopsiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut engine = SimulationEngine::<f32>::builder().seed(7).trace(false).build()?;
    let ry = GateBuilder::new(GateKind::Ry).angle(PI / 3.0).build()?;
    engine.step(Some(&ry.matrix()))?;

    let exact: Vec<f64> = engine.as_type(View::Probabilities);
    println!("exact probabilities: {:?}", exact);

    let shots = 10_000;
    let counts = engine.sample_counts(shots)?;
    for index in 0..engine.dim() {
        println!(
            "|{}>: sampled {:.4}, exact {:.4}",
            index,
            counts.frequency(index),
            exact[index]
        );
    }

    let first: Vec<String> = engine
        .batch_measure(16, ResultType::Binary)?
        .into_iter()
        .map(|outcome| outcome.to_string())
        .collect();
    println!("first shots: {}", first.join(" "));
    Ok(())
}
