// src/simulation/mod.rs

//! Evolves state vectors under gate matrices.
//!
//! [`SimulationEngine`] is the stateful core: it owns an amplitude vector,
//! applies matrices to it, reads amplitudes and probabilities off it and
//! samples measurement outcomes. [`Simulator`] is the one-shot entry point
//! that runs a whole [`Circuit`] from `|0...0>` and samples the result.

mod engine;
mod results;

pub use engine::{EngineBuilder, EngineConfig, SimulationEngine};
pub use results::{SampleCounts, SimulationResult};

use crate::circuits::Circuit;
use crate::core::AutopsiError;
use tracing::info;

/// Runs circuits on fresh double-precision engines.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: EngineConfig,
    shots: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            shots: 1024,
        }
    }
}

impl Simulator {
    /// Creates a new Simulator with default settings (1024 shots).
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` for every engine this simulator creates.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Sets the number of samples drawn from the final state. Zero skips sampling.
    pub fn shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Runs a simulation of the provided circuit.
    ///
    /// The register is as wide as the circuit (at least one qubit) and starts
    /// in `|0...0>`. Operations are applied in order, then the final state is
    /// sampled without collapsing it.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` with the final state and the sampled counts.
    /// * `Err(AutopsiError)` if the engine cannot be built or sampling fails.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult, AutopsiError> {
        let num_qubits = circuit.num_qubits().max(1);
        let mut engine = SimulationEngine::<f64>::builder()
            .config(self.config.clone())
            .qubits(num_qubits)
            .build()?;

        engine.run_circuit(circuit)?;

        let counts = if self.shots == 0 {
            SampleCounts::new(num_qubits)
        } else {
            engine.sample_counts(self.shots)?
        };
        info!(
            num_qubits,
            operations = circuit.len(),
            shots = counts.shots(),
            "simulation finished"
        );
        Ok(SimulationResult::new(engine.state().clone(), counts, circuit.len()))
    }
}
