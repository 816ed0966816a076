// src/simulation/results.rs
use crate::core::{AmplitudeVector, Outcome, ResultType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Histogram of sampled basis-state indices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleCounts {
    counts: BTreeMap<usize, usize>,
    shots: usize,
    num_qubits: usize,
}

impl SampleCounts {
    /// Creates an empty histogram for a register of `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            counts: BTreeMap::new(),
            shots: 0,
            num_qubits,
        }
    }

    /// Records one draw of `index`. (Internal visibility)
    pub(crate) fn record(&mut self, index: usize) {
        *self.counts.entry(index).or_insert(0) += 1;
        self.shots += 1;
    }

    /// How many times `index` was drawn.
    pub fn get_count(&self, index: usize) -> usize {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Fraction of the shots that landed on `index`; 0 when nothing was drawn.
    pub fn frequency(&self, index: usize) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get_count(index) as f64 / self.shots as f64
        }
    }

    /// Total number of draws.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Register width the indices refer to.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// `(index, count)` pairs in ascending index order. Indices never drawn are absent.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&index, &count)| (index, count))
    }

    /// The index drawn most often, lowest index winning ties.
    pub fn most_frequent(&self) -> Option<(usize, usize)> {
        self.iter()
            .fold(None, |best: Option<(usize, usize)>, (index, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((index, count)),
            })
    }

    /// The same histogram keyed by zero-padded bitstrings.
    pub fn to_bitstring_counts(&self) -> BTreeMap<String, usize> {
        self.iter()
            .map(|(index, count)| {
                (Outcome::render(index, self.num_qubits, ResultType::Binary).to_string(), count)
            })
            .collect()
    }
}

impl fmt::Display for SampleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counts ({} shots):", self.shots)?;
        for (bits, count) in self.to_bitstring_counts() {
            writeln!(f, "    |{}>: {}", bits, count)?;
        }
        Ok(())
    }
}

/// Holds the results of a circuit simulation: the final state and the
/// histogram sampled from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    state: AmplitudeVector<f64>,
    counts: SampleCounts,
    steps: usize,
}

impl SimulationResult {
    pub(crate) fn new(state: AmplitudeVector<f64>, counts: SampleCounts, steps: usize) -> Self {
        Self { state, counts, steps }
    }

    /// The state after the last operation.
    pub fn state(&self) -> &AmplitudeVector<f64> {
        &self.state
    }

    /// Samples drawn from the final state.
    pub fn counts(&self) -> &SampleCounts {
        &self.counts
    }

    /// Number of register qubits simulated.
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// Number of gate applications performed.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        writeln!(f, "  {} qubits, {} steps", self.num_qubits(), self.steps)?;
        writeln!(f, "  Final state: {}", self.state)?;
        if self.counts.shots() == 0 {
            writeln!(f, "  No samples were drawn.")?;
        } else {
            write!(f, "  {}", self.counts)?;
        }
        Ok(())
    }
}
