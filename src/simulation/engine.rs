// src/simulation/engine.rs

use crate::backend::{Backend, CpuBackend, Device};
use crate::circuits::Circuit;
use crate::core::{AmplitudeVector, AutopsiError, Element, Outcome, Precision, ResultType, View};
use crate::gates::{Gate, GateMatrix};
use crate::operations::Operation;
use crate::simulation::SampleCounts;
use crate::validation;
use num_complex::Complex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Construction-time settings of a [`SimulationEngine`].
///
/// Every field has a default, so partial configurations deserialize cleanly:
///
/// ```
/// use autopsi::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "trace": false, "seed": 7 }"#).unwrap();
/// assert!(!config.trace);
/// assert_eq!(config.seed, Some(7));
/// assert!(config.device.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record the state before each gate application.
    pub trace: bool,
    /// Device hint handed to the backend's multiply.
    pub device: Option<Device>,
    /// Seed for the sampling RNG; drawn from the thread RNG when absent.
    pub seed: Option<u64>,
    /// Normalization tolerance for the initial state; defaults to the precision's.
    pub norm_tolerance: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trace: true,
            device: None,
            seed: None,
            norm_tolerance: None,
        }
    }
}

/// Owns an evolving amplitude vector and its history.
///
/// Gate matrices are applied with the row-vector convention: the new state is
/// `state × matrix`. Reads (`amplitudes`, `probabilities`, `measure`) never
/// change the state; only `step` and its relatives and the explicit
/// collapsing measurements do.
///
/// An engine is not internally synchronized. It is `Send`, but concurrent use
/// of one instance must be serialized by the caller.
#[derive(Debug)]
pub struct SimulationEngine<T: Precision = f64, B: Backend = CpuBackend> {
    state: AmplitudeVector<T>,
    history: Vec<AmplitudeVector<T>>,
    config: EngineConfig,
    backend: B,
    rng: StdRng,
}

impl<T: Precision> SimulationEngine<T, CpuBackend> {
    /// An engine in the basis state `[1, 0]` with tracing enabled.
    pub fn new() -> Self {
        let state = AmplitudeVector::from_raw(vec![
            Complex::new(T::one(), T::zero()),
            Complex::new(T::zero(), T::zero()),
        ]);
        Self::from_parts(state, EngineConfig::default(), CpuBackend)
    }

    /// Starts configuring an engine.
    pub fn builder() -> EngineBuilder<T, CpuBackend> {
        EngineBuilder::new()
    }
}

impl<T: Precision> Default for SimulationEngine<T, CpuBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Precision, B: Backend> SimulationEngine<T, B> {
    fn from_parts(state: AmplitudeVector<T>, config: EngineConfig, backend: B) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        debug!(
            precision = T::NAME,
            dim = state.dim(),
            trace = config.trace,
            device = ?config.device,
            "initialized simulation engine"
        );
        Self {
            state,
            history: Vec::new(),
            config,
            backend,
            rng,
        }
    }

    /// Applies `matrix` to the state.
    ///
    /// `None` is a no-op. Otherwise the matrix dimension must equal the state
    /// dimension; on mismatch the state and history are left unchanged. When
    /// tracing is enabled the pre-step state is appended to the history.
    pub fn step(&mut self, matrix: Option<&GateMatrix<T>>) -> Result<(), AutopsiError> {
        let Some(matrix) = matrix else {
            return Ok(());
        };
        validation::check_compatible(self.state.dim(), matrix)?;
        self.apply_unchecked(matrix);
        Ok(())
    }

    /// Applies each matrix in order, as repeated [`step`](Self::step) calls.
    ///
    /// Every dimension is checked before the first matrix is applied, so a
    /// rejected batch leaves the engine untouched.
    pub fn batch_step<'a, I>(&mut self, matrices: I) -> Result<(), AutopsiError>
    where
        I: IntoIterator<Item = &'a GateMatrix<T>>,
        T: 'a,
    {
        let matrices: Vec<&GateMatrix<T>> = matrices.into_iter().collect();
        for matrix in &matrices {
            validation::check_compatible(self.state.dim(), matrix)?;
        }
        for matrix in matrices {
            self.apply_unchecked(matrix);
        }
        Ok(())
    }

    /// Expands `gate` onto the register at `targets` and steps with it.
    pub fn apply(&mut self, gate: &Gate, targets: &[usize]) -> Result<(), AutopsiError> {
        let matrix = Operation::new(*gate, targets).matrix::<T>(self.num_qubits())?;
        self.step(Some(&matrix))
    }

    /// Compiles every operation of `circuit` for this register, then applies
    /// them in order. Nothing is applied if any operation fails to compile.
    pub fn run_circuit(&mut self, circuit: &Circuit) -> Result<(), AutopsiError> {
        let matrices = circuit.matrices::<T>(self.num_qubits())?;
        self.batch_step(&matrices)
    }

    fn apply_unchecked(&mut self, matrix: &GateMatrix<T>) {
        let next = self
            .backend
            .vecmat(self.state.as_slice(), matrix, self.config.device.as_ref());
        let previous = std::mem::replace(&mut self.state, AmplitudeVector::from_raw(next));
        if self.config.trace {
            self.history.push(previous);
        }
        debug!(dim = matrix.dim(), history_len = self.history.len(), "applied gate matrix");
    }

    /// The current amplitudes.
    pub fn amplitudes(&self) -> &[Complex<T>] {
        self.state.as_slice()
    }

    /// The current state as an [`AmplitudeVector`].
    pub fn state(&self) -> &AmplitudeVector<T> {
        &self.state
    }

    /// `|a_i|^2` for every amplitude, computed afresh on each call.
    pub fn probabilities(&self) -> Vec<T> {
        self.backend.probabilities(self.state.as_slice())
    }

    /// A copy of the amplitudes or probabilities converted to `U`.
    ///
    /// Converting to a real type keeps only the real part of each value. This
    /// is lossy for complex amplitudes; a warning is logged when a non-zero
    /// imaginary part is dropped, and the conversion proceeds.
    pub fn as_type<U: Element>(&self, view: View) -> Vec<U> {
        let values: Vec<Complex<T>> = match view {
            View::Amplitudes => self.state.as_slice().to_vec(),
            View::Probabilities => self
                .probabilities()
                .into_iter()
                .map(|p| Complex::new(p, T::zero()))
                .collect(),
        };
        if !U::IS_COMPLEX && values.iter().any(|c| c.im != T::zero()) {
            warn!(?view, "casting complex values to a real type discards their imaginary parts");
        }
        values
            .iter()
            .map(|c| U::from_parts(c.re.into(), c.im.into()))
            .collect()
    }

    fn sample_index(&mut self) -> Result<usize, AutopsiError> {
        let weights: Vec<f64> = self.probabilities().into_iter().map(Into::into).collect();
        let index = self.backend.weighted_choice(&weights, &mut self.rng)?;
        trace!(index, "sampled basis state");
        Ok(index)
    }

    /// Draws one outcome with probability `probabilities()[index]`.
    ///
    /// The state is not collapsed: repeated calls sample the same
    /// distribution. Use [`measure_collapse`](Self::measure_collapse) for a
    /// projective measurement.
    pub fn measure(&mut self, result_type: ResultType) -> Result<Outcome, AutopsiError> {
        let index = self.sample_index()?;
        Ok(Outcome::render(index, self.num_qubits(), result_type))
    }

    /// `shots` independent [`measure`](Self::measure) draws, in order.
    pub fn batch_measure(
        &mut self,
        shots: usize,
        result_type: ResultType,
    ) -> Result<Vec<Outcome>, AutopsiError> {
        (0..shots).map(|_| self.measure(result_type)).collect()
    }

    /// Histogram of `shots` non-collapsing draws.
    pub fn sample_counts(&mut self, shots: usize) -> Result<SampleCounts, AutopsiError> {
        let mut counts = SampleCounts::new(self.num_qubits());
        for _ in 0..shots {
            counts.record(self.sample_index()?);
        }
        Ok(counts)
    }

    /// Projective measurement of the whole register.
    ///
    /// The state collapses onto the measured basis vector (keeping its phase).
    /// The collapse is not recorded in the history.
    pub fn measure_collapse(&mut self, result_type: ResultType) -> Result<Outcome, AutopsiError> {
        let index = self.sample_index()?;
        let amplitude = self.state.as_slice()[index];
        let phase = amplitude.unscale(amplitude.norm());
        let mut collapsed = vec![Complex::new(T::zero(), T::zero()); self.state.dim()];
        collapsed[index] = phase;
        self.state = AmplitudeVector::from_raw(collapsed);
        Ok(Outcome::render(index, self.num_qubits(), result_type))
    }

    /// Projective measurement of a single qubit, returning 0 or 1.
    ///
    /// Amplitudes inconsistent with the outcome are zeroed and the rest are
    /// renormalized. The collapse is not recorded in the history.
    pub fn measure_qubit(&mut self, qubit: usize) -> Result<u8, AutopsiError> {
        let num_qubits = self.num_qubits();
        if qubit >= num_qubits {
            return Err(AutopsiError::InvalidQubit { qubit, num_qubits });
        }
        let shift = num_qubits - 1 - qubit;

        let (mut p_zero, mut p_one) = (0.0f64, 0.0f64);
        for (index, p) in self.probabilities().into_iter().enumerate() {
            if (index >> shift) & 1 == 1 {
                p_one += p.into();
            } else {
                p_zero += p.into();
            }
        }
        let bit = self.backend.weighted_choice(&[p_zero, p_one], &mut self.rng)?;
        let kept = if bit == 1 { p_one } else { p_zero };
        let scale = T::from_f64(kept.sqrt().recip());

        let next: Vec<Complex<T>> = self
            .state
            .as_slice()
            .iter()
            .enumerate()
            .map(|(index, a)| {
                if (index >> shift) & 1 == bit {
                    a.scale(scale)
                } else {
                    Complex::new(T::zero(), T::zero())
                }
            })
            .collect();
        self.state = AmplitudeVector::from_raw(next);
        trace!(qubit, bit, "measured qubit");
        Ok(bit as u8)
    }

    /// The recorded pre-step states, oldest first, or `None` if nothing has
    /// been recorded (tracing disabled or no steps yet).
    pub fn history(&self) -> Option<&[AmplitudeVector<T>]> {
        if self.history.is_empty() {
            None
        } else {
            Some(&self.history)
        }
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// Length of the amplitude vector.
    pub fn dim(&self) -> usize {
        self.state.dim()
    }

    /// Whether pre-step states are being recorded.
    pub fn is_tracing(&self) -> bool {
        self.config.trace
    }

    /// The device hint passed to the backend, if any.
    pub fn device(&self) -> Option<&Device> {
        self.config.device.as_ref()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The backend performing multiplies and draws.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[derive(Debug, Clone)]
enum InitialState<T> {
    Default,
    Qubits(usize),
    Amplitudes(Vec<Complex<T>>),
}

/// Configures and validates a [`SimulationEngine`].
#[derive(Debug, Clone)]
pub struct EngineBuilder<T: Precision = f64, B: Backend = CpuBackend> {
    initial: InitialState<T>,
    config: EngineConfig,
    backend: B,
}

impl<T: Precision> EngineBuilder<T, CpuBackend> {
    /// A builder for `[1, 0]` with tracing on and the CPU backend.
    pub fn new() -> Self {
        Self {
            initial: InitialState::Default,
            config: EngineConfig::default(),
            backend: CpuBackend,
        }
    }
}

impl<T: Precision> Default for EngineBuilder<T, CpuBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Precision, B: Backend> EngineBuilder<T, B> {
    /// Starts from the given amplitudes. They must be normalized and their
    /// count a power of two.
    pub fn initial_state(mut self, amplitudes: Vec<Complex<T>>) -> Self {
        self.initial = InitialState::Amplitudes(amplitudes);
        self
    }

    /// Starts from `|0...0>` over `num_qubits` qubits.
    pub fn qubits(mut self, num_qubits: usize) -> Self {
        self.initial = InitialState::Qubits(num_qubits);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables or disables history recording.
    pub fn trace(mut self, trace: bool) -> Self {
        self.config.trace = trace;
        self
    }

    /// Sets the device hint.
    pub fn device(mut self, device: impl Into<Device>) -> Self {
        self.config.device = Some(device.into());
        self
    }

    /// Seeds the sampling RNG.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Overrides the normalization tolerance for the initial state.
    pub fn norm_tolerance(mut self, tolerance: f64) -> Self {
        self.config.norm_tolerance = Some(tolerance);
        self
    }

    /// Swaps in another backend.
    pub fn backend<C: Backend>(self, backend: C) -> EngineBuilder<T, C> {
        EngineBuilder {
            initial: self.initial,
            config: self.config,
            backend,
        }
    }

    /// Validates the initial state and produces the engine.
    pub fn build(self) -> Result<SimulationEngine<T, B>, AutopsiError> {
        let state = match self.initial {
            InitialState::Default => AmplitudeVector::basis(1, 0)?,
            InitialState::Qubits(num_qubits) => AmplitudeVector::basis(num_qubits, 0)?,
            InitialState::Amplitudes(amplitudes) => AmplitudeVector::new(amplitudes)?,
        };
        validation::validate_state(&state, self.config.norm_tolerance)?;
        Ok(SimulationEngine::from_parts(state, self.config, self.backend))
    }
}
