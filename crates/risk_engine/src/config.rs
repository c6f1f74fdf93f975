//! Path simulator configuration.
//!
//! Controls how a simulation is executed, never what it computes: the
//! variate seed and whether paths are evolved on the rayon pool.

use crate::error::ConfigError;

/// Default number of paths below which evaluation stays on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Execution mode for path evolution and column reductions.
///
/// Both modes produce identical output for identical draws: every path
/// consumes its own pre-drawn row of variates and every column is reduced
/// in fixed row order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Evaluate everything on the calling thread.
    Serial,

    /// Evaluate paths and columns on the rayon thread pool.
    #[default]
    Parallel,
}

/// Path simulator configuration.
///
/// Immutable; use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use risk_engine::{ExecutionMode, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .seed(42)
///     .execution_mode(ExecutionMode::Serial)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.seed(), Some(42));
/// assert!(!config.runs_parallel(1_000_000));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Optional seed for reproducible draws.
    seed: Option<u64>,
    /// Serial or rayon evaluation.
    execution_mode: ExecutionMode,
    /// Minimum path count for parallel evaluation.
    parallel_threshold: usize,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the execution mode.
    #[inline]
    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// Returns the minimum path count for parallel evaluation.
    #[inline]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Whether a simulation over `num_paths` paths runs on the rayon pool.
    #[inline]
    pub fn runs_parallel(&self, num_paths: usize) -> bool {
        self.execution_mode == ExecutionMode::Parallel && num_paths >= self.parallel_threshold
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            execution_mode: ExecutionMode::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    seed: Option<u64>,
    execution_mode: ExecutionMode,
    parallel_threshold: usize,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            seed: None,
            execution_mode: ExecutionMode::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the seed for reproducible draws.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed; `None` draws fresh entropy.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the execution mode.
    #[inline]
    pub fn execution_mode(mut self, execution_mode: ExecutionMode) -> Self {
        self.execution_mode = execution_mode;
        self
    }

    /// Sets the minimum path count for parallel evaluation.
    #[inline]
    pub fn parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParallelThreshold`] if the threshold is 0.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        if self.parallel_threshold == 0 {
            return Err(ConfigError::InvalidParallelThreshold(0));
        }

        Ok(SimulationConfig {
            seed: self.seed,
            execution_mode: self.execution_mode,
            parallel_threshold: self.parallel_threshold,
        })
    }
}
