//! Path simulator orchestration.
//!
//! ```text
//! PathSimulator
//! ├── SimulationConfig  (seed, execution mode)
//! ├── NormalSource      (variate matrix Z)
//! └── simulate()
//!     ├── SimulationParameters::validate()
//!     ├── PathEnsemble::generate()
//!     ├── PathBands::from_ensemble()
//!     └── Statistics::from_final_prices()
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::params::SimulationParameters;
use crate::paths::PathEnsemble;
use crate::rng::{NormalSource, SimRng};
use crate::statistics::{PathBands, Statistics};

/// Complete output of one simulation.
///
/// Field names match the JSON contract of the HTTP shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Every simulated path, one row per path, `days + 1` prices each.
    pub paths: Vec<Vec<f64>>,
    /// Mean over paths at each step.
    pub mean_path: Vec<f64>,
    /// Interpolated 5th percentile at each step.
    pub percentile_5: Vec<f64>,
    /// Interpolated 95th percentile at each step.
    pub percentile_95: Vec<f64>,
    /// Terminal price of every path.
    pub final_prices: Vec<f64>,
    /// Rounded risk statistics of `final_prices`.
    pub statistics: Statistics,
}

/// Monte Carlo GBM path simulator.
///
/// Holds only its configuration and variate source; every call to
/// [`simulate`](Self::simulate) allocates, reduces and releases its own
/// ensemble. Successive calls draw fresh variates from the source.
///
/// # Examples
///
/// ```rust
/// use risk_engine::{PathSimulator, SimulationConfig, SimulationParameters};
///
/// let config = SimulationConfig::builder().seed(42).build().unwrap();
/// let mut simulator = PathSimulator::new(config);
///
/// let result = simulator
///     .simulate(&SimulationParameters::new(100.0, 20.0, 252, 1_000))
///     .unwrap();
///
/// assert_eq!(result.paths.len(), 1_000);
/// assert_eq!(result.mean_path.len(), 253);
/// println!("VaR 95%: {:.2}", result.statistics.var_95_loss);
/// ```
pub struct PathSimulator<S = SimRng> {
    config: SimulationConfig,
    source: S,
}

impl PathSimulator<SimRng> {
    /// Creates a simulator drawing from [`SimRng`].
    ///
    /// Seeds from the configuration, or from fresh entropy when no seed is set.
    pub fn new(config: SimulationConfig) -> Self {
        let source = match config.seed() {
            Some(seed) => SimRng::from_seed(seed),
            None => SimRng::from_entropy(),
        };
        Self { config, source }
    }

    /// Seed of the underlying generator, including entropy-drawn seeds.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.source.seed()
    }
}

impl<S: NormalSource> PathSimulator<S> {
    /// Creates a simulator drawing from a caller-supplied source.
    ///
    /// The configured seed is ignored; the source owns its own state.
    pub fn with_source(config: SimulationConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the variate source.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one simulation.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] before any allocation
    /// when `params` is out of domain.
    pub fn simulate(
        &mut self,
        params: &SimulationParameters,
    ) -> Result<SimulationResult, SimulationError> {
        if let Err(err) = params.validate() {
            tracing::warn!(error = %err, "rejected simulation parameters");
            return Err(err);
        }

        let num_paths = params.num_simulations;
        let num_steps = params.days;
        let parallel = self.config.runs_parallel(num_paths);
        let started = Instant::now();

        tracing::debug!(
            num_simulations = num_paths,
            days = num_steps,
            current_price = params.current_price,
            volatility = params.volatility,
            risk_free_rate = params.risk_free_rate,
            parallel,
            "starting GBM simulation"
        );

        let units = params.model_units();

        // validate bounds num_paths × (num_steps + 1)
        let mut randoms = vec![0.0; num_paths * num_steps];
        self.source.fill_standard_normal(&mut randoms);

        let ensemble = PathEnsemble::generate(
            &units,
            params.current_price,
            &randoms,
            num_paths,
            num_steps,
            parallel,
        );
        drop(randoms);

        tracing::trace!(
            elapsed_us = started.elapsed().as_micros() as u64,
            "paths generated"
        );

        let bands = PathBands::from_ensemble(&ensemble, parallel);
        let final_prices = ensemble.terminal_prices();
        let statistics = Statistics::from_final_prices(params.current_price, &final_prices);

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            mean_final_price = statistics.mean_final_price,
            var_95_loss = statistics.var_95_loss,
            "GBM simulation complete"
        );

        Ok(SimulationResult {
            paths: ensemble.into_rows(),
            mean_path: bands.mean_path,
            percentile_5: bands.percentile_5,
            percentile_95: bands.percentile_95,
            final_prices,
            statistics,
        })
    }
}

/// Runs one simulation with default configuration and fresh entropy.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidParameter`] when `params` is out of domain.
pub fn simulate(params: &SimulationParameters) -> Result<SimulationResult, SimulationError> {
    PathSimulator::new(SimulationConfig::default()).simulate(params)
}
