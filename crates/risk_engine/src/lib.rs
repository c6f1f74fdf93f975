//! # Risk Engine
//!
//! Monte Carlo simulation of an asset price under Geometric Brownian Motion,
//! reduced into path bands and Value-at-Risk statistics.
//!
//! ## Pipeline
//!
//! 1. [`SimulationParameters`] are validated and converted to model units
//!    (σ = volatility / 100, one step = one trading day of 1/252 years).
//! 2. A `num_simulations × days` matrix of standard normals is drawn from a
//!    pluggable [`rng::NormalSource`].
//! 3. [`paths::PathEnsemble::generate`] evolves every path with the
//!    log-Euler (exact) GBM step, in parallel across paths.
//! 4. [`statistics::PathBands`] reduces each step to a mean and interpolated
//!    5th/95th percentiles; [`statistics::Statistics`] summarises terminal
//!    prices, including the nearest-rank 95% VaR.
//!
//! ## Usage Example
//!
//! ```rust
//! use risk_engine::{simulate, SimulationParameters};
//!
//! let params = SimulationParameters::new(100.0, 20.0, 252, 10_000)
//!     .with_risk_free_rate(0.02);
//!
//! let result = simulate(&params).unwrap();
//! let stats = &result.statistics;
//!
//! println!("Expected return: {:.2}%", stats.expected_return);
//! println!("95% VaR: {:.2} ({:.2}%)", stats.var_95_loss, stats.var_95_pct);
//! ```
//!
//! ## Reproducibility
//!
//! [`simulate`] draws fresh entropy on every call. Seed a
//! [`PathSimulator`] through [`SimulationConfig`], or inject any
//! [`rng::NormalSource`] with [`PathSimulator::with_source`], to pin draws.
//!
//! ## Resource Use
//!
//! Memory is proportional to `num_simulations × days` and no limit is
//! enforced here; callers must bound [`SimulationParameters::path_cells`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod params;
pub mod paths;
pub mod quantile;
pub mod rng;
pub mod simulator;
pub mod statistics;

pub use config::{ExecutionMode, SimulationConfig, SimulationConfigBuilder};
pub use error::{ConfigError, SimulationError};
pub use params::{ModelUnits, SimulationParameters, DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
pub use simulator::{simulate, PathSimulator, SimulationResult};
pub use statistics::{PathBands, Statistics};
