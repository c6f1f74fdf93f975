//! Error types for the path simulator.
//!
//! - [`SimulationError`]: the single runtime failure mode, an out-of-domain
//!   scalar input. It is detected before any buffer is allocated, so a failed
//!   call never leaves partial state behind.
//! - [`ConfigError`]: invalid engine configuration at construction time.

use thiserror::Error;

/// Simulation error returned by [`crate::PathSimulator::simulate`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A scalar parameter lies outside its valid domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears on the wire.
        name: &'static str,
        /// Description of the violated constraint.
        reason: String,
    },
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns the offending parameter name.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidParameter { name, .. } => *name,
        }
    }
}

/// Configuration error for [`crate::SimulationConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Parallel threshold must be at least one path.
    #[error("Invalid parallel threshold {0}: must be at least 1")]
    InvalidParallelThreshold(usize),
}
