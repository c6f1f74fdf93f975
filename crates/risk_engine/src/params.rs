//! Simulation inputs and their conversion to model units.
//!
//! # Model
//!
//! Asset prices follow Geometric Brownian Motion:
//! ```text
//! dS = μ S dt + σ S dW
//! ```
//!
//! where μ is the annualised drift (the risk-free rate) and σ the annualised
//! volatility. Inputs arrive in presentation units (volatility as a
//! percentage, horizon in trading days) and are converted once by
//! [`SimulationParameters::model_units`].

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Year-length convention: trading days per year.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default annualised drift when the caller omits `risk_free_rate`.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}

/// Scalar inputs of one simulation.
///
/// # Examples
///
/// ```rust
/// use risk_engine::SimulationParameters;
///
/// let params = SimulationParameters::new(100.0, 20.0, 252, 10_000);
/// assert_eq!(params.risk_free_rate, 0.02);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Starting price (S₀). Must be positive.
    pub current_price: f64,
    /// Annualised volatility in percent (20 means 20%/year). Must be nonnegative.
    pub volatility: f64,
    /// Horizon in trading days. Must be at least 1.
    pub days: usize,
    /// Number of independent paths. Must be at least 1.
    pub num_simulations: usize,
    /// Annualised drift as a decimal.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl SimulationParameters {
    /// Creates parameters with the default risk-free rate.
    #[inline]
    pub fn new(current_price: f64, volatility: f64, days: usize, num_simulations: usize) -> Self {
        Self {
            current_price,
            volatility,
            days,
            num_simulations,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }

    /// Returns a copy with the given annualised drift.
    #[inline]
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Number of ensemble entries, `num_simulations × (days + 1)`.
    ///
    /// Saturates instead of overflowing so callers can compare it against a
    /// quota before anything is allocated.
    #[inline]
    pub fn path_cells(&self) -> usize {
        self.num_simulations.saturating_mul(self.days.saturating_add(1))
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if:
    /// - `current_price` is not a positive finite number
    /// - `volatility` is negative or not finite
    /// - `days` or `num_simulations` is zero
    /// - `num_simulations × (days + 1)` overflows `usize`
    /// - `risk_free_rate` is not finite
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.current_price > 0.0 && self.current_price.is_finite()) {
            return Err(SimulationError::invalid(
                "current_price",
                format!("must be positive and finite, got {}", self.current_price),
            ));
        }
        if !(self.volatility >= 0.0 && self.volatility.is_finite()) {
            return Err(SimulationError::invalid(
                "volatility",
                format!("must be nonnegative and finite, got {}", self.volatility),
            ));
        }
        if self.days == 0 {
            return Err(SimulationError::invalid("days", "must be at least 1"));
        }
        if self.num_simulations == 0 {
            return Err(SimulationError::invalid("num_simulations", "must be at least 1"));
        }
        if self
            .days
            .checked_add(1)
            .and_then(|width| self.num_simulations.checked_mul(width))
            .is_none()
        {
            return Err(SimulationError::invalid(
                "num_simulations",
                format!(
                    "{} paths of {} days overflow the addressable ensemble size",
                    self.num_simulations, self.days
                ),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(SimulationError::invalid(
                "risk_free_rate",
                format!("must be finite, got {}", self.risk_free_rate),
            ));
        }
        Ok(())
    }

    /// Converts the inputs to model units.
    ///
    /// Does not validate; call [`validate`](Self::validate) first.
    pub fn model_units(&self) -> ModelUnits {
        let sigma = self.volatility / 100.0;
        let mu = self.risk_free_rate;
        let horizon_years = self.days as f64 / TRADING_DAYS_PER_YEAR;
        // One step is always one trading day, whatever the horizon.
        let dt = horizon_years / self.days as f64;

        ModelUnits {
            sigma,
            mu,
            horizon_years,
            dt,
            drift_dt: (mu - 0.5 * sigma * sigma) * dt,
            vol_sqrt_dt: sigma * dt.sqrt(),
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::new(100.0, 20.0, 252, 1_000)
    }
}

/// GBM coefficients derived from [`SimulationParameters`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelUnits {
    /// Annualised volatility as a decimal.
    pub sigma: f64,
    /// Annualised drift.
    pub mu: f64,
    /// Horizon in years.
    pub horizon_years: f64,
    /// Step length in years (one trading day).
    pub dt: f64,
    /// Log-drift per step, `(μ - σ²/2) dt`.
    pub drift_dt: f64,
    /// Diffusion scale per step, `σ √dt`.
    pub vol_sqrt_dt: f64,
}

impl ModelUnits {
    /// Advances a price by one step given a standard normal draw.
    #[inline]
    pub fn step(&self, price: f64, z: f64) -> f64 {
        price * (self.drift_dt + self.vol_sqrt_dt * z).exp()
    }
}
