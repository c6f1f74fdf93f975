//! Reductions of a path ensemble into bands and risk statistics.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::paths::PathEnsemble;
use crate::quantile::{interpolated_percentile, nearest_rank_quantile, sort_ascending};

/// Lower band percentile.
pub const LOWER_BAND_PERCENTILE: f64 = 5.0;

/// Upper band percentile.
pub const UPPER_BAND_PERCENTILE: f64 = 95.0;

/// Tail fraction for the 95% Value-at-Risk.
pub const VAR_TAIL: f64 = 0.05;

/// Rounds to two decimal places.
///
/// Rounds the exact binary value through its correctly rounded decimal
/// expansion, so `1.115` (stored just below the tie) becomes `1.11`.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Per-step cross-path summaries, each of length `num_steps + 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathBands {
    /// Arithmetic mean over paths at each step.
    pub mean_path: Vec<f64>,
    /// Interpolated 5th percentile at each step.
    pub percentile_5: Vec<f64>,
    /// Interpolated 95th percentile at each step.
    pub percentile_95: Vec<f64>,
}

impl PathBands {
    /// Reduces every column of the ensemble.
    ///
    /// Each column is summed in row order, so serial and parallel
    /// evaluation agree exactly.
    pub fn from_ensemble(ensemble: &PathEnsemble, parallel: bool) -> Self {
        let reduce = |step: usize| column_summary(ensemble.column(step));

        let summaries: Vec<(f64, f64, f64)> = if parallel {
            (0..ensemble.width()).into_par_iter().map(reduce).collect()
        } else {
            (0..ensemble.width()).map(reduce).collect()
        };

        let mut bands = Self {
            mean_path: Vec::with_capacity(summaries.len()),
            percentile_5: Vec::with_capacity(summaries.len()),
            percentile_95: Vec::with_capacity(summaries.len()),
        };
        for (mean, lower, upper) in summaries {
            bands.mean_path.push(mean);
            bands.percentile_5.push(lower);
            bands.percentile_95.push(upper);
        }
        bands
    }
}

fn column_summary(mut column: Vec<f64>) -> (f64, f64, f64) {
    let mean = column.iter().sum::<f64>() / column.len() as f64;
    sort_ascending(&mut column);
    (
        mean,
        interpolated_percentile(&column, LOWER_BAND_PERCENTILE),
        interpolated_percentile(&column, UPPER_BAND_PERCENTILE),
    )
}

/// Risk statistics of the terminal price distribution.
///
/// Every field except `initial_price` is rounded to two decimals; the
/// rounding happens once, after the full-precision computation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Starting price, echoed unrounded.
    pub initial_price: f64,
    /// Mean terminal price.
    pub mean_final_price: f64,
    /// Population standard deviation of terminal prices.
    pub std_dev: f64,
    /// Smallest terminal price.
    pub min_price: f64,
    /// Largest terminal price.
    pub max_price: f64,
    /// Nearest-rank 5% terminal price.
    pub var_95_price: f64,
    /// `initial_price - var_95_price`; negative when even the tail gains.
    pub var_95_loss: f64,
    /// `var_95_loss` as a percentage of `initial_price`.
    pub var_95_pct: f64,
    /// Mean terminal return in percent.
    pub expected_return: f64,
}

impl Statistics {
    /// Computes the statistics of `final_prices` relative to `initial_price`.
    ///
    /// `final_prices` must be non-empty and `initial_price` positive; the
    /// simulator guarantees both.
    pub fn from_final_prices(initial_price: f64, final_prices: &[f64]) -> Self {
        debug_assert!(!final_prices.is_empty());

        let n = final_prices.len() as f64;
        let mean = final_prices.iter().sum::<f64>() / n;
        let variance = final_prices
            .iter()
            .map(|&price| (price - mean) * (price - mean))
            .sum::<f64>()
            / n;

        let mut sorted = final_prices.to_vec();
        sort_ascending(&mut sorted);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let var_price = nearest_rank_quantile(&sorted, VAR_TAIL);
        let var_loss = initial_price - var_price;
        let var_pct = var_loss / initial_price * 100.0;
        let expected_return = (mean - initial_price) / initial_price * 100.0;

        Self {
            initial_price,
            mean_final_price: round_to_cents(mean),
            std_dev: round_to_cents(variance.sqrt()),
            min_price: round_to_cents(min),
            max_price: round_to_cents(max),
            var_95_price: round_to_cents(var_price),
            var_95_loss: round_to_cents(var_loss),
            var_95_pct: round_to_cents(var_pct),
            expected_return: round_to_cents(expected_return),
        }
    }
}
