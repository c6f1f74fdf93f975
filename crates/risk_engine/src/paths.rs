//! GBM path generation.
//!
//! Paths are evolved with the log-Euler (exact) scheme:
//! ```text
//! S(t+dt) = S(t) × exp((μ - σ²/2)dt + σ√dt × Z)
//! ```
//! which keeps every price strictly positive and matches the lognormal
//! marginal of GBM at each step.
//!
//! # Memory Layout
//!
//! The ensemble is stored row-major: `prices[path_idx * (num_steps + 1) + step_idx]`
//! where `step_idx = 0` holds the starting price. Variates are laid out the
//! same way with `num_steps` columns.

use rayon::prelude::*;

use crate::params::ModelUnits;

/// Ensemble of simulated price paths, `num_paths × (num_steps + 1)`.
///
/// Produced once by [`PathEnsemble::generate`] and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PathEnsemble {
    prices: Vec<f64>,
    num_paths: usize,
    num_steps: usize,
}

impl PathEnsemble {
    /// Evolves `num_paths` paths of `num_steps` steps from `initial_price`.
    ///
    /// `randoms` must hold `num_paths × num_steps` standard normal draws in
    /// row-major order; row `i` drives path `i`. The step recurrence is
    /// sequential within a path; paths are independent and are evaluated on
    /// the rayon pool when `parallel` is set. Output does not depend on
    /// `parallel`.
    ///
    /// # Panics
    ///
    /// Panics if `num_paths × (num_steps + 1)` overflows `usize`, or if
    /// `randoms.len() != num_paths * num_steps`.
    pub fn generate(
        units: &ModelUnits,
        initial_price: f64,
        randoms: &[f64],
        num_paths: usize,
        num_steps: usize,
        parallel: bool,
    ) -> Self {
        let Some((width, len)) = num_steps
            .checked_add(1)
            .and_then(|width| num_paths.checked_mul(width).map(|len| (width, len)))
        else {
            panic!("ensemble of {num_paths} paths × {num_steps} steps overflows usize");
        };
        assert_eq!(
            Some(randoms.len()),
            num_paths.checked_mul(num_steps),
            "variate buffer must be num_paths × num_steps"
        );

        let mut prices = vec![0.0; len];

        if num_steps == 0 {
            prices.fill(initial_price);
        } else if parallel {
            prices
                .par_chunks_mut(width)
                .zip(randoms.par_chunks(num_steps))
                .for_each(|(row, z)| evolve_path(row, z, units, initial_price));
        } else {
            prices
                .chunks_mut(width)
                .zip(randoms.chunks(num_steps))
                .for_each(|(row, z)| evolve_path(row, z, units, initial_price));
        }

        Self {
            prices,
            num_paths,
            num_steps,
        }
    }

    /// Number of paths (rows).
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Number of time steps; each path has `num_steps + 1` prices.
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Row length, `num_steps + 1`.
    #[inline]
    pub fn width(&self) -> usize {
        self.num_steps + 1
    }

    /// All prices in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    /// Prices of a single path.
    ///
    /// # Panics
    ///
    /// Panics if `path_idx >= num_paths`.
    #[inline]
    pub fn path(&self, path_idx: usize) -> &[f64] {
        let width = self.width();
        &self.prices[path_idx * width..(path_idx + 1) * width]
    }

    /// Iterates over paths in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.prices.chunks_exact(self.width())
    }

    /// Gathers the prices of every path at `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step > num_steps`.
    pub fn column(&self, step: usize) -> Vec<f64> {
        assert!(step <= self.num_steps, "step {} out of range", step);
        self.prices
            .iter()
            .skip(step)
            .step_by(self.width())
            .copied()
            .collect()
    }

    /// Terminal price of every path (the last column).
    #[inline]
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.column(self.num_steps)
    }

    /// Converts the ensemble into one `Vec` per path.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

#[inline]
fn evolve_path(row: &mut [f64], z: &[f64], units: &ModelUnits, initial_price: f64) {
    row[0] = initial_price;
    for step in 0..z.len() {
        row[step + 1] = units.step(row[step], z[step]);
    }
}
