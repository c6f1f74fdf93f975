//! # Standard Normal Variate Sources
//!
//! The simulator never owns a global generator. It draws its
//! `num_simulations × days` variate matrix from any [`NormalSource`], so
//! seeded or replayed draws can be injected for testing.
//!
//! ## Module Structure
//!
//! - `prng`: [`SimRng`], `rand::StdRng` with Ziggurat normal sampling
//! - `replay`: [`ReplaySource`], replays a fixed buffer of draws
//!
//! ## Usage Example
//!
//! ```rust
//! use risk_engine::rng::{NormalSource, SimRng};
//!
//! let mut rng = SimRng::from_seed(12345);
//!
//! // Batch generation into a pre-allocated buffer (zero allocation)
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_standard_normal(&mut buffer);
//! ```

mod prng;
mod replay;

pub use prng::SimRng;
pub use replay::ReplaySource;

/// Producer of i.i.d. standard normal variates (mean 0, variance 1).
///
/// Implementations fill the whole buffer; the simulator lays it out
/// row-major, one row of `days` draws per path.
pub trait NormalSource {
    /// Fills `buffer` with standard normal variates.
    fn fill_standard_normal(&mut self, buffer: &mut [f64]);
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn fill_standard_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_standard_normal(buffer)
    }
}

impl<S: NormalSource + ?Sized> NormalSource for Box<S> {
    #[inline]
    fn fill_standard_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_standard_normal(buffer)
    }
}
