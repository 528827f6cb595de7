//! Randomness source abstraction.
//!
//! Both samplers draw through [`RandomSource`] instead of a concrete generator,
//! so a seeded `StdRng` gives reproducible output and tests can script exact
//! draw sequences.
//!
//! A missing source cannot be expressed: the samplers take `&mut S`.
//!
//! ```compile_fail
//! use randsel_core::bytes::sample_between;
//!
//! let none: Option<&mut rand::rngs::StdRng> = None;
//! let _ = sample_between(b"a", b"b", none);
//! ```

use rand::{Rng, RngCore};

/// Uniform draws consumed by the samplers.
///
/// Implemented for every [`RngCore`], so any `rand` generator can be passed
/// directly.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Implementations may panic when `bound == 0`.
    fn below(&mut self, bound: u32) -> u32;

    /// Uniform float in `[0, 1)`.
    fn unit_f64(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn below(&mut self, bound: u32) -> u32 {
        self.gen_range(0..bound)
    }

    #[inline]
    fn unit_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}
