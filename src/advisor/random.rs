//! Random magnitudes for synthetic estimates
//!
//! Improvement percentages and execution times are bounded random values,
//! not measurements. They are drawn through [`RandomSource`] so tests and
//! reproducible runs can pin them while production draws fresh values on
//! every run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of bounded random integers
pub trait RandomSource {
    /// Uniform integer in `[low, high)`; returns `low` when the range is empty.
    fn next_in_range(&mut self, low: u32, high: u32) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool {
        self.next_unit() >= 0.5
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        (**self).next_in_range(low, high)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        (**self).next_in_range(low, high)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

/// Unseeded source backed by the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        rand::thread_rng().gen_range(low..high)
    }

    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded source; the same seed reproduces the same sequence
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
