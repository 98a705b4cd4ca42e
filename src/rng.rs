//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness of an
//! experiment. It is created once per run (optionally from a fixed seed) and
//! passed explicitly to every stochastic operation, so two runs built from the
//! same seed draw exactly the same sequence.
//!
//! ## Example
//!
//! ```rust
//! use evostrat::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let random_numbers = rng.fetch_uniform(0.0, 1.0, 5);
//! assert_eq!(random_numbers.len(), 5);
//!
//! let noise = rng.standard_normal();
//! assert!(noise.is_finite());
//! ```

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};
use std::collections::VecDeque;

use crate::error::{GeneticError, Result};

/// A wrapper around the `rand` crate's `StdRng` that provides the draws the
/// evolutionary operators need.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a specified number of random floating-point numbers within the given range.
    ///
    /// # Parameters
    ///
    /// - `from`: The lower bound of the range (inclusive).
    /// - `to`: The upper bound of the range (exclusive).
    /// - `num`: The number of random numbers to generate.
    pub fn fetch_uniform(&mut self, from: f64, to: f64, num: usize) -> VecDeque<f64> {
        let mut uniform_numbers = VecDeque::with_capacity(num);
        uniform_numbers.extend((0..num).map(|_| self.uniform(from, to)));
        uniform_numbers
    }

    /// Draws one value uniformly from `[from, to)`. A degenerate range yields `from`.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        if from < to {
            self.rng.gen_range(from..to)
        } else {
            from
        }
    }

    /// Draws one value from the standard normal distribution `N(0, 1)`.
    pub fn standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }

    /// Draws one value from `N(mean, std_dev)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumericValue` if `std_dev` is negative or not finite.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            GeneticError::InvalidNumericValue(format!(
                "cannot sample N({}, {}): {}",
                mean, std_dev, e
            ))
        })?;
        Ok(normal.sample(&mut self.rng))
    }

    /// Returns `true` with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    /// Draws an index uniformly from `0..len`. `len` must be positive.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Shuffles the slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
