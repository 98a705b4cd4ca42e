//! # Recombination
//!
//! A [`Recombiner`] builds one new chromosome from two parents without
//! touching them. The adaptive recombiners weight the parents by their share
//! of the summed fitness, see [`blend_factor`].

pub mod midpoint;

use std::fmt::Debug;

use crate::{
    chromosome::{Chromosome, Representation},
    error::Result,
    fitness::FitnessEvaluator,
    individual::Individual,
    rng::RandomNumberGenerator,
};

/// Standard deviation of the noise added to the fitness share.
pub const BLEND_NOISE: f64 = 0.1;

/// Trait for operators that combine two parents of representation `R`.
pub trait Recombiner<R: Representation>: Debug + Send + Sync {
    /// Produces a fresh chromosome from two parents.
    ///
    /// Parents are passed as individuals so their cached fitness can be
    /// reused; uncached parents are evaluated through `evaluator`.
    fn recombine(
        &self,
        parent1: &Individual<R>,
        parent2: &Individual<R>,
        evaluator: &FitnessEvaluator<R>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosome<R>>;
}

/// Weight of the first parent: `f1 / (f1 + f2) + N(0, 0.1)`, clamped to
/// `[0, 1]`. When the fitness values sum to zero the share is undefined and
/// the factor is exactly `0.5`.
pub fn blend_factor(fitness1: f64, fitness2: f64, rng: &mut RandomNumberGenerator) -> f64 {
    let total = fitness1 + fitness2;
    if total == 0.0 {
        return 0.5;
    }
    let share = fitness1 / total + BLEND_NOISE * rng.standard_normal();
    if share.is_finite() {
        share.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

pub use midpoint::{AdaptiveStepMidPointRecombiner, CovarianceMidPointRecombiner, MidPointRecombiner};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_factor_zero_sum() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert_eq!(blend_factor(0.0, 0.0, &mut rng), 0.5);
        assert_eq!(blend_factor(-2.0, 2.0, &mut rng), 0.5);
    }

    #[test]
    fn test_blend_factor_is_clamped() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        for _ in 0..1000 {
            let t = blend_factor(3.0, 1.0, &mut rng);
            assert!((0.0..=1.0).contains(&t));
        }
        // A share far outside [0, 1] is clamped whatever the noise.
        assert_eq!(blend_factor(10.0, -9.0, &mut rng), 1.0);
        assert_eq!(blend_factor(-10.0, 11.0, &mut rng), 0.0);
    }

    #[test]
    fn test_blend_factor_tracks_fitness_share() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mean = (0..5000).map(|_| blend_factor(3.0, 1.0, &mut rng)).sum::<f64>() / 5000.0;
        assert!((mean - 0.75).abs() < 0.01, "mean {}", mean);
    }
}
