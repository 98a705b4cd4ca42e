//! # Mutation
//!
//! A [`Mutator`] perturbs a chromosome in place. Each operator implements the
//! trait only for the representations it understands:
//!
//! | Operator                       | Representation        |
//! |--------------------------------|-----------------------|
//! | [`DeltaMutator`]               | [`Float`]             |
//! | [`AdaptiveStepMutator`]        | [`AdaptiveStepFloat`] |
//! | [`AdaptiveFitnessStepMutator`] | [`AdaptiveStepFloat`] |
//! | [`CovarianceMutator`]          | [`CovarianceFloat`]   |
//! | [`SwapGeneMutator`]            | [`Float`], [`AdaptiveStepFloat`] |
//! | [`SwapGeneRangeMutator`]       | [`Float`], [`AdaptiveStepFloat`] |
//!
//! Every operator keeps value genes inside the problem bounds, step genes
//! strictly positive and angle genes inside `(-π, π]`.
//!
//! [`Float`]: crate::chromosome::Float
//! [`AdaptiveStepFloat`]: crate::chromosome::AdaptiveStepFloat
//! [`CovarianceFloat`]: crate::chromosome::CovarianceFloat

pub mod adaptive;
pub mod covariance;
pub mod delta;
pub mod swap;

use std::fmt::Debug;

use crate::{
    chromosome::{Chromosome, Representation},
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    rng::RandomNumberGenerator,
};

/// Trait for operators that mutate chromosomes of representation `R`.
///
/// Mutators take `&mut self` because some of them (the 1/5-success rule in
/// [`DeltaMutator`]) carry state across calls. That state belongs to the
/// operator instance, so each experiment owns its own.
pub trait Mutator<R: Representation>: Debug + Send {
    /// Overwrites the genes of `chromosome` with a mutated version.
    ///
    /// # Returns
    ///
    /// The fitness of the mutated chromosome when the operator already had
    /// to compute it, so callers can reuse it instead of scoring the
    /// chromosome again. `None` otherwise.
    ///
    /// # Errors
    ///
    /// Fails if a fitness computation fails or the operator's internal model
    /// becomes inconsistent.
    fn mutate_inplace(
        &mut self,
        chromosome: &mut Chromosome<R>,
        evaluator: &FitnessEvaluator<R>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<f64>>;
}

/// Self-adaptation learning rate `multiplier / sqrt(n)`.
pub fn learning_rate(multiplier: f64, n: usize) -> f64 {
    multiplier / (n as f64).sqrt()
}

/// Linear interpolation where `t` is the weight of `a`: `t * a + (1 - t) * b`.
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    t * a + (1.0 - t) * b
}

pub(crate) fn check_learning_rate_multiplier(multiplier: f64) -> Result<f64> {
    if multiplier.is_finite() && multiplier > 0.0 {
        Ok(multiplier)
    } else {
        Err(GeneticError::Configuration(format!(
            "Learning rate multiplier must be positive, got {}",
            multiplier
        )))
    }
}

pub use adaptive::{AdaptiveFitnessStepMutator, AdaptiveStepMutator};
pub use covariance::{assemble_covariance_matrix, sample_multivariate_normal, CovarianceMutator};
pub use delta::DeltaMutator;
pub use swap::{SwapGeneMutator, SwapGeneRangeMutator};
