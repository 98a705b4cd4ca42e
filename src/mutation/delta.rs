//! # DeltaMutator
//!
//! Gaussian perturbation with one step size shared by every gene and every
//! call, adapted with the 1/5-success rule: when more than a fifth of past
//! mutations improved fitness the step shrinks, when fewer did it grows.

use tracing::trace;

use super::Mutator;
use crate::{
    chromosome::{Chromosome, Float, MIN_STEP_SIZE},
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    rng::RandomNumberGenerator,
};

/// Factor applied to the step size on each adaptation.
pub const STEP_MULTIPLIER: f64 = 0.99;

/// Global self-adaptive Gaussian mutator for [`Float`] chromosomes.
///
/// The success counters live in the instance, so every experiment adapts its
/// own step size independently.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaMutator {
    current_step_size: f64,
    total_mutations: u64,
    successful_mutations: u64,
}

impl DeltaMutator {
    /// Creates a mutator starting at `step_size`.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `step_size` is not positive.
    pub fn new(step_size: f64) -> Result<Self> {
        Self::with_state(step_size, 0, 0)
    }

    /// Creates a mutator resuming from known counters.
    pub fn with_state(
        step_size: f64,
        total_mutations: u64,
        successful_mutations: u64,
    ) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Step size must be positive, got {}",
                step_size
            )));
        }
        if successful_mutations > total_mutations {
            return Err(GeneticError::Configuration(format!(
                "Successful mutations ({}) cannot exceed total mutations ({})",
                successful_mutations, total_mutations
            )));
        }
        Ok(Self {
            current_step_size: step_size,
            total_mutations,
            successful_mutations,
        })
    }

    pub fn current_step_size(&self) -> f64 {
        self.current_step_size
    }

    pub fn total_mutations(&self) -> u64 {
        self.total_mutations
    }

    pub fn successful_mutations(&self) -> u64 {
        self.successful_mutations
    }

    /// Applies the 1/5-success rule to the current counters. The step never
    /// shrinks below [`MIN_STEP_SIZE`].
    pub fn adapt_step_size(&mut self) {
        let successes = 5 * self.successful_mutations;
        if successes > self.total_mutations {
            self.current_step_size = (self.current_step_size * STEP_MULTIPLIER).max(MIN_STEP_SIZE);
        } else if successes < self.total_mutations {
            self.current_step_size /= STEP_MULTIPLIER;
        }
    }
}

impl Mutator<Float> for DeltaMutator {
    fn mutate_inplace(
        &mut self,
        chromosome: &mut Chromosome<Float>,
        evaluator: &FitnessEvaluator<Float>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<f64>> {
        let old_fitness = evaluator.evaluate(chromosome)?;
        self.total_mutations += 1;
        self.adapt_step_size();

        let config = chromosome.shared_config();
        let step = self.current_step_size;
        for gene in chromosome.genes_mut() {
            *gene = config.clamp(*gene + step * rng.standard_normal());
        }

        let new_fitness = evaluator.evaluate(chromosome)?;
        if new_fitness > old_fitness {
            self.successful_mutations += 1;
        }

        trace!(
            step_size = self.current_step_size,
            successes = self.successful_mutations,
            total = self.total_mutations,
            "delta mutation"
        );
        Ok(Some(new_fitness))
    }
}
