//! Per-gene self-adaptive mutators for [`AdaptiveStepFloat`] chromosomes.

use super::{check_learning_rate_multiplier, learning_rate, lerp, Mutator};
use crate::{
    chromosome::{AdaptiveStepFloat, AdaptiveStepGene, Chromosome, MIN_STEP_SIZE},
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    rng::RandomNumberGenerator,
};

/// Lognormal step self-adaptation.
///
/// Each gene first rescales its own step, `step * exp(lr * N(0, 1))`, then
/// moves its value by `step * N(0, 1)`, with `lr = multiplier / sqrt(n)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveStepMutator {
    learning_rate_multiplier: f64,
}

impl AdaptiveStepMutator {
    pub fn new(learning_rate_multiplier: f64) -> Result<Self> {
        Ok(Self {
            learning_rate_multiplier: check_learning_rate_multiplier(learning_rate_multiplier)?,
        })
    }

    pub fn learning_rate_multiplier(&self) -> f64 {
        self.learning_rate_multiplier
    }
}

impl Default for AdaptiveStepMutator {
    fn default() -> Self {
        Self {
            learning_rate_multiplier: 1.0,
        }
    }
}

impl Mutator<AdaptiveStepFloat> for AdaptiveStepMutator {
    fn mutate_inplace(
        &mut self,
        chromosome: &mut Chromosome<AdaptiveStepFloat>,
        _evaluator: &FitnessEvaluator<AdaptiveStepFloat>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<f64>> {
        let config = chromosome.shared_config();
        let lr = learning_rate(self.learning_rate_multiplier, config.n());

        for gene in chromosome.genes_mut() {
            let step = (gene.step * (lr * rng.standard_normal()).exp()).max(MIN_STEP_SIZE);
            let value = config.clamp(gene.value + step * rng.standard_normal());
            *gene = AdaptiveStepGene::new(value, step);
        }
        Ok(None)
    }
}

/// Fitness-driven step adaptation.
///
/// The new step blends `|fitness| * fitness_scale` with the old step, `lr`
/// being the weight of the fitness term; the value then moves by
/// `step * N(0, 1)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveFitnessStepMutator {
    learning_rate_multiplier: f64,
    fitness_scale: f64,
}

impl AdaptiveFitnessStepMutator {
    pub fn new(learning_rate_multiplier: f64, fitness_scale: f64) -> Result<Self> {
        if !(fitness_scale.is_finite() && fitness_scale >= 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Mutator fitness scale must be non-negative, got {}",
                fitness_scale
            )));
        }
        Ok(Self {
            learning_rate_multiplier: check_learning_rate_multiplier(learning_rate_multiplier)?,
            fitness_scale,
        })
    }

    pub fn fitness_scale(&self) -> f64 {
        self.fitness_scale
    }
}

impl Mutator<AdaptiveStepFloat> for AdaptiveFitnessStepMutator {
    fn mutate_inplace(
        &mut self,
        chromosome: &mut Chromosome<AdaptiveStepFloat>,
        evaluator: &FitnessEvaluator<AdaptiveStepFloat>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<f64>> {
        let config = chromosome.shared_config();
        let lr = learning_rate(self.learning_rate_multiplier, config.n()).min(1.0);
        let target_step = evaluator.evaluate(chromosome)?.abs() * self.fitness_scale;

        for gene in chromosome.genes_mut() {
            let step = lerp(lr, target_step, gene.step).max(MIN_STEP_SIZE);
            let value = config.clamp(gene.value + step * rng.standard_normal());
            *gene = AdaptiveStepGene::new(value, step);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::ProblemConfig;
    use std::sync::Arc;

    fn chromosome(n: usize, step: f64) -> Chromosome<AdaptiveStepFloat> {
        let config = Arc::new(ProblemConfig::new(n, -1.0, 1.0).unwrap());
        let genes = (0..n)
            .map(|i| AdaptiveStepGene::new(if i % 2 == 0 { 0.99 } else { -0.99 }, step))
            .collect();
        Chromosome::new(genes, config).unwrap()
    }

    #[test]
    fn test_adaptive_step_keeps_invariants() {
        let evaluator = FitnessEvaluator::new(|_: &Chromosome<AdaptiveStepFloat>| 0.0);
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mut mutator = AdaptiveStepMutator::new(2.0).unwrap();
        let mut c = chromosome(6, 5.0);

        for _ in 0..50 {
            mutator.mutate_inplace(&mut c, &evaluator, &mut rng).unwrap();
            for gene in c.genes() {
                assert!((-1.0..=1.0).contains(&gene.value));
                assert!(gene.step > 0.0);
            }
        }
        // The fitness is never consulted.
        assert_eq!(evaluator.evaluations(), 0);
    }

    #[test]
    fn test_adaptive_step_changes_steps() {
        let evaluator = FitnessEvaluator::new(|_: &Chromosome<AdaptiveStepFloat>| 0.0);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut mutator = AdaptiveStepMutator::default();
        let mut c = chromosome(4, 0.1);

        mutator.mutate_inplace(&mut c, &evaluator, &mut rng).unwrap();
        assert!(c.genes().iter().any(|gene| gene.step != 0.1));
    }

    #[test]
    fn test_fitness_step_blends_towards_scaled_fitness() {
        let evaluator = FitnessEvaluator::new(|_: &Chromosome<AdaptiveStepFloat>| -10.0);
        let mut rng = RandomNumberGenerator::from_seed(2);
        // n = 4 and multiplier 1.0 give lr = 0.5.
        let mut mutator = AdaptiveFitnessStepMutator::new(1.0, 0.05).unwrap();
        let mut c = chromosome(4, 1.5);

        mutator.mutate_inplace(&mut c, &evaluator, &mut rng).unwrap();
        for gene in c.genes() {
            // 0.5 * (10 * 0.05) + 0.5 * 1.5
            assert!((gene.step - 1.0).abs() < 1e-12);
            assert!((-1.0..=1.0).contains(&gene.value));
        }
        assert_eq!(evaluator.evaluations(), 1);
    }

    #[test]
    fn test_fitness_step_stays_positive_at_zero_fitness() {
        let evaluator = FitnessEvaluator::new(|_: &Chromosome<AdaptiveStepFloat>| 0.0);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut mutator = AdaptiveFitnessStepMutator::new(4.0, 1.0).unwrap();
        let mut c = chromosome(1, 0.3);

        mutator.mutate_inplace(&mut c, &evaluator, &mut rng).unwrap();
        assert!(c.genes()[0].step > 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(AdaptiveStepMutator::new(-1.0).is_err());
        assert!(AdaptiveFitnessStepMutator::new(1.0, -0.5).is_err());
        assert!(AdaptiveFitnessStepMutator::new(0.0, 0.5).is_err());
    }
}
