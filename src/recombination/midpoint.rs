//! # Midpoint recombiners
//!
//! One recombiner per representation. [`MidPointRecombiner`] averages the
//! parents; the adaptive variants draw a blend factor from the parents'
//! fitness shares (see [`blend_factor`]) so the fitter parent contributes
//! more.
//!
//! All three fail with a `Configuration` error when the parents have
//! different genome lengths.

use std::f64::consts::PI;

use super::{blend_factor, Recombiner};
use crate::{
    chromosome::{
        wrap_angle, AdaptiveStepFloat, AdaptiveStepGene, Chromosome, CovarianceFloat, Float,
        Representation, MIN_STEP_SIZE,
    },
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    individual::Individual,
    mutation::lerp,
    rng::RandomNumberGenerator,
};

fn check_compatible<R: Representation>(parent1: &Individual<R>, parent2: &Individual<R>) -> Result<()> {
    let (len1, len2) = (parent1.chromosome().len(), parent2.chromosome().len());
    if len1 != len2 {
        return Err(GeneticError::Configuration(format!(
            "Cannot recombine {} chromosomes of lengths {} and {}",
            R::NAME,
            len1,
            len2
        )));
    }
    Ok(())
}

/// Gene-wise arithmetic mean of two [`Float`] parents.
///
/// Fitness is not consulted, so parents need not be evaluated. The mean of
/// two in-bound values is in bounds.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use evostrat::chromosome::{Chromosome, Float, ProblemConfig};
/// use evostrat::fitness::FitnessEvaluator;
/// use evostrat::individual::Individual;
/// use evostrat::recombination::{MidPointRecombiner, Recombiner};
/// use evostrat::rng::RandomNumberGenerator;
///
/// let config = Arc::new(ProblemConfig::new(2, -10.0, 10.0).unwrap());
/// let p1 = Individual::new(Chromosome::<Float>::new(vec![2.0, 2.0], Arc::clone(&config)).unwrap(), 0);
/// let p2 = Individual::new(Chromosome::<Float>::new(vec![4.0, 4.0], config).unwrap(), 0);
/// let evaluator = FitnessEvaluator::new(|_: &Chromosome<Float>| 0.0);
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// let child = MidPointRecombiner.recombine(&p1, &p2, &evaluator, &mut rng).unwrap();
/// assert_eq!(child.genes(), &[3.0, 3.0]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MidPointRecombiner;

impl Recombiner<Float> for MidPointRecombiner {
    fn recombine(
        &self,
        parent1: &Individual<Float>,
        parent2: &Individual<Float>,
        _evaluator: &FitnessEvaluator<Float>,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosome<Float>> {
        check_compatible(parent1, parent2)?;
        let genes = parent1
            .chromosome()
            .genes()
            .iter()
            .zip(parent2.chromosome().genes())
            .map(|(a, b)| (a + b) / 2.0)
            .collect();
        Chromosome::new(genes, parent1.chromosome().shared_config())
    }
}

/// Fitness-weighted blend of two [`AdaptiveStepFloat`] parents.
///
/// Values are clamped to the bounds; steps are interpolated without bounds.
///
/// # Errors
///
/// Fails if the lengths differ or a parent's fitness cannot be computed.
/// Unevaluated parents are scored through the evaluator and cached.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptiveStepMidPointRecombiner;

impl Recombiner<AdaptiveStepFloat> for AdaptiveStepMidPointRecombiner {
    fn recombine(
        &self,
        parent1: &Individual<AdaptiveStepFloat>,
        parent2: &Individual<AdaptiveStepFloat>,
        evaluator: &FitnessEvaluator<AdaptiveStepFloat>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosome<AdaptiveStepFloat>> {
        check_compatible(parent1, parent2)?;
        let t = blend_factor(parent1.evaluate(evaluator)?, parent2.evaluate(evaluator)?, rng);
        let config = parent1.chromosome().shared_config();

        let genes = parent1
            .chromosome()
            .genes()
            .iter()
            .zip(parent2.chromosome().genes())
            .map(|(a, b)| {
                AdaptiveStepGene::new(
                    config.clamp(lerp(t, a.value, b.value)),
                    lerp(t, a.step, b.step).max(MIN_STEP_SIZE),
                )
            })
            .collect();
        Chromosome::new(genes, config)
    }
}

/// Fitness-weighted blend of two [`CovarianceFloat`] parents; values, steps
/// and angles are all interpolated with the same factor.
///
/// # Errors
///
/// Fails if the lengths differ or a parent's fitness cannot be computed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CovarianceMidPointRecombiner;

impl Recombiner<CovarianceFloat> for CovarianceMidPointRecombiner {
    fn recombine(
        &self,
        parent1: &Individual<CovarianceFloat>,
        parent2: &Individual<CovarianceFloat>,
        evaluator: &FitnessEvaluator<CovarianceFloat>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosome<CovarianceFloat>> {
        check_compatible(parent1, parent2)?;
        let t = blend_factor(parent1.evaluate(evaluator)?, parent2.evaluate(evaluator)?, rng);
        let config = parent1.chromosome().shared_config();

        let genes = parent1
            .chromosome()
            .genes()
            .iter()
            .zip(parent2.chromosome().genes())
            .map(|(a, b)| lerp(t, *a, *b))
            .collect();
        let mut child = Chromosome::<CovarianceFloat>::new(genes, config)?;

        // Interpolation cannot leave the ranges; this only absorbs rounding.
        let bounds = child.shared_config();
        let (values, steps, angles) = child.parts_mut();
        values.iter_mut().for_each(|v| *v = bounds.clamp(*v));
        steps.iter_mut().for_each(|s| *s = s.max(MIN_STEP_SIZE));
        angles.iter_mut().for_each(|a| *a = wrap_angle(a.min(PI)));

        Ok(child)
    }
}
