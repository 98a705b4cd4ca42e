//! # Mating selection
//!
//! Mating selectors turn an evaluated population into the parent pairs of
//! one generation. Pairs borrow from the population, so breeding never
//! copies a parent it does not need.
//!
//! All selectors return no pairs at all for populations of zero or one
//! individual, which the experiment treats as "skip breeding".

use super::{ranked_descending, MatingSelector, ParentPair, Roulette};
use crate::{
    chromosome::Representation,
    error::Result,
    individual::{fitness_scores, Individual},
    rng::RandomNumberGenerator,
};

/// Size of the random window [`BestFromRandomMatingSelector`] picks from.
pub const RANDOM_WINDOW: usize = 5;

/// Pairs individuals in order of decreasing fitness: best with second best,
/// third with fourth, and so on, wrapping around when more pairs are asked
/// for than the population holds.
///
/// # Arguments
///
/// * `population` - The evaluated population.
/// * `num_pairs` - The number of pairs to return.
///
/// # Returns
///
/// `num_pairs` pairs, or none if the population has at most one individual.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use evostrat::chromosome::{Chromosome, Float, ProblemConfig};
/// use evostrat::individual::Individual;
/// use evostrat::rng::RandomNumberGenerator;
/// use evostrat::selection::{BestFitnessMatingSelector, MatingSelector};
///
/// let config = Arc::new(ProblemConfig::new(1, -10.0, 10.0).unwrap());
/// let population: Vec<Individual<Float>> = [1.0, 4.0, 3.0, 2.0]
///     .iter()
///     .map(|&f| Individual::with_fitness(Chromosome::new(vec![f], Arc::clone(&config)).unwrap(), 0, f))
///     .collect();
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// let pairs = BestFitnessMatingSelector.select_pairs(&population, 2, &mut rng).unwrap();
/// let fitness: Vec<(f64, f64)> = pairs
///     .iter()
///     .map(|(a, b)| (a.fitness().unwrap(), b.fitness().unwrap()))
///     .collect();
/// assert_eq!(fitness, vec![(4.0, 3.0), (2.0, 1.0)]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestFitnessMatingSelector;

impl<R: Representation> MatingSelector<R> for BestFitnessMatingSelector {
    fn select_pairs<'a>(
        &self,
        population: &'a [Individual<R>],
        num_pairs: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<ParentPair<'a, R>>> {
        if population.len() <= 1 {
            return Ok(Vec::new());
        }
        let order = ranked_descending(&fitness_scores(population)?);
        let len = order.len();

        Ok((0..num_pairs)
            .map(|k| {
                (
                    &population[order[(2 * k) % len]],
                    &population[order[(2 * k + 1) % len]],
                )
            })
            .collect())
    }
}

/// Fitness-proportional mate choice with replacement; the two mates of a
/// pair are drawn independently, so an individual may mate with itself.
///
/// Weights are shifted by the lowest fitness (see [`Roulette`]), which makes
/// the selector usable with negative fitness values.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouletteMatingSelector;

impl<R: Representation> MatingSelector<R> for RouletteMatingSelector {
    fn select_pairs<'a>(
        &self,
        population: &'a [Individual<R>],
        num_pairs: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<ParentPair<'a, R>>> {
        if population.len() <= 1 {
            return Ok(Vec::new());
        }
        let wheel = Roulette::new(&fitness_scores(population)?)?;

        Ok((0..num_pairs)
            .map(|_| {
                let first = wheel.spin(rng);
                let second = wheel.spin(rng);
                (&population[first], &population[second])
            })
            .collect())
    }
}

/// For each pair, shuffles the population, looks at a window of at most
/// [`RANDOM_WINDOW`] individuals and mates the best two of them.
///
/// A small tournament: strong individuals are favored without the
/// population collapsing onto the single best pair.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestFromRandomMatingSelector;

impl<R: Representation> MatingSelector<R> for BestFromRandomMatingSelector {
    fn select_pairs<'a>(
        &self,
        population: &'a [Individual<R>],
        num_pairs: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<ParentPair<'a, R>>> {
        if population.len() <= 1 {
            return Ok(Vec::new());
        }
        let scores = fitness_scores(population)?;
        let window = RANDOM_WINDOW.min(population.len());
        let mut indices: Vec<usize> = (0..population.len()).collect();

        let mut pairs = Vec::with_capacity(num_pairs);
        for _ in 0..num_pairs {
            rng.shuffle(&mut indices);
            let candidates = &indices[..window];
            let window_scores: Vec<f64> = candidates.iter().map(|&i| scores[i]).collect();
            let ranked = ranked_descending(&window_scores);
            pairs.push((
                &population[candidates[ranked[0]]],
                &population[candidates[ranked[1]]],
            ));
        }
        Ok(pairs)
    }
}

/// Uniformly random pairs of two distinct individuals. Fitness is ignored.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomMatingSelector;

impl<R: Representation> MatingSelector<R> for RandomMatingSelector {
    fn select_pairs<'a>(
        &self,
        population: &'a [Individual<R>],
        num_pairs: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<ParentPair<'a, R>>> {
        let len = population.len();
        if len <= 1 {
            return Ok(Vec::new());
        }

        Ok((0..num_pairs)
            .map(|_| {
                let first = rng.index(len);
                // Skip over `first` so the mates differ.
                let mut second = rng.index(len - 1);
                if second >= first {
                    second += 1;
                }
                (&population[first], &population[second])
            })
            .collect())
    }
}
