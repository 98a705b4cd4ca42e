//! # Survivor selection
//!
//! Survivor selectors shrink the parents and their freshly bred offspring
//! back to the population size. They differ in how much weight incumbents
//! get: [`BestFitnessSurvivorSelector`] is fully elitist,
//! [`BestParentPlusOffspringSurvivorSelector`] keeps only the single best
//! parent, and [`BestOffspringSurvivorSelector`] replaces parents wherever
//! enough offspring exist.
//!
//! Every selector expects both populations to be evaluated and returns at
//! most `population_size` individuals, fewer only when parents and offspring
//! together are fewer than that.

use super::{ranked_descending, Roulette, SurvivorSelector};
use crate::{
    chromosome::Representation,
    error::Result,
    individual::{fitness_scores, sort_descending, Individual, Population},
    rng::RandomNumberGenerator,
};

/// Merges parents and offspring as two fitness-sorted queues, always taking
/// the better head. On equal fitness the parent is taken first.
///
/// # Arguments
///
/// * `population_size` - The number of survivors to keep.
/// * `parents` - The current population, in any order.
/// * `offspring` - The evaluated offspring of this generation, in any order.
///
/// # Returns
///
/// The survivors from best to worst.
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
/// use evostrat::selection::{BestFitnessSurvivorSelector, SurvivorSelector};
///
/// let config = Arc::new(ProblemConfig::new(1, -10.0, 10.0).unwrap());
/// let scored = |fitness: f64, generation: usize| {
///     let chromosome = Chromosome::<Float>::new(vec![fitness], Arc::clone(&config)).unwrap();
///     Individual::with_fitness(chromosome, generation, fitness)
/// };
///
/// let parents = vec![scored(10.0, 0), scored(8.0, 0), scored(6.0, 0)];
/// let offspring = vec![scored(9.0, 1), scored(7.0, 1)];
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// let survivors = BestFitnessSurvivorSelector
///     .select_survivors(4, parents, offspring, &mut rng)
///     .unwrap();
/// let fitness: Vec<f64> = survivors.iter().map(|i| i.fitness().unwrap()).collect();
/// assert_eq!(fitness, vec![10.0, 9.0, 8.0, 7.0]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestFitnessSurvivorSelector;

impl<R: Representation> SurvivorSelector<R> for BestFitnessSurvivorSelector {
    fn select_survivors(
        &self,
        population_size: usize,
        mut parents: Population<R>,
        mut offspring: Population<R>,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        sort_descending(&mut parents)?;
        sort_descending(&mut offspring)?;

        let mut parents = parents.into_iter().peekable();
        let mut offspring = offspring.into_iter().peekable();
        let mut survivors = Vec::with_capacity(population_size);

        while survivors.len() < population_size {
            let take_parent = match (parents.peek(), offspring.peek()) {
                (Some(p), Some(o)) => p.fitness()? >= o.fitness()?,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_parent {
                parents.next()
            } else {
                offspring.next()
            };
            survivors.extend(next);
        }
        Ok(survivors)
    }
}

/// Keeps the best offspring; parents only fill the places the offspring
/// cannot.
///
/// # Arguments
///
/// * `population_size` - The number of survivors to keep.
/// * `parents` - The current population, only used as filler.
/// * `offspring` - The evaluated offspring of this generation.
///
/// # Returns
///
/// The best offspring from best to worst, followed by the best parents when
/// there were fewer than `population_size` offspring.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestOffspringSurvivorSelector;

impl<R: Representation> SurvivorSelector<R> for BestOffspringSurvivorSelector {
    fn select_survivors(
        &self,
        population_size: usize,
        mut parents: Population<R>,
        mut offspring: Population<R>,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        sort_descending(&mut offspring)?;
        offspring.truncate(population_size);

        let missing = population_size - offspring.len();
        if missing > 0 {
            sort_descending(&mut parents)?;
            offspring.extend(parents.into_iter().take(missing));
        }
        Ok(offspring)
    }
}

/// Keeps the single best parent and gives every other place to the best
/// offspring.
///
/// This is [`BestOffspringSurvivorSelector`] with an elite of one: the best
/// solution found so far can never be lost, while the rest of the population
/// is renewed every generation.
///
/// # Arguments
///
/// * `population_size` - The number of survivors to keep.
/// * `parents` - The current population; its best member always survives.
/// * `offspring` - The evaluated offspring of this generation.
///
/// # Returns
///
/// The best parent, then the best offspring from best to worst. When the
/// offspring cannot fill the population, the next best parents follow.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestParentPlusOffspringSurvivorSelector;

impl<R: Representation> SurvivorSelector<R> for BestParentPlusOffspringSurvivorSelector {
    fn select_survivors(
        &self,
        population_size: usize,
        mut parents: Population<R>,
        mut offspring: Population<R>,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        if population_size == 0 {
            return Ok(Vec::new());
        }
        sort_descending(&mut parents)?;
        sort_descending(&mut offspring)?;

        let mut parents = parents.into_iter();
        let mut survivors = Vec::with_capacity(population_size);
        survivors.extend(parents.next());

        let open = population_size - survivors.len();
        survivors.extend(offspring.into_iter().take(open));

        let missing = population_size - survivors.len();
        survivors.extend(parents.take(missing));
        Ok(survivors)
    }
}

/// Ranks parents and offspring by fitness relative to the average, weighted
/// by how recent the individual is relative to the average generation:
///
/// `score = (fitness / avg_fitness) * (generation / avg_generation)`
///
/// Either average is replaced by `1.0` when it is zero. Parents and
/// offspring compete in one pool.
///
/// # Returns
///
/// The `population_size` highest scoring individuals, best score first.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationalSurvivorSelector;

impl GenerationalSurvivorSelector {
    fn scores<R: Representation>(pool: &[Individual<R>]) -> Result<Vec<f64>> {
        let fitness = fitness_scores(pool)?;
        let count = pool.len() as f64;
        let floor = |avg: f64| if avg == 0.0 { 1.0 } else { avg };

        let avg_fitness = floor(fitness.iter().sum::<f64>() / count);
        let avg_generation = floor(pool.iter().map(|i| i.generation() as f64).sum::<f64>() / count);

        Ok(pool
            .iter()
            .zip(fitness)
            .map(|(individual, f)| {
                (f / avg_fitness) * (individual.generation() as f64 / avg_generation)
            })
            .collect())
    }
}

impl<R: Representation> SurvivorSelector<R> for GenerationalSurvivorSelector {
    fn select_survivors(
        &self,
        population_size: usize,
        parents: Population<R>,
        offspring: Population<R>,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        let mut pool = parents;
        pool.extend(offspring);
        if pool.is_empty() {
            return Ok(pool);
        }

        let order = ranked_descending(&Self::scores(&pool)?);
        let mut slots: Vec<Option<Individual<R>>> = pool.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .take(population_size)
            .filter_map(|i| slots[i].take())
            .collect())
    }
}

/// Fitness-proportional survival without replacement over parents and
/// offspring together.
///
/// Weights are shifted by the lowest fitness in the pool, see [`Roulette`],
/// so negative fitness values are fine. When the pool is not larger than
/// `population_size` it is returned unchanged.
///
/// # Errors
///
/// Returns an `Evolution` error if an individual has not been evaluated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouletteSurvivorSelector;

impl<R: Representation> SurvivorSelector<R> for RouletteSurvivorSelector {
    fn select_survivors(
        &self,
        population_size: usize,
        parents: Population<R>,
        offspring: Population<R>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        let mut pool = parents;
        pool.extend(offspring);
        if pool.len() <= population_size {
            return Ok(pool);
        }

        let wheel = Roulette::new(&fitness_scores(&pool)?)?;
        let drawn = wheel.draw_distinct(population_size, rng);
        let mut slots: Vec<Option<Individual<R>>> = pool.into_iter().map(Some).collect();
        Ok(drawn.into_iter().filter_map(|i| slots[i].take()).collect())
    }
}
