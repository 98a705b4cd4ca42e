//! # Individuals and populations
//!
//! An [`Individual`] owns one chromosome, the generation it was born in and a
//! lazily computed fitness. Individuals are never changed in place: breeding
//! always produces new individuals, and cloning one yields a fully
//! independent copy, which is what the solution archive relies on.

use std::cmp::Ordering;
use std::sync::OnceLock;

use rayon::prelude::*;

use crate::chromosome::{Chromosome, Representation};
use crate::error::{GeneticError, Result};
use crate::fitness::FitnessEvaluator;

/// A chromosome plus its cached fitness and generation tag.
#[derive(Debug, Clone)]
pub struct Individual<R: Representation> {
    chromosome: Chromosome<R>,
    fitness: OnceLock<f64>,
    generation: usize,
}

impl<R: Representation> Individual<R> {
    pub fn new(chromosome: Chromosome<R>, generation: usize) -> Self {
        Self {
            chromosome,
            fitness: OnceLock::new(),
            generation,
        }
    }

    /// Creates an individual whose fitness is already known.
    pub fn with_fitness(chromosome: Chromosome<R>, generation: usize, fitness: f64) -> Self {
        Self {
            chromosome,
            fitness: OnceLock::from(fitness),
            generation,
        }
    }

    pub fn chromosome(&self) -> &Chromosome<R> {
        &self.chromosome
    }

    pub fn into_chromosome(self) -> Chromosome<R> {
        self.chromosome
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.get().is_some()
    }

    /// Returns the cached fitness, computing it on first use.
    pub fn evaluate(&self, evaluator: &FitnessEvaluator<R>) -> Result<f64> {
        if let Some(fitness) = self.fitness.get() {
            return Ok(*fitness);
        }
        let fitness = evaluator.evaluate(&self.chromosome)?;
        Ok(*self.fitness.get_or_init(|| fitness))
    }

    /// Returns the cached fitness.
    ///
    /// # Errors
    ///
    /// Returns an `Evolution` error if the individual has not been evaluated yet.
    pub fn fitness(&self) -> Result<f64> {
        self.fitness.get().copied().ok_or_else(|| {
            GeneticError::Evolution(format!(
                "Fitness of a generation {} individual requested before evaluation",
                self.generation
            ))
        })
    }

    /// Copy of this individual tagged with another generation. The chromosome
    /// is unchanged, so the cached fitness carries over.
    pub fn reborn(&self, generation: usize) -> Self {
        Self {
            chromosome: self.chromosome.clone(),
            fitness: self.fitness.clone(),
            generation,
        }
    }
}

/// The live set of individuals of one generation.
pub type Population<R> = Vec<Individual<R>>;

/// Evaluates every individual that has no cached fitness yet. Populations of
/// at least `parallel_threshold` individuals are scored on the rayon pool.
pub fn evaluate_population<R: Representation>(
    population: &[Individual<R>],
    evaluator: &FitnessEvaluator<R>,
    parallel_threshold: usize,
) -> Result<()> {
    if population.len() >= parallel_threshold {
        population
            .par_iter()
            .try_for_each(|individual| individual.evaluate(evaluator).map(|_| ()))
    } else {
        population
            .iter()
            .try_for_each(|individual| individual.evaluate(evaluator).map(|_| ()))
    }
}

/// Cached fitness of every individual, in population order.
pub fn fitness_scores<R: Representation>(population: &[Individual<R>]) -> Result<Vec<f64>> {
    population.iter().map(Individual::fitness).collect()
}

/// Orders fitness values ascending.
pub fn compare_fitness(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Sorts individuals by descending fitness; equal fitness keeps the original order.
pub fn sort_descending<R: Representation>(population: &mut [Individual<R>]) -> Result<()> {
    let scores = fitness_scores(population)?;
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| compare_fitness(scores[b], scores[a]));
    apply_order(population, &order);
    Ok(())
}

/// Sorts individuals by ascending fitness; equal fitness keeps the original order.
pub fn sort_ascending<R: Representation>(population: &mut [Individual<R>]) -> Result<()> {
    let scores = fitness_scores(population)?;
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| compare_fitness(scores[a], scores[b]));
    apply_order(population, &order);
    Ok(())
}

fn apply_order<T: Clone>(items: &mut [T], order: &[usize]) {
    let reordered: Vec<T> = order.iter().map(|&i| items[i].clone()).collect();
    items.clone_from_slice(&reordered);
}

/// Aggregate fitness of one population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSummary {
    pub average: f64,
    pub best: f64,
    pub standard_deviation: f64,
}

impl FitnessSummary {
    /// Summarizes a non-empty list of fitness values. The standard deviation
    /// is the population (not sample) standard deviation.
    pub fn from_scores(scores: &[f64]) -> Result<Self> {
        if scores.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        let count = scores.len() as f64;
        let average = scores.iter().sum::<f64>() / count;
        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = scores.iter().copied().fold(f64::INFINITY, f64::min);

        // Identical scores must report exactly zero spread despite rounding in the mean.
        let standard_deviation = if best == worst {
            0.0
        } else {
            (scores.iter().map(|s| (s - average).powi(2)).sum::<f64>() / count).sqrt()
        };

        Ok(Self {
            average,
            best,
            standard_deviation,
        })
    }
}
