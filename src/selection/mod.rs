//! # Selection
//!
//! Three families of strategies decide who takes part in each generation:
//!
//! - [`MatingSelector`]: which parent pairs breed.
//! - [`SurvivorSelector`]: which of parents and offspring form the next population.
//! - [`SolutionSelector`]: which individuals enter the best-ever archive.
//!
//! All of them read the cached fitness of individuals, so the population must
//! be evaluated before a selector sees it.

pub mod kind;
pub mod mating;
pub mod roulette;
pub mod solution;
pub mod survivor;

use std::fmt::Debug;

use crate::{
    chromosome::Representation,
    error::Result,
    individual::{compare_fitness, Individual, Population},
    rng::RandomNumberGenerator,
};

/// A pair of parents borrowed from the current population.
pub type ParentPair<'a, R> = (&'a Individual<R>, &'a Individual<R>);

/// Chooses the parent pairs of a generation.
pub trait MatingSelector<R: Representation>: Debug + Send + Sync {
    /// Returns `num_pairs` parent pairs, or no pairs at all when the
    /// population has at most one individual.
    fn select_pairs<'a>(
        &self,
        population: &'a [Individual<R>],
        num_pairs: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<ParentPair<'a, R>>>;
}

/// Chooses the next population from parents and their offspring.
pub trait SurvivorSelector<R: Representation>: Debug + Send + Sync {
    fn select_survivors(
        &self,
        population_size: usize,
        parents: Population<R>,
        offspring: Population<R>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>>;
}

/// Maintains the archive of the best individuals seen during a run.
pub trait SolutionSelector<R: Representation>: Debug + Send {
    /// Offers the current population to the archive.
    fn update(&mut self, population: &[Individual<R>]) -> Result<()>;

    /// The archive, sorted by ascending fitness.
    fn best_individuals(&self) -> &[Individual<R>];

    /// The best archived individual.
    fn best_individual(&self) -> Option<&Individual<R>> {
        self.best_individuals().last()
    }
}

/// Indices of `scores` from best to worst; ties keep index order.
pub(crate) fn ranked_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| compare_fitness(scores[b], scores[a]));
    order
}

pub use kind::{MatingSelectorKind, SurvivorSelectorKind};
pub use mating::{
    BestFitnessMatingSelector, BestFromRandomMatingSelector, RandomMatingSelector,
    RouletteMatingSelector,
};
pub use roulette::Roulette;
pub use solution::KBestFitnessSolutionSelector;
pub use survivor::{
    BestFitnessSurvivorSelector, BestOffspringSurvivorSelector,
    BestParentPlusOffspringSurvivorSelector, GenerationalSurvivorSelector,
    RouletteSurvivorSelector,
};
