//! # Solution archive
//!
//! The archive outlives every population of a run. It holds deep copies, so
//! restarts and survivor selection never touch what it has recorded.

use tracing::trace;

use super::{ranked_descending, SolutionSelector};
use crate::{
    chromosome::Representation,
    error::{GeneticError, Result},
    individual::{fitness_scores, sort_ascending, Individual},
};

/// Archive of the `number_solutions` fittest individuals ever offered,
/// sorted by ascending fitness so the best one is last.
///
/// Entries are clones and never alias the live population.
///
/// The first update seeds the archive with the best `number_solutions`
/// individuals of the population. Later updates walk the archive from its
/// worst slot up while walking the population from its best individual
/// down, replacing slots as long as the newcomer is strictly better. The
/// best archived fitness therefore never decreases.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use evostrat::chromosome::{Chromosome, Float, ProblemConfig};
/// use evostrat::individual::Individual;
/// use evostrat::selection::{KBestFitnessSolutionSelector, SolutionSelector};
///
/// let config = Arc::new(ProblemConfig::new(1, -10.0, 10.0).unwrap());
/// let scored = |f: f64| Individual::<Float>::with_fitness(Chromosome::new(vec![f], Arc::clone(&config)).unwrap(), 0, f);
///
/// let mut archive = KBestFitnessSolutionSelector::new(2).unwrap();
/// archive.update(&[scored(1.0), scored(5.0), scored(3.0)]).unwrap();
/// archive.update(&[scored(4.0)]).unwrap();
///
/// let fitness: Vec<f64> = archive.best_individuals().iter().map(|i| i.fitness().unwrap()).collect();
/// assert_eq!(fitness, vec![4.0, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct KBestFitnessSolutionSelector<R: Representation> {
    number_solutions: usize,
    archive: Vec<Individual<R>>,
}

impl<R: Representation> KBestFitnessSolutionSelector<R> {
    /// # Errors
    ///
    /// Returns a `Configuration` error if `number_solutions` is zero.
    pub fn new(number_solutions: usize) -> Result<Self> {
        if number_solutions == 0 {
            return Err(GeneticError::Configuration(
                "The solution archive must hold at least one individual".to_string(),
            ));
        }
        Ok(Self {
            number_solutions,
            archive: Vec::with_capacity(number_solutions),
        })
    }

    pub fn number_solutions(&self) -> usize {
        self.number_solutions
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    pub fn into_individuals(self) -> Vec<Individual<R>> {
        self.archive
    }
}

impl<R: Representation> SolutionSelector<R> for KBestFitnessSolutionSelector<R> {
    /// # Errors
    ///
    /// Returns an `Evolution` error if an individual has not been evaluated.
    fn update(&mut self, population: &[Individual<R>]) -> Result<()> {
        let scores = fitness_scores(population)?;
        let ranked = ranked_descending(&scores);

        if self.archive.is_empty() {
            self.archive = ranked
                .iter()
                .take(self.number_solutions)
                .rev()
                .map(|&i| population[i].clone())
                .collect();
            return Ok(());
        }

        // Walk the archive upward from its worst slot while the incoming
        // population is walked downward from its best individual.
        let mut replaced = 0;
        for (slot, &candidate) in self.archive.iter_mut().zip(&ranked) {
            if scores[candidate] > slot.fitness()? {
                *slot = population[candidate].clone();
                replaced += 1;
            } else {
                break;
            }
        }

        if replaced > 0 {
            sort_ascending(&mut self.archive)?;
            trace!(replaced, "Solution archive updated");
        }
        Ok(())
    }

    fn best_individuals(&self) -> &[Individual<R>] {
        &self.archive
    }
}
