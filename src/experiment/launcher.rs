use std::fmt;

use tracing::{debug, info, warn};

use super::options::ExperimentOptions;
use crate::{
    chromosome::{ChromosomeFactory, Representation},
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    individual::{evaluate_population, fitness_scores, FitnessSummary, Individual, Population},
    mutation::Mutator,
    recombination::Recombiner,
    rng::RandomNumberGenerator,
    selection::{MatingSelector, SolutionSelector, SurvivorSelector},
    statistics::StatisticsCollector,
};

/// Why a run stopped.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// An individual reached the target fitness.
    TargetReached,
    /// The generation limit was reached.
    MaxGenerations,
    /// The fitness evaluation budget was spent.
    BudgetExhausted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TargetReached => "target fitness reached",
            Self::MaxGenerations => "generation limit reached",
            Self::BudgetExhausted => "evaluation budget exhausted",
        };
        f.write_str(text)
    }
}

/// Everything a finished run hands back.
#[derive(Debug)]
pub struct ExperimentOutcome<R: Representation> {
    /// The solution archive, sorted by ascending fitness.
    pub best_individuals: Vec<Individual<R>>,
    pub statistics: Vec<Box<dyn StatisticsCollector>>,
    pub final_population: Population<R>,
    pub termination: TerminationReason,
    /// Generations stepped through, restarts included.
    pub generations: usize,
    pub evaluations: usize,
    pub restarts: usize,
}

impl<R: Representation> ExperimentOutcome<R> {
    /// The fittest individual ever archived.
    pub fn best_individual(&self) -> Option<&Individual<R>> {
        self.best_individuals.last()
    }

    /// The collector recording the metric `name`, if it took part in the run.
    pub fn statistic(&self, name: &str) -> Option<&dyn StatisticsCollector> {
        self.statistics
            .iter()
            .find(|collector| collector.name() == name)
            .map(|collector| collector.as_ref())
    }
}

/// One configured evolutionary run.
///
/// The experiment owns its operators, so operator state such as the
/// [`DeltaMutator`](crate::mutation::DeltaMutator) success counters lives
/// exactly as long as the run.
pub struct Experiment<R, M, X>
where
    R: Representation,
    M: Mutator<R>,
    X: Recombiner<R>,
{
    pub(super) options: ExperimentOptions,
    pub(super) factory: Box<dyn ChromosomeFactory<R>>,
    pub(super) evaluator: FitnessEvaluator<R>,
    pub(super) mutator: M,
    pub(super) recombiner: X,
    pub(super) mating_selector: Box<dyn MatingSelector<R>>,
    pub(super) survivor_selector: Box<dyn SurvivorSelector<R>>,
    pub(super) solution_selector: Box<dyn SolutionSelector<R>>,
    pub(super) statistics: Vec<Box<dyn StatisticsCollector>>,
}

impl<R, M, X> fmt::Debug for Experiment<R, M, X>
where
    R: Representation,
    M: Mutator<R>,
    X: Recombiner<R>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Experiment")
            .field("representation", &R::NAME)
            .field("options", &self.options)
            .field("mutator", &self.mutator)
            .field("recombiner", &self.recombiner)
            .field("mating_selector", &self.mating_selector)
            .field("survivor_selector", &self.survivor_selector)
            .finish_non_exhaustive()
    }
}

impl<R, M, X> Experiment<R, M, X>
where
    R: Representation,
    M: Mutator<R>,
    X: Recombiner<R>,
{
    pub fn options(&self) -> &ExperimentOptions {
        &self.options
    }

    pub fn mutator(&self) -> &M {
        &self.mutator
    }

    /// Runs the generational loop until a termination condition holds.
    ///
    /// Each generation the population is first checkpointed (archive update
    /// and statistics), then checked against the target fitness, the
    /// generation limit and the evaluation budget, in that order. A
    /// population whose fitness spread has been exactly zero for
    /// `restart_tolerance` generations is replaced by a fresh random one;
    /// otherwise parents are paired, offspring bred and evaluated, and the
    /// survivor selector picks the next population.
    ///
    /// # Errors
    ///
    /// Any fitness or operator failure aborts the run.
    pub fn run(mut self, rng: &mut RandomNumberGenerator) -> Result<ExperimentOutcome<R>> {
        let options = self.options.clone();
        info!(
            representation = R::NAME,
            population_size = options.population_size(),
            max_generations = options.max_generations(),
            max_fitness_evaluations = options.max_fitness_evaluations(),
            "Starting experiment"
        );

        let mut generation = 0;
        let mut epoch = 0;
        let mut restarts = 0;
        let mut stagnant_generations = 0;

        let mut population = self.seed_population(epoch, rng)?;

        let termination = loop {
            let summary = self.checkpoint(generation, &population)?;
            debug!(
                generation,
                epoch,
                best = summary.best,
                average = summary.average,
                standard_deviation = summary.standard_deviation,
                evaluations = self.evaluator.evaluations(),
                "Generation checkpoint"
            );

            if options.target_fitness().is_some_and(|target| summary.best >= target) {
                break TerminationReason::TargetReached;
            }
            if generation >= options.max_generations() {
                break TerminationReason::MaxGenerations;
            }
            if self.evaluator.evaluations() >= options.max_fitness_evaluations() {
                break TerminationReason::BudgetExhausted;
            }

            if let Some(tolerance) = options.restart_tolerance() {
                if summary.standard_deviation == 0.0 {
                    stagnant_generations += 1;
                } else {
                    stagnant_generations = 0;
                }

                if stagnant_generations >= tolerance {
                    restarts += 1;
                    warn!(
                        generation,
                        restarts,
                        fitness = summary.best,
                        "Population stagnated, restarting"
                    );
                    stagnant_generations = 0;
                    epoch = 0;
                    population = self.seed_population(epoch, rng)?;
                    generation += 1;
                    continue;
                }
            }

            let offspring = self.breed(&population, epoch + 1, rng)?;
            evaluate_population(&offspring, &self.evaluator, options.parallel_threshold())?;

            population = if offspring.is_empty() {
                population
            } else {
                self.survivor_selector.select_survivors(
                    options.population_size(),
                    population,
                    offspring,
                    rng,
                )?
            };
            if population.is_empty() {
                return Err(GeneticError::Evolution(format!(
                    "Survivor selection emptied the population in generation {}",
                    generation
                )));
            }

            generation += 1;
            epoch += 1;
        };

        let evaluations = self.evaluator.evaluations();
        info!(
            %termination,
            generations = generation,
            evaluations,
            restarts,
            best = self
                .solution_selector
                .best_individual()
                .and_then(|best| best.fitness().ok()),
            "Experiment finished"
        );

        Ok(ExperimentOutcome {
            best_individuals: self.solution_selector.best_individuals().to_vec(),
            statistics: self.statistics,
            final_population: population,
            termination,
            generations: generation,
            evaluations,
            restarts,
        })
    }

    /// A fresh, evaluated random population tagged with `tag`.
    fn seed_population(
        &self,
        tag: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        let population: Population<R> = (0..self.options.population_size())
            .map(|_| Individual::new(self.factory.random(rng), tag))
            .collect();
        evaluate_population(&population, &self.evaluator, self.options.parallel_threshold())?;
        Ok(population)
    }

    fn checkpoint(&mut self, generation: usize, population: &[Individual<R>]) -> Result<FitnessSummary> {
        self.solution_selector.update(population)?;
        let scores = fitness_scores(population)?;
        for collector in self.statistics.iter_mut() {
            collector.collect(generation, &scores)?;
        }
        FitnessSummary::from_scores(&scores)
    }

    /// Offspring of one generation, tagged with `tag`. Empty when the mating
    /// selector finds no pairs.
    fn breed(
        &mut self,
        population: &[Individual<R>],
        tag: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        let pairs =
            self.mating_selector
                .select_pairs(population, self.options.num_parent_pairs(), rng)?;
        let mut offspring = Vec::with_capacity(pairs.len() * self.options.breed_size());

        for (parent1, parent2) in pairs {
            for _ in 0..self.options.breed_size() {
                let child = if rng.chance(self.options.crossover_probability()) {
                    let chromosome =
                        self.recombiner
                            .recombine(parent1, parent2, &self.evaluator, rng)?;
                    Individual::new(chromosome, tag)
                } else if rng.chance(0.5) {
                    parent1.reborn(tag)
                } else {
                    parent2.reborn(tag)
                };

                let child = if rng.chance(self.options.mutation_probability()) {
                    let mut chromosome = child.into_chromosome();
                    match self
                        .mutator
                        .mutate_inplace(&mut chromosome, &self.evaluator, rng)?
                    {
                        Some(fitness) => Individual::with_fitness(chromosome, tag, fitness),
                        None => Individual::new(chromosome, tag),
                    }
                } else {
                    child
                };
                offspring.push(child);
            }
        }
        Ok(offspring)
    }
}
