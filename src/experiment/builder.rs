use std::sync::Arc;

use super::{options::ExperimentOptions, Experiment};
use crate::{
    chromosome::{ChromosomeFactory, ProblemConfig, RandomChromosomeFactory, Representation},
    error::{GeneticError, Result},
    fitness::{FitnessComputer, FitnessEvaluator},
    mutation::Mutator,
    recombination::Recombiner,
    selection::{KBestFitnessSolutionSelector, MatingSelector, SolutionSelector, SurvivorSelector},
    statistics::{default_collectors, StatisticsCollector},
};

/// Assembles an [`Experiment`] from its collaborators.
///
/// The chromosome factory, fitness computer, operators and the mating and
/// survivor selectors are required. Options default to
/// [`ExperimentOptions::default`], the solution selector to a
/// [`KBestFitnessSolutionSelector`] sized by `number_solutions`, and the
/// statistics to [`default_collectors`].
pub struct ExperimentBuilder<R, M, X>
where
    R: Representation,
    M: Mutator<R>,
    X: Recombiner<R>,
{
    options: Option<ExperimentOptions>,
    factory: Option<Box<dyn ChromosomeFactory<R>>>,
    fitness: Option<Arc<dyn FitnessComputer<R>>>,
    mutator: Option<M>,
    recombiner: Option<X>,
    mating_selector: Option<Box<dyn MatingSelector<R>>>,
    survivor_selector: Option<Box<dyn SurvivorSelector<R>>>,
    solution_selector: Option<Box<dyn SolutionSelector<R>>>,
    statistics: Option<Vec<Box<dyn StatisticsCollector>>>,
}

impl<R, M, X> ExperimentBuilder<R, M, X>
where
    R: Representation,
    M: Mutator<R>,
    X: Recombiner<R>,
{
    pub fn new() -> Self {
        Self {
            options: None,
            factory: None,
            fitness: None,
            mutator: None,
            recombiner: None,
            mating_selector: None,
            survivor_selector: None,
            solution_selector: None,
            statistics: None,
        }
    }

    pub fn with_options(mut self, options: ExperimentOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_chromosome_factory<F>(mut self, factory: F) -> Self
    where
        F: ChromosomeFactory<R> + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Uses a [`RandomChromosomeFactory`] for `config`.
    pub fn with_problem(self, config: ProblemConfig) -> Self {
        self.with_chromosome_factory(RandomChromosomeFactory::<R>::new(Arc::new(config)))
    }

    pub fn with_fitness_computer<F>(mut self, computer: F) -> Self
    where
        F: FitnessComputer<R> + 'static,
    {
        self.fitness = Some(Arc::new(computer));
        self
    }

    pub fn with_shared_fitness_computer(mut self, computer: Arc<dyn FitnessComputer<R>>) -> Self {
        self.fitness = Some(computer);
        self
    }

    pub fn with_mutator(mut self, mutator: M) -> Self {
        self.mutator = Some(mutator);
        self
    }

    pub fn with_recombiner(mut self, recombiner: X) -> Self {
        self.recombiner = Some(recombiner);
        self
    }

    pub fn with_mating_selector<S>(mut self, selector: S) -> Self
    where
        S: MatingSelector<R> + 'static,
    {
        self.mating_selector = Some(Box::new(selector));
        self
    }

    pub fn with_survivor_selector<S>(mut self, selector: S) -> Self
    where
        S: SurvivorSelector<R> + 'static,
    {
        self.survivor_selector = Some(Box::new(selector));
        self
    }

    pub fn with_solution_selector<S>(mut self, selector: S) -> Self
    where
        S: SolutionSelector<R> + 'static,
    {
        self.solution_selector = Some(Box::new(selector));
        self
    }

    pub fn with_statistics(mut self, collectors: Vec<Box<dyn StatisticsCollector>>) -> Self {
        self.statistics = Some(collectors);
        self
    }

    pub fn build(self) -> Result<Experiment<R, M, X>> {
        let options = self.options.unwrap_or_default();
        options.validate()?;

        let factory = self.factory.ok_or_else(|| {
            GeneticError::Configuration("Chromosome factory not specified".to_string())
        })?;

        let fitness = self.fitness.ok_or_else(|| {
            GeneticError::Configuration("Fitness computer not specified".to_string())
        })?;

        let mutator = self
            .mutator
            .ok_or_else(|| GeneticError::Configuration("Mutator not specified".to_string()))?;

        let recombiner = self
            .recombiner
            .ok_or_else(|| GeneticError::Configuration("Recombiner not specified".to_string()))?;

        let mating_selector = self.mating_selector.ok_or_else(|| {
            GeneticError::Configuration("Mating selector not specified".to_string())
        })?;

        let survivor_selector = self.survivor_selector.ok_or_else(|| {
            GeneticError::Configuration("Survivor selector not specified".to_string())
        })?;

        let solution_selector = match self.solution_selector {
            Some(selector) => selector,
            None => Box::new(KBestFitnessSolutionSelector::<R>::new(
                options.number_solutions(),
            )?),
        };

        Ok(Experiment {
            options,
            factory,
            evaluator: FitnessEvaluator::from_shared(fitness),
            mutator,
            recombiner,
            mating_selector,
            survivor_selector,
            solution_selector,
            statistics: self.statistics.unwrap_or_else(default_collectors),
        })
    }
}

impl<R, M, X> Default for ExperimentBuilder<R, M, X>
where
    R: Representation,
    M: Mutator<R>,
    X: Recombiner<R>,
{
    fn default() -> Self {
        Self::new()
    }
}
