//! # ExperimentOptions
//!
//! The `ExperimentOptions` struct holds the numeric knobs of one run: the
//! population and archive sizes, the breeding rates, the budgets that stop
//! the run and the stagnation tolerance that restarts it.
//!
//! Options are immutable once built, and [`ExperimentOptionsBuilder::build`]
//! validates them, so a running experiment never re-checks its configuration.
//!
//! ## Example
//!
//! ```rust
//! use evostrat::experiment::ExperimentOptions;
//!
//! let options = ExperimentOptions::builder()
//!     .population_size(30)
//!     .max_generations(500)
//!     .crossover_probability(0.7)
//!     .num_parent_pairs(15)
//!     .restart_tolerance(20)
//!     .target_fitness(-1e-3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(options.population_size(), 30);
//! assert_eq!(options.mutation_probability(), 1.0);
//!
//! assert!(ExperimentOptions::builder().crossover_probability(1.5).build().is_err());
//! ```

use crate::error::{GeneticError, Result};

const DEFAULT_POPULATION_SIZE: usize = 10;
const DEFAULT_MAX_GENERATIONS: usize = 50_000;
const DEFAULT_CROSSOVER_PROBABILITY: f64 = 0.0;
const DEFAULT_MUTATION_PROBABILITY: f64 = 1.0;
const DEFAULT_NUMBER_SOLUTIONS: usize = 5;
const DEFAULT_BREED_SIZE: usize = 1;
const DEFAULT_MAX_FITNESS_EVALUATIONS: usize = 100_000_000;
const DEFAULT_NUM_PARENT_PAIRS: usize = 1;
const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentOptions {
    population_size: usize,
    max_generations: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    target_fitness: Option<f64>,
    number_solutions: usize,
    breed_size: usize,
    max_fitness_evaluations: usize,
    num_parent_pairs: usize,
    restart_tolerance: Option<usize>,
    /// Minimum population size scored on the rayon pool
    parallel_threshold: usize,
}

impl ExperimentOptions {
    /// Returns a builder with every option at its default.
    pub fn builder() -> ExperimentOptionsBuilder {
        ExperimentOptionsBuilder::default()
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    /// Fitness at which the run stops early, if any.
    pub fn target_fitness(&self) -> Option<f64> {
        self.target_fitness
    }

    /// Capacity of the best-solution archive.
    pub fn number_solutions(&self) -> usize {
        self.number_solutions
    }

    /// Offspring produced per parent pair.
    pub fn breed_size(&self) -> usize {
        self.breed_size
    }

    pub fn max_fitness_evaluations(&self) -> usize {
        self.max_fitness_evaluations
    }

    pub fn num_parent_pairs(&self) -> usize {
        self.num_parent_pairs
    }

    /// Consecutive zero-spread generations that trigger a restart, if any.
    pub fn restart_tolerance(&self) -> Option<usize> {
        self.restart_tolerance
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Checks every option.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error naming the first invalid option.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("population_size", self.population_size),
            ("number_solutions", self.number_solutions),
            ("breed_size", self.breed_size),
            ("max_fitness_evaluations", self.max_fitness_evaluations),
            ("num_parent_pairs", self.num_parent_pairs),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(GeneticError::Configuration(format!(
                "{} must be positive",
                name
            )));
        }

        for (name, p) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GeneticError::Configuration(format!(
                    "{} must lie in [0, 1], got {}",
                    name, p
                )));
            }
        }

        if self.restart_tolerance == Some(0) {
            return Err(GeneticError::Configuration(
                "restart_tolerance must be positive when set".to_string(),
            ));
        }

        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err(GeneticError::Configuration(format!(
                    "target_fitness must be finite, got {}",
                    target
                )));
            }
        }

        Ok(())
    }
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_generations: DEFAULT_MAX_GENERATIONS,
            crossover_probability: DEFAULT_CROSSOVER_PROBABILITY,
            mutation_probability: DEFAULT_MUTATION_PROBABILITY,
            target_fitness: None,
            number_solutions: DEFAULT_NUMBER_SOLUTIONS,
            breed_size: DEFAULT_BREED_SIZE,
            max_fitness_evaluations: DEFAULT_MAX_FITNESS_EVALUATIONS,
            num_parent_pairs: DEFAULT_NUM_PARENT_PAIRS,
            restart_tolerance: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Builder for `ExperimentOptions`.
///
/// Provides a fluent interface for constructing `ExperimentOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct ExperimentOptionsBuilder {
    population_size: Option<usize>,
    max_generations: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    target_fitness: Option<f64>,
    number_solutions: Option<usize>,
    breed_size: Option<usize>,
    max_fitness_evaluations: Option<usize>,
    num_parent_pairs: Option<usize>,
    restart_tolerance: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl ExperimentOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    /// Stops the run as soon as an individual reaches this fitness.
    pub fn target_fitness(mut self, value: f64) -> Self {
        self.target_fitness = Some(value);
        self
    }

    pub fn number_solutions(mut self, value: usize) -> Self {
        self.number_solutions = Some(value);
        self
    }

    pub fn breed_size(mut self, value: usize) -> Self {
        self.breed_size = Some(value);
        self
    }

    pub fn max_fitness_evaluations(mut self, value: usize) -> Self {
        self.max_fitness_evaluations = Some(value);
        self
    }

    pub fn num_parent_pairs(mut self, value: usize) -> Self {
        self.num_parent_pairs = Some(value);
        self
    }

    /// Enables stagnation restarts after `value` consecutive generations
    /// with zero fitness spread.
    pub fn restart_tolerance(mut self, value: usize) -> Self {
        self.restart_tolerance = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds and validates the `ExperimentOptions` instance.
    pub fn build(self) -> Result<ExperimentOptions> {
        let options = ExperimentOptions {
            population_size: self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE),
            max_generations: self.max_generations.unwrap_or(DEFAULT_MAX_GENERATIONS),
            crossover_probability: self
                .crossover_probability
                .unwrap_or(DEFAULT_CROSSOVER_PROBABILITY),
            mutation_probability: self
                .mutation_probability
                .unwrap_or(DEFAULT_MUTATION_PROBABILITY),
            target_fitness: self.target_fitness,
            number_solutions: self.number_solutions.unwrap_or(DEFAULT_NUMBER_SOLUTIONS),
            breed_size: self.breed_size.unwrap_or(DEFAULT_BREED_SIZE),
            max_fitness_evaluations: self
                .max_fitness_evaluations
                .unwrap_or(DEFAULT_MAX_FITNESS_EVALUATIONS),
            num_parent_pairs: self.num_parent_pairs.unwrap_or(DEFAULT_NUM_PARENT_PAIRS),
            restart_tolerance: self.restart_tolerance,
            parallel_threshold: self.parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        };
        options.validate()?;
        Ok(options)
    }
}
