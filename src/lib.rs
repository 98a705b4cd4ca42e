//! # evostrat
//!
//! A generic evolutionary-optimization engine with self-adaptive evolution
//! strategy operators for real-valued problems: 1/5-success-rule step
//! control, per-gene lognormal step adaptation and correlated mutation
//! through an adapted covariance matrix.
//!
//! The main entry point is [`experiment::ExperimentBuilder`], which wires a
//! chromosome factory, a fitness function, a mutator, a recombiner and the
//! selection strategies into a runnable [`experiment::Experiment`].

pub mod caching;
pub mod chromosome;
pub mod error;
pub mod experiment;
pub mod fitness;
pub mod individual;
pub mod mutation;
pub mod problems;
pub mod recombination;
pub mod rng;
pub mod selection;
pub mod statistics;

// Re-export commonly used types for convenience
pub use chromosome::{
    AdaptiveStepFloat, AdaptiveStepGene, Chromosome, ChromosomeFactory, CovarianceFloat, Float,
    ProblemConfig, RandomChromosomeFactory, Representation,
};
pub use error::{GeneticError, OptionExt, Result};
pub use experiment::{
    Experiment, ExperimentBuilder, ExperimentOptions, ExperimentOutcome, TerminationReason,
};
pub use fitness::{FitnessComputer, FitnessEvaluator};
pub use individual::{Individual, Population};
pub use mutation::Mutator;
pub use recombination::Recombiner;
pub use rng::RandomNumberGenerator;
pub use selection::{MatingSelector, SolutionSelector, SurvivorSelector};
pub use statistics::StatisticsCollector;
