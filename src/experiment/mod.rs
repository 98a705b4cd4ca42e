//! # Experiment
//!
//! An [`Experiment`] drives the generational loop: it seeds a random
//! population, then repeatedly checkpoints it, pairs parents, breeds and
//! evaluates offspring and lets the survivor selector shrink the pool back
//! to the population size. It stops on the target fitness, the generation
//! limit or the evaluation budget, and restarts from a fresh population when
//! the fitness spread has been zero for too long.
//!
//! ## Example
//!
//! ```rust
//! use evostrat::chromosome::{Chromosome, Float, ProblemConfig};
//! use evostrat::experiment::{ExperimentBuilder, ExperimentOptions};
//! use evostrat::mutation::DeltaMutator;
//! use evostrat::recombination::MidPointRecombiner;
//! use evostrat::rng::RandomNumberGenerator;
//! use evostrat::selection::{BestFitnessMatingSelector, BestFitnessSurvivorSelector};
//!
//! let options = ExperimentOptions::builder()
//!     .population_size(10)
//!     .max_generations(20)
//!     .num_parent_pairs(5)
//!     .crossover_probability(0.5)
//!     .build()
//!     .unwrap();
//!
//! let experiment = ExperimentBuilder::<Float, _, _>::new()
//!     .with_options(options)
//!     .with_problem(ProblemConfig::new(2, -10.0, 10.0).unwrap())
//!     .with_fitness_computer(|c: &Chromosome<Float>| {
//!         -c.values().iter().map(|x| x.abs()).sum::<f64>()
//!     })
//!     .with_mutator(DeltaMutator::new(1.0).unwrap())
//!     .with_recombiner(MidPointRecombiner)
//!     .with_mating_selector(BestFitnessMatingSelector)
//!     .with_survivor_selector(BestFitnessSurvivorSelector)
//!     .build()
//!     .unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let outcome = experiment.run(&mut rng).unwrap();
//!
//! assert_eq!(outcome.generations, 20);
//! assert!(outcome.best_individual().unwrap().fitness().unwrap() <= 0.0);
//! ```

pub mod builder;
pub mod launcher;
pub mod options;

pub use builder::ExperimentBuilder;
pub use launcher::{Experiment, ExperimentOutcome, TerminationReason};
pub use options::{ExperimentOptions, ExperimentOptionsBuilder};
