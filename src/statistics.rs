//! # Statistics
//!
//! Per-generation fitness aggregates. The experiment hands every collector
//! the generation number and the fitness of the whole population once per
//! generation; each collector reduces that to one value and records the
//! `(generation, value)` point.
//!
//! ```rust
//! use evostrat::statistics::{BestFitnessCollector, StatisticsCollector};
//!
//! let mut best = BestFitnessCollector::default();
//! best.collect(0, &[1.0, 3.0, 2.0]).unwrap();
//! best.collect(1, &[4.0, 0.5]).unwrap();
//! assert_eq!(best.data(), &[(0, 3.0), (1, 4.0)]);
//! ```

use std::fmt::Debug;

use crate::error::Result;
use crate::individual::FitnessSummary;

/// A consumer of per-generation fitness values.
pub trait StatisticsCollector: Debug + Send {
    /// Name of the recorded metric.
    fn name(&self) -> &'static str;

    /// Records one point for `generation`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` if `fitness` is empty.
    fn collect(&mut self, generation: usize, fitness: &[f64]) -> Result<()>;

    /// All recorded `(generation, value)` points, oldest first.
    fn data(&self) -> &[(usize, f64)];
}

macro_rules! summary_collector {
    ($(#[$doc:meta])* $name:ident, $metric:literal, $field:ident) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            data: Vec<(usize, f64)>,
        }

        impl StatisticsCollector for $name {
            fn name(&self) -> &'static str {
                $metric
            }

            fn collect(&mut self, generation: usize, fitness: &[f64]) -> Result<()> {
                let summary = FitnessSummary::from_scores(fitness)?;
                self.data.push((generation, summary.$field));
                Ok(())
            }

            fn data(&self) -> &[(usize, f64)] {
                &self.data
            }
        }
    };
}

summary_collector!(
    /// Mean fitness of the population.
    AverageFitnessCollector,
    "average",
    average
);

summary_collector!(
    /// Highest fitness in the population.
    BestFitnessCollector,
    "best",
    best
);

summary_collector!(
    /// Population standard deviation of the fitness. Exactly zero when every
    /// individual has the same fitness, which is what stagnation detection
    /// looks for.
    FitnessStandardDeviationCollector,
    "standard_deviation",
    standard_deviation
);

/// The average, best and standard deviation collectors, in that order.
pub fn default_collectors() -> Vec<Box<dyn StatisticsCollector>> {
    vec![
        Box::new(AverageFitnessCollector::default()),
        Box::new(BestFitnessCollector::default()),
        Box::new(FitnessStandardDeviationCollector::default()),
    ]
}
