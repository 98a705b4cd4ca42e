//! # Fitness
//!
//! A [`FitnessComputer`] scores a chromosome, higher being better. The engine
//! never calls it directly: every computation goes through a
//! [`FitnessEvaluator`], which counts computations against the evaluation
//! budget and rejects non-finite scores.
//!
//! Closures implement `FitnessComputer`, which keeps small problems short:
//!
//! ```rust
//! use std::sync::Arc;
//! use evostrat::chromosome::{Chromosome, Float, ProblemConfig};
//! use evostrat::fitness::FitnessEvaluator;
//!
//! let config = Arc::new(ProblemConfig::new(2, -10.0, 10.0).unwrap());
//! let evaluator = FitnessEvaluator::new(|c: &Chromosome<Float>| {
//!     -c.values().iter().map(|x| x.abs()).sum::<f64>()
//! });
//!
//! let chromosome = Chromosome::<Float>::new(vec![1.0, -2.0], config).unwrap();
//! assert_eq!(evaluator.evaluate(&chromosome).unwrap(), -3.0);
//! assert_eq!(evaluator.evaluations(), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::chromosome::{Chromosome, Representation};
use crate::error::{GeneticError, Result};

/// Scores a chromosome. Implementations must be pure: the score may depend
/// only on the chromosome.
pub trait FitnessComputer<R: Representation>: Send + Sync {
    fn fitness(&self, chromosome: &Chromosome<R>) -> f64;
}

impl<R, F> FitnessComputer<R> for F
where
    R: Representation,
    F: Fn(&Chromosome<R>) -> f64 + Send + Sync,
{
    fn fitness(&self, chromosome: &Chromosome<R>) -> f64 {
        self(chromosome)
    }
}

/// Counting, validating front end of a fitness computer.
///
/// The evaluator is `Sync`, so a population can be scored from a worker pool
/// while the counter stays exact.
pub struct FitnessEvaluator<R: Representation> {
    computer: Arc<dyn FitnessComputer<R>>,
    evaluations: AtomicUsize,
}

impl<R: Representation> FitnessEvaluator<R> {
    pub fn new<F>(computer: F) -> Self
    where
        F: FitnessComputer<R> + 'static,
    {
        Self::from_shared(Arc::new(computer))
    }

    pub fn from_shared(computer: Arc<dyn FitnessComputer<R>>) -> Self {
        Self {
            computer,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Computes the fitness of a chromosome and counts the computation.
    ///
    /// # Errors
    ///
    /// Returns `FitnessCalculation` if the score is NaN or infinite.
    pub fn evaluate(&self, chromosome: &Chromosome<R>) -> Result<f64> {
        let score = self.computer.fitness(chromosome);
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        if !score.is_finite() {
            return Err(GeneticError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }

        Ok(score)
    }

    /// Number of fitness computations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn computer(&self) -> &Arc<dyn FitnessComputer<R>> {
        &self.computer
    }
}

impl<R: Representation> fmt::Debug for FitnessEvaluator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitnessEvaluator")
            .field("representation", &R::NAME)
            .field("evaluations", &self.evaluations())
            .finish()
    }
}
