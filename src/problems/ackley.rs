//! The Ackley function, a multimodal benchmark with its global minimum
//! `0` at the origin:
//!
//! `ackley(x) = -c1 * exp(-c2 * sqrt(mean(x²))) - exp(mean(cos(c3 * x))) + c1 + e`
//!
//! [`AckleyFitness`] negates it so that higher is better and the optimum
//! fitness is `0`.
//!
//! ```rust
//! use std::sync::Arc;
//! use evostrat::chromosome::{Chromosome, Float, ProblemConfig};
//! use evostrat::fitness::FitnessComputer;
//! use evostrat::problems::AckleyFitness;
//!
//! let config = Arc::new(ProblemConfig::new(3, -15.0, 15.0).unwrap());
//! let origin = Chromosome::<Float>::new(vec![0.0; 3], config).unwrap();
//! assert!(AckleyFitness::default().fitness(&origin).abs() < 1e-12);
//! ```

use std::f64::consts::{E, PI};

use crate::chromosome::{Chromosome, Representation};
use crate::error::{GeneticError, Result};
use crate::fitness::FitnessComputer;

pub const DEFAULT_C1: f64 = 20.0;
pub const DEFAULT_C2: f64 = 0.2;
pub const DEFAULT_C3: f64 = 2.0 * PI;

/// Negated Ackley function over the solution values of any representation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AckleyFitness {
    c1: f64,
    c2: f64,
    c3: f64,
}

impl AckleyFitness {
    /// # Errors
    ///
    /// Returns a `Configuration` error if a constant is not finite.
    pub fn new(c1: f64, c2: f64, c3: f64) -> Result<Self> {
        if ![c1, c2, c3].iter().all(|c| c.is_finite()) {
            return Err(GeneticError::Configuration(format!(
                "Ackley constants must be finite, got ({}, {}, {})",
                c1, c2, c3
            )));
        }
        Ok(Self { c1, c2, c3 })
    }

    /// The Ackley value of `values`; `0` for an empty slice.
    pub fn ackley(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let n = values.len() as f64;
        let squares = values.iter().map(|x| x * x).sum::<f64>() / n;
        let cosines = values.iter().map(|x| (self.c3 * x).cos()).sum::<f64>() / n;

        -self.c1 * (-self.c2 * squares.sqrt()).exp() - cosines.exp() + self.c1 + E
    }
}

impl Default for AckleyFitness {
    fn default() -> Self {
        Self {
            c1: DEFAULT_C1,
            c2: DEFAULT_C2,
            c3: DEFAULT_C3,
        }
    }
}

impl<R: Representation> FitnessComputer<R> for AckleyFitness {
    fn fitness(&self, chromosome: &Chromosome<R>) -> f64 {
        -self.ackley(&chromosome.values())
    }
}
