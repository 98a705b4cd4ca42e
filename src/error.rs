//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Configuration problems are reported once, when an experiment or operator
//! is constructed; everything raised while a run is in progress is fatal and
//! aborts the run.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evostrat::error::{GeneticError, Result};
//!
//! fn checked_probability(p: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&p) {
//!         return Err(GeneticError::Configuration(format!(
//!             "probability out of range: {}",
//!             p
//!         )));
//!     }
//!     Ok(p)
//! }
//!
//! assert!(checked_probability(0.4).is_ok());
//! assert!(checked_probability(1.4).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evostrat::error::{GeneticError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> evostrat::error::Result<f64> {
//!     scores
//!         .iter()
//!         .cloned()
//!         .reduce(f64::max)
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[1.0, 3.0, 2.0]).unwrap(), 3.0);
//! assert!(best_score(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running an experiment.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness calculation fails.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// The covariance matrix assembled from step sizes and rotation angles
    /// is not positive semi-definite, so no correlated sample exists.
    #[error("Covariance matrix is not positive semi-definite: {0}")]
    CovarianceNotPositiveSemiDefinite(String),

    /// Error that occurs when an evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// Error that occurs when NaN or infinity values are encountered.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
