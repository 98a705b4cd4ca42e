//! # Problems
//!
//! Ready-made fitness functions for benchmarking the operators.

pub mod ackley;

pub use ackley::AckleyFitness;
