//! # Swap mutators
//!
//! Permutation mutators that move whole genes around instead of perturbing
//! them. A gene keeps its value (and its step size, for adaptive genomes), so
//! every bound and step invariant holds trivially after a swap.
//!
//! Both operators accept [`Float`] and [`AdaptiveStepFloat`] chromosomes. A
//! covariance genome is not a flat list of interchangeable genes, so it is not
//! supported.

use super::Mutator;
use crate::{
    chromosome::{AdaptiveStepFloat, Chromosome, Float},
    error::Result,
    fitness::FitnessEvaluator,
    rng::RandomNumberGenerator,
};

/// Exchanges two distinct, randomly chosen genes.
///
/// Chromosomes with fewer than two genes are left untouched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapGeneMutator;

impl SwapGeneMutator {
    fn swap<G>(genes: &mut [G], rng: &mut RandomNumberGenerator) {
        let len = genes.len();
        if len < 2 {
            return;
        }
        let first = rng.index(len);
        let mut second = rng.index(len - 1);
        if second >= first {
            second += 1;
        }
        genes.swap(first, second);
    }
}

/// Exchanges two non-overlapping ranges of genes of the same random length.
///
/// The length is drawn from `1..=len / 2`, then both ranges are placed
/// uniformly so that the first ends before the second starts. Chromosomes
/// with fewer than two genes are left untouched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapGeneRangeMutator;

impl SwapGeneRangeMutator {
    fn swap<G>(genes: &mut [G], rng: &mut RandomNumberGenerator) {
        let len = genes.len();
        if len < 2 {
            return;
        }
        let width = 1 + rng.index(len / 2);
        let first = rng.index(len - 2 * width + 1);
        let second = first + width + rng.index(len - first - 2 * width + 1);

        let (head, tail) = genes.split_at_mut(second);
        head[first..first + width].swap_with_slice(&mut tail[..width]);
    }
}

macro_rules! swap_mutator {
    ($mutator:ty, $representation:ty) => {
        impl Mutator<$representation> for $mutator {
            fn mutate_inplace(
                &mut self,
                chromosome: &mut Chromosome<$representation>,
                _evaluator: &FitnessEvaluator<$representation>,
                rng: &mut RandomNumberGenerator,
            ) -> Result<Option<f64>> {
                Self::swap(chromosome.genes_mut(), rng);
                Ok(None)
            }
        }
    };
}

swap_mutator!(SwapGeneMutator, Float);
swap_mutator!(SwapGeneMutator, AdaptiveStepFloat);
swap_mutator!(SwapGeneRangeMutator, Float);
swap_mutator!(SwapGeneRangeMutator, AdaptiveStepFloat);
