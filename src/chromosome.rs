//! # Chromosomes
//!
//! A [`Chromosome`] is the genotype of one candidate solution: a fixed-length
//! sequence of genes plus a shared, read-only [`ProblemConfig`]. The kind of
//! gene a chromosome carries is described by a [`Representation`]:
//!
//! - [`Float`]: one plain real value per dimension.
//! - [`AdaptiveStepFloat`]: one `(value, step)` pair per dimension.
//! - [`CovarianceFloat`]: `n` values, then `n` step sizes, then
//!   `n * (n - 1) / 2` rotation angles.
//!
//! Operators are implemented per representation, so a mutator written for
//! one kind of chromosome cannot be handed another.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use evostrat::chromosome::{ChromosomeFactory, CovarianceFloat, ProblemConfig, RandomChromosomeFactory};
//! use evostrat::rng::RandomNumberGenerator;
//!
//! let config = Arc::new(ProblemConfig::new(3, -15.0, 15.0).unwrap());
//! let factory = RandomChromosomeFactory::<CovarianceFloat>::new(config);
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let chromosome = factory.random(&mut rng);
//! assert_eq!(chromosome.len(), 3 + 3 + 3);
//! assert_eq!(chromosome.values().len(), 3);
//! ```

use std::f64::consts::PI;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Smallest step size an adaptive operator will produce.
pub const MIN_STEP_SIZE: f64 = 1e-12;

/// Problem-wide settings shared read-only by every chromosome of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemConfig {
    n: usize,
    lower_bound: f64,
    upper_bound: f64,
    initial_step_size: f64,
}

impl ProblemConfig {
    /// Creates a configuration for an `n`-dimensional problem whose values live
    /// in `[lower_bound, upper_bound]`. The initial step size defaults to `1.0`.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `n` is zero or the bounds are not
    /// finite with `lower_bound < upper_bound`.
    pub fn new(n: usize, lower_bound: f64, upper_bound: f64) -> Result<Self> {
        if n == 0 {
            return Err(GeneticError::Configuration(
                "Problem dimensionality must be positive".to_string(),
            ));
        }
        if !lower_bound.is_finite() || !upper_bound.is_finite() || lower_bound >= upper_bound {
            return Err(GeneticError::Configuration(format!(
                "Invalid bounds [{}, {}]",
                lower_bound, upper_bound
            )));
        }
        Ok(Self {
            n,
            lower_bound,
            upper_bound,
            initial_step_size: 1.0,
        })
    }

    /// Sets the step size given to freshly created step genes.
    pub fn with_initial_step_size(mut self, initial_step_size: f64) -> Result<Self> {
        if !(initial_step_size.is_finite() && initial_step_size > 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Initial step size must be positive, got {}",
                initial_step_size
            )));
        }
        self.initial_step_size = initial_step_size;
        Ok(self)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn initial_step_size(&self) -> f64 {
        self.initial_step_size
    }

    /// Clamps a value gene into the configured bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower_bound, self.upper_bound)
    }
}

/// Wraps an angle back into `(-π, π]`. Angles already in range are returned untouched.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > PI || angle <= -PI {
        let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
        if wrapped <= -PI {
            PI
        } else {
            wrapped
        }
    } else {
        angle
    }
}

/// An atomic hereditary unit.
pub trait Gene: Clone + Debug + PartialEq + Send + Sync {
    /// Appends the exact bit pattern of the gene, used as a cache key.
    fn write_bits(&self, out: &mut Vec<u64>);
}

impl Gene for f64 {
    fn write_bits(&self, out: &mut Vec<u64>) {
        out.push(self.to_bits());
    }
}

/// A value gene carrying its own mutation step size.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveStepGene {
    pub value: f64,
    pub step: f64,
}

impl AdaptiveStepGene {
    pub fn new(value: f64, step: f64) -> Self {
        Self { value, step }
    }
}

impl Gene for AdaptiveStepGene {
    fn write_bits(&self, out: &mut Vec<u64>) {
        out.push(self.value.to_bits());
        out.push(self.step.to_bits());
    }
}

/// Describes one genome layout: its gene type, its length and how to seed it.
pub trait Representation: Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    type Gene: Gene;

    /// Human-readable name, used in log events and error messages.
    const NAME: &'static str;

    /// Number of genes for an `n`-dimensional problem.
    fn genome_len(n: usize) -> usize;

    /// Draws a fresh genome whose genes satisfy the bound, step and angle invariants.
    fn random_genes(config: &ProblemConfig, rng: &mut RandomNumberGenerator) -> Vec<Self::Gene>;

    /// Extracts the `n` solution values from a genome.
    fn values(genes: &[Self::Gene], n: usize) -> Vec<f64>;
}

/// Plain real-valued genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Float;

impl Representation for Float {
    type Gene = f64;
    const NAME: &'static str = "float";

    fn genome_len(n: usize) -> usize {
        n
    }

    fn random_genes(config: &ProblemConfig, rng: &mut RandomNumberGenerator) -> Vec<f64> {
        random_values(config, rng)
    }

    fn values(genes: &[f64], _n: usize) -> Vec<f64> {
        genes.to_vec()
    }
}

/// Genome of `(value, step)` pairs, one step size per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdaptiveStepFloat;

impl Representation for AdaptiveStepFloat {
    type Gene = AdaptiveStepGene;
    const NAME: &'static str = "adaptive-step";

    fn genome_len(n: usize) -> usize {
        n
    }

    fn random_genes(
        config: &ProblemConfig,
        rng: &mut RandomNumberGenerator,
    ) -> Vec<AdaptiveStepGene> {
        random_values(config, rng)
            .into_iter()
            .map(|value| AdaptiveStepGene::new(value, config.initial_step_size()))
            .collect()
    }

    fn values(genes: &[AdaptiveStepGene], _n: usize) -> Vec<f64> {
        genes.iter().map(|gene| gene.value).collect()
    }
}

/// Genome of values, per-dimension step sizes and pairwise rotation angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CovarianceFloat;

impl CovarianceFloat {
    /// Number of rotation angles for an `n`-dimensional problem.
    pub fn angle_count(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }
}

impl Representation for CovarianceFloat {
    type Gene = f64;
    const NAME: &'static str = "covariance";

    fn genome_len(n: usize) -> usize {
        2 * n + Self::angle_count(n)
    }

    fn random_genes(config: &ProblemConfig, rng: &mut RandomNumberGenerator) -> Vec<f64> {
        let n = config.n();
        let mut genes = random_values(config, rng);
        genes.extend(std::iter::repeat(config.initial_step_size()).take(n));
        genes.extend((0..Self::angle_count(n)).map(|_| wrap_angle(rng.uniform(-PI, PI))));
        genes
    }

    fn values(genes: &[f64], n: usize) -> Vec<f64> {
        genes[..n].to_vec()
    }
}

fn random_values(config: &ProblemConfig, rng: &mut RandomNumberGenerator) -> Vec<f64> {
    rng.fetch_uniform(config.lower_bound(), config.upper_bound(), config.n())
        .into_iter()
        .collect()
}

/// The genotype of one candidate solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome<R: Representation> {
    genes: Vec<R::Gene>,
    config: Arc<ProblemConfig>,
}

impl<R: Representation> Chromosome<R> {
    /// Creates a chromosome from explicit genes.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the number of genes does not match
    /// the representation's genome length for `config.n()`.
    pub fn new(genes: Vec<R::Gene>, config: Arc<ProblemConfig>) -> Result<Self> {
        let expected = R::genome_len(config.n());
        if genes.len() != expected {
            return Err(GeneticError::Configuration(format!(
                "A {} chromosome of dimension {} needs {} genes, got {}",
                R::NAME,
                config.n(),
                expected,
                genes.len()
            )));
        }
        Ok(Self { genes, config })
    }

    /// Creates a chromosome with random genes inside the configured bounds.
    pub fn random(config: Arc<ProblemConfig>, rng: &mut RandomNumberGenerator) -> Self {
        let genes = R::random_genes(&config, rng);
        Self { genes, config }
    }

    pub fn genes(&self) -> &[R::Gene] {
        &self.genes
    }

    /// Mutable access to the genes. The genome length cannot change.
    pub fn genes_mut(&mut self) -> &mut [R::Gene] {
        &mut self.genes
    }

    pub fn config(&self) -> &ProblemConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<ProblemConfig> {
        Arc::clone(&self.config)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The `n` solution values encoded by this chromosome.
    pub fn values(&self) -> Vec<f64> {
        R::values(&self.genes, self.config.n())
    }

    /// Exact bit pattern of every gene.
    pub fn cache_key(&self) -> Vec<u64> {
        let mut key = Vec::with_capacity(self.genes.len());
        self.genes.iter().for_each(|gene| gene.write_bits(&mut key));
        key
    }
}

impl Chromosome<CovarianceFloat> {
    /// Splits the genome into its value, step and angle groups.
    pub fn parts(&self) -> (&[f64], &[f64], &[f64]) {
        let n = self.config.n();
        let (values, rest) = self.genes.split_at(n);
        let (steps, angles) = rest.split_at(n);
        (values, steps, angles)
    }

    /// Mutable version of [`Chromosome::parts`].
    pub fn parts_mut(&mut self) -> (&mut [f64], &mut [f64], &mut [f64]) {
        let n = self.config.n();
        let (values, rest) = self.genes.split_at_mut(n);
        let (steps, angles) = rest.split_at_mut(n);
        (values, steps, angles)
    }
}

/// Produces the random chromosomes a population is seeded with.
pub trait ChromosomeFactory<R: Representation>: Debug + Send + Sync {
    fn random(&self, rng: &mut RandomNumberGenerator) -> Chromosome<R>;
}

/// Factory drawing values uniformly inside the bounds, steps equal to the
/// initial step size and angles uniformly in `(-π, π]`.
#[derive(Debug, Clone)]
pub struct RandomChromosomeFactory<R: Representation> {
    config: Arc<ProblemConfig>,
    _marker: PhantomData<R>,
}

impl<R: Representation> RandomChromosomeFactory<R> {
    pub fn new(config: Arc<ProblemConfig>) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &ProblemConfig {
        &self.config
    }
}

impl<R: Representation> ChromosomeFactory<R> for RandomChromosomeFactory<R> {
    fn random(&self, rng: &mut RandomNumberGenerator) -> Chromosome<R> {
        Chromosome::random(Arc::clone(&self.config), rng)
    }
}
