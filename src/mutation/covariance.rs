//! # CovarianceMutator
//!
//! Correlated mutation for [`CovarianceFloat`] chromosomes. The step sizes and
//! rotation angles carried by the chromosome describe a covariance matrix
//!
//! ```text
//! C = R · diag(σ₁², …, σₙ²) · Rᵀ,   R = ∏ R₍ᵢⱼ₎(α₍ᵢⱼ₎)   for i < j
//! ```
//!
//! where `R₍ᵢⱼ₎(α)` is the plane rotation between dimensions `i` and `j`.
//! Each mutation first self-adapts the steps (lognormally) and the angles
//! (by `5° · N(0, 1)`), then rebuilds `C` and moves the values by one draw of
//! `N(0, C)`.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use super::{check_learning_rate_multiplier, learning_rate, Mutator};
use crate::{
    chromosome::{wrap_angle, Chromosome, CovarianceFloat, MIN_STEP_SIZE},
    error::{GeneticError, Result},
    fitness::FitnessEvaluator,
    rng::RandomNumberGenerator,
};

/// Standard deviation of the angle perturbation: five degrees.
pub const ROTATION_STEP: f64 = 5.0 * PI / 180.0;

/// Relative tolerance for negative eigenvalues caused by rounding.
const EIGENVALUE_TOLERANCE: f64 = 1e-9;

/// Evolution-strategy mutator with correlated sampling.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMutator {
    learning_rate_multiplier: f64,
}

impl CovarianceMutator {
    pub fn new(learning_rate_multiplier: f64) -> Result<Self> {
        Ok(Self {
            learning_rate_multiplier: check_learning_rate_multiplier(learning_rate_multiplier)?,
        })
    }
}

impl Default for CovarianceMutator {
    fn default() -> Self {
        Self {
            learning_rate_multiplier: 1.0,
        }
    }
}

impl Mutator<CovarianceFloat> for CovarianceMutator {
    fn mutate_inplace(
        &mut self,
        chromosome: &mut Chromosome<CovarianceFloat>,
        _evaluator: &FitnessEvaluator<CovarianceFloat>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<f64>> {
        let config = chromosome.shared_config();
        let lr = learning_rate(self.learning_rate_multiplier, config.n());
        let (values, steps, angles) = chromosome.parts_mut();

        for step in steps.iter_mut() {
            *step = (*step * (lr * rng.standard_normal()).exp()).max(MIN_STEP_SIZE);
        }
        for angle in angles.iter_mut() {
            *angle = wrap_angle(*angle + ROTATION_STEP * rng.standard_normal());
        }

        let covariance = assemble_covariance_matrix(steps, angles)?;
        let offsets = sample_multivariate_normal(&covariance, rng)?;

        for (value, offset) in values.iter_mut().zip(offsets.iter()) {
            *value = config.clamp(*value + offset);
        }
        Ok(None)
    }
}

/// Builds the covariance matrix described by `n` step sizes and
/// `n * (n - 1) / 2` rotation angles.
///
/// Angles are consumed pair by pair in the order `(0,1), (0,2), …, (0,n-1),
/// (1,2), …, (n-2,n-1)`; the angle of pair `(i, j)` rotates the correlation
/// between dimensions `i` and `j`. With all angles zero the result is
/// `diag(σ²)`.
///
/// # Errors
///
/// Returns a `Configuration` error if the number of angles does not match.
pub fn assemble_covariance_matrix(steps: &[f64], angles: &[f64]) -> Result<DMatrix<f64>> {
    let n = steps.len();
    if angles.len() != CovarianceFloat::angle_count(n) {
        return Err(GeneticError::Configuration(format!(
            "{} step sizes need {} rotation angles, got {}",
            n,
            CovarianceFloat::angle_count(n),
            angles.len()
        )));
    }

    let variances = DVector::from_iterator(n, steps.iter().map(|s| s * s));
    let mut covariance = DMatrix::from_diagonal(&variances);

    let pairs = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j)));
    for ((i, j), &angle) in pairs.zip(angles.iter()) {
        rotate(&mut covariance, i, j, angle);
    }

    // Rotations commute with symmetry only up to rounding.
    let symmetric = (&covariance + covariance.transpose()) * 0.5;
    Ok(symmetric)
}

/// Applies `C ← R C Rᵀ` for the plane rotation between `i` and `j`.
fn rotate(covariance: &mut DMatrix<f64>, i: usize, j: usize, angle: f64) {
    let (sin, cos) = angle.sin_cos();
    let n = covariance.nrows();

    for k in 0..n {
        let (a, b) = (covariance[(i, k)], covariance[(j, k)]);
        covariance[(i, k)] = cos * a - sin * b;
        covariance[(j, k)] = sin * a + cos * b;
    }
    for k in 0..n {
        let (a, b) = (covariance[(k, i)], covariance[(k, j)]);
        covariance[(k, i)] = cos * a - sin * b;
        covariance[(k, j)] = sin * a + cos * b;
    }
}

/// Draws one vector from the zero-mean multivariate normal `N(0, C)`.
///
/// # Errors
///
/// Returns `CovarianceNotPositiveSemiDefinite` if `C` has a non-finite entry
/// or an eigenvalue below zero beyond rounding tolerance. Such a matrix means
/// the adapted strategy parameters are inconsistent; no fallback sample is
/// drawn.
pub fn sample_multivariate_normal(
    covariance: &DMatrix<f64>,
    rng: &mut RandomNumberGenerator,
) -> Result<DVector<f64>> {
    if !covariance.is_square() {
        return Err(GeneticError::Configuration(format!(
            "Covariance matrix must be square, got {}x{}",
            covariance.nrows(),
            covariance.ncols()
        )));
    }
    if covariance.iter().any(|x| !x.is_finite()) {
        return Err(GeneticError::CovarianceNotPositiveSemiDefinite(
            "matrix contains non-finite entries".to_string(),
        ));
    }

    let n = covariance.nrows();
    let eigen = SymmetricEigen::new(covariance.clone());
    let largest = eigen.eigenvalues.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let smallest = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);

    if smallest < -EIGENVALUE_TOLERANCE * largest {
        return Err(GeneticError::CovarianceNotPositiveSemiDefinite(format!(
            "smallest eigenvalue {} (largest magnitude {})",
            smallest, largest
        )));
    }

    let scaled = DVector::from_iterator(
        n,
        eigen
            .eigenvalues
            .iter()
            .map(|lambda| lambda.max(0.0).sqrt() * rng.standard_normal()),
    );
    Ok(&eigen.eigenvectors * scaled)
}
