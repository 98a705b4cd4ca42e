use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Fitness-proportional sampling wheel.
///
/// Non-negative fitness with a positive sum is used as is. Otherwise the
/// scores are shifted by their minimum plus `span / len`, so negative fitness
/// is allowed and the worst individual keeps a small chance. Identical
/// scores give uniform sampling.
///
/// # Examples
///
/// ```
/// use evostrat::rng::RandomNumberGenerator;
/// use evostrat::selection::Roulette;
///
/// let wheel = Roulette::new(&[0.0, 0.0, 5.0]).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// assert_eq!(wheel.spin(&mut rng), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Roulette {
    weights: Vec<f64>,
}

impl Roulette {
    /// Builds the wheel from fitness scores.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` if `scores` is empty and `InvalidNumericValue`
    /// if any score is not finite.
    pub fn new(scores: &[f64]) -> Result<Self> {
        if scores.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(GeneticError::InvalidNumericValue(format!(
                "Roulette wheel cannot weight fitness {}",
                bad
            )));
        }

        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = scores.iter().sum();

        let weights = if min >= 0.0 && sum > 0.0 {
            scores.to_vec()
        } else if max == min {
            vec![1.0; scores.len()]
        } else {
            let floor = (max - min) / scores.len() as f64;
            scores.iter().map(|s| s - min + floor).collect()
        };

        Ok(Self { weights })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Draws one index, with replacement.
    pub fn spin(&self, rng: &mut RandomNumberGenerator) -> usize {
        let all: Vec<usize> = (0..self.weights.len()).collect();
        self.pick(&all, rng)
    }

    /// Draws up to `count` distinct indices.
    pub fn draw_distinct(&self, count: usize, rng: &mut RandomNumberGenerator) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..self.weights.len()).collect();
        let mut drawn = Vec::with_capacity(count.min(remaining.len()));

        while drawn.len() < count && !remaining.is_empty() {
            let position = self.pick_position(&remaining, rng);
            drawn.push(remaining.remove(position));
        }
        drawn
    }

    fn pick(&self, candidates: &[usize], rng: &mut RandomNumberGenerator) -> usize {
        candidates[self.pick_position(candidates, rng)]
    }

    /// Position inside `candidates` of the drawn index.
    fn pick_position(&self, candidates: &[usize], rng: &mut RandomNumberGenerator) -> usize {
        let total: f64 = candidates.iter().map(|&i| self.weights[i]).sum();
        if total <= 0.0 {
            return rng.index(candidates.len());
        }

        let r = rng.uniform(0.0, total);
        let mut cumulative = 0.0;
        for (position, &i) in candidates.iter().enumerate() {
            cumulative += self.weights[i];
            if r < cumulative {
                return position;
            }
        }

        // Floating-point error on the last slot.
        candidates.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_fitness_is_used_directly() {
        let wheel = Roulette::new(&[1.0, 3.0]).unwrap();
        assert_eq!(wheel.weights(), &[1.0, 3.0]);
    }

    #[test]
    fn test_negative_fitness_is_shifted() {
        let wheel = Roulette::new(&[-4.0, -2.0, 0.0]).unwrap();
        let weights = wheel.weights();
        assert!(weights.iter().all(|w| *w > 0.0));
        assert!(weights[2] > weights[1] && weights[1] > weights[0]);
    }

    #[test]
    fn test_flat_fitness_is_uniform() {
        let wheel = Roulette::new(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(wheel.weights(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(Roulette::new(&[]), Err(GeneticError::EmptyPopulation)));
        assert!(Roulette::new(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_spin_frequencies() {
        let wheel = Roulette::new(&[1.0, 3.0]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(42);
        let hits = (0..10_000).filter(|_| wheel.spin(&mut rng) == 1).count();
        assert!((7_000..8_000).contains(&hits), "hits {}", hits);
    }

    #[test]
    fn test_draw_distinct() {
        let wheel = Roulette::new(&[5.0, 0.0, 1.0, 2.0]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(7);

        let mut drawn = wheel.draw_distinct(10, &mut rng);
        assert_eq!(drawn.len(), 4);
        drawn.sort_unstable();
        assert_eq!(drawn, vec![0, 1, 2, 3]);

        assert_eq!(wheel.draw_distinct(2, &mut rng).len(), 2);
    }
}
