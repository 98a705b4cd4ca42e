//! Named selection strategies, for callers that pick a selector from a
//! string (command-line flags, configuration files).

use std::fmt;
use std::str::FromStr;

use super::{
    BestFitnessMatingSelector, BestFitnessSurvivorSelector, BestFromRandomMatingSelector,
    BestOffspringSurvivorSelector, BestParentPlusOffspringSurvivorSelector,
    GenerationalSurvivorSelector, MatingSelector, ParentPair,
    RandomMatingSelector, RouletteMatingSelector, RouletteSurvivorSelector, SurvivorSelector,
};
use crate::{
    chromosome::Representation,
    error::{GeneticError, Result},
    individual::{Individual, Population},
    rng::RandomNumberGenerator,
};

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace('-', "_")
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatingSelectorKind {
    #[default]
    BestFitness,
    Roulette,
    BestFromRandom,
    Random,
}

impl MatingSelectorKind {
    pub const ALL: [Self; 4] = [
        Self::BestFitness,
        Self::Roulette,
        Self::BestFromRandom,
        Self::Random,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BestFitness => "BEST_FITNESS",
            Self::Roulette => "ROULETTE",
            Self::BestFromRandom => "BEST_FROM_RAND",
            Self::Random => "RANDOM",
        }
    }
}

impl fmt::Display for MatingSelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatingSelectorKind {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                GeneticError::Configuration(format!("Unknown mating selector '{}'", s))
            })
    }
}

impl<R: Representation> MatingSelector<R> for MatingSelectorKind {
    fn select_pairs<'a>(
        &self,
        population: &'a [Individual<R>],
        num_pairs: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<ParentPair<'a, R>>> {
        match self {
            Self::BestFitness => BestFitnessMatingSelector.select_pairs(population, num_pairs, rng),
            Self::Roulette => RouletteMatingSelector.select_pairs(population, num_pairs, rng),
            Self::BestFromRandom => {
                BestFromRandomMatingSelector.select_pairs(population, num_pairs, rng)
            }
            Self::Random => RandomMatingSelector.select_pairs(population, num_pairs, rng),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurvivorSelectorKind {
    #[default]
    BestFitness,
    BestOffspring,
    BestParentPlusOffspring,
    Generational,
    Roulette,
}

impl SurvivorSelectorKind {
    pub const ALL: [Self; 5] = [
        Self::BestFitness,
        Self::BestOffspring,
        Self::BestParentPlusOffspring,
        Self::Generational,
        Self::Roulette,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BestFitness => "BEST_FITNESS",
            Self::BestOffspring => "BEST_BREED_FITNESS",
            Self::BestParentPlusOffspring => "BEST_PARENT_PLUS_BREED",
            Self::Generational => "GENERATIONAL",
            Self::Roulette => "ROULETTE",
        }
    }
}

impl fmt::Display for SurvivorSelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurvivorSelectorKind {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                GeneticError::Configuration(format!("Unknown survivor selector '{}'", s))
            })
    }
}

impl<R: Representation> SurvivorSelector<R> for SurvivorSelectorKind {
    fn select_survivors(
        &self,
        population_size: usize,
        parents: Population<R>,
        offspring: Population<R>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<R>> {
        match self {
            Self::BestFitness => {
                BestFitnessSurvivorSelector.select_survivors(population_size, parents, offspring, rng)
            }
            Self::BestOffspring => BestOffspringSurvivorSelector
                .select_survivors(population_size, parents, offspring, rng),
            Self::BestParentPlusOffspring => BestParentPlusOffspringSurvivorSelector
                .select_survivors(population_size, parents, offspring, rng),
            Self::Generational => GenerationalSurvivorSelector
                .select_survivors(population_size, parents, offspring, rng),
            Self::Roulette => {
                RouletteSurvivorSelector.select_survivors(population_size, parents, offspring, rng)
            }
        }
    }
}
