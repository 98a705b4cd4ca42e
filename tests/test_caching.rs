use evostrat::{
    caching::{CachedFitness, ThreadLocalCachedFitness},
    chromosome::{Chromosome, Float, ProblemConfig},
    experiment::{ExperimentBuilder, ExperimentOptions, ExperimentOutcome},
    fitness::FitnessComputer,
    mutation::DeltaMutator,
    problems::AckleyFitness,
    recombination::MidPointRecombiner,
    rng::RandomNumberGenerator,
    selection::{BestFitnessMatingSelector, BestFitnessSurvivorSelector},
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

// Ackley with a call counter, shared across clones
#[derive(Clone, Default)]
struct CostlyAckley {
    calls: Arc<AtomicUsize>,
}

impl CostlyAckley {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FitnessComputer<Float> for CostlyAckley {
    fn fitness(&self, chromosome: &Chromosome<Float>) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AckleyFitness::default().fitness(chromosome)
    }
}

fn options(parallel_threshold: usize) -> ExperimentOptions {
    ExperimentOptions::builder()
        .population_size(12)
        .max_generations(40)
        .num_parent_pairs(6)
        .crossover_probability(0.3)
        .mutation_probability(0.6)
        .parallel_threshold(parallel_threshold)
        .build()
        .unwrap()
}

fn run<F>(computer: F, parallel_threshold: usize) -> ExperimentOutcome<Float>
where
    F: FitnessComputer<Float> + 'static,
{
    ExperimentBuilder::<Float, _, _>::new()
        .with_options(options(parallel_threshold))
        .with_problem(ProblemConfig::new(3, -15.0, 15.0).unwrap())
        .with_fitness_computer(computer)
        .with_mutator(DeltaMutator::new(2.0).unwrap())
        .with_recombiner(MidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(77))
        .unwrap()
}

#[test]
fn test_experiment_with_cached_fitness() {
    let plain = CostlyAckley::default();
    let uncached = run(plain.clone(), usize::MAX);
    assert_eq!(plain.calls(), uncached.evaluations);

    let costly = CostlyAckley::default();
    let cached = run(CachedFitness::<Float, _>::new(costly.clone()), usize::MAX);

    // The mutator re-scores chromosomes it has already seen.
    assert!(costly.calls() < cached.evaluations);
    assert_eq!(cached.evaluations, uncached.evaluations);
    assert_eq!(
        cached.best_individual().unwrap().chromosome(),
        uncached.best_individual().unwrap().chromosome()
    );
}

#[test]
fn test_experiment_with_thread_local_cache() {
    let costly = CostlyAckley::default();
    let cached = run(ThreadLocalCachedFitness::<Float, _>::new(costly.clone()), 1);

    let reference = run(CostlyAckley::default(), 1);
    assert!(costly.calls() <= cached.evaluations);
    assert_eq!(
        cached.best_individual().unwrap().fitness().unwrap(),
        reference.best_individual().unwrap().fitness().unwrap()
    );
}

#[test]
fn test_shared_cache_between_experiments() {
    let costly = CostlyAckley::default();
    let cache: Arc<dyn FitnessComputer<Float>> = Arc::new(CachedFitness::<Float, _>::new(costly.clone()));

    let build = || {
        ExperimentBuilder::<Float, _, _>::new()
            .with_options(options(usize::MAX))
            .with_problem(ProblemConfig::new(3, -15.0, 15.0).unwrap())
            .with_shared_fitness_computer(Arc::clone(&cache))
            .with_mutator(DeltaMutator::new(2.0).unwrap())
            .with_recombiner(MidPointRecombiner)
            .with_mating_selector(BestFitnessMatingSelector)
            .with_survivor_selector(BestFitnessSurvivorSelector)
            .build()
            .unwrap()
    };

    let first = build().run(&mut RandomNumberGenerator::from_seed(5)).unwrap();
    let after_first = costly.calls();

    // Same seed, same chromosomes: every lookup is a hit.
    let second = build().run(&mut RandomNumberGenerator::from_seed(5)).unwrap();
    assert_eq!(costly.calls(), after_first);
    assert_eq!(first.evaluations, second.evaluations);
}
