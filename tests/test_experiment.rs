use std::f64::consts::PI;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use evostrat::{
    chromosome::{
        AdaptiveStepFloat, Chromosome, ChromosomeFactory, CovarianceFloat, Float, ProblemConfig,
        RandomChromosomeFactory,
    },
    experiment::{ExperimentBuilder, ExperimentOptions, ExperimentOutcome, TerminationReason},
    mutation::{AdaptiveFitnessStepMutator, AdaptiveStepMutator, CovarianceMutator, DeltaMutator},
    problems::AckleyFitness,
    recombination::{AdaptiveStepMidPointRecombiner, CovarianceMidPointRecombiner, MidPointRecombiner},
    rng::RandomNumberGenerator,
    selection::{
        BestFitnessMatingSelector, BestFitnessSurvivorSelector, BestOffspringSurvivorSelector,
        MatingSelectorKind, SurvivorSelectorKind,
    },
    GeneticError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn manhattan(c: &Chromosome<Float>) -> f64 {
    -c.values().iter().map(|x| x.abs()).sum::<f64>()
}

fn run_manhattan(options: ExperimentOptions, seed: u64) -> ExperimentOutcome<Float> {
    ExperimentBuilder::<Float, _, _>::new()
        .with_options(options)
        .with_problem(ProblemConfig::new(2, -10.0, 10.0).unwrap())
        .with_fitness_computer(manhattan)
        .with_mutator(DeltaMutator::new(1.0).unwrap())
        .with_recombiner(MidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(seed))
        .unwrap()
}

#[test]
fn test_best_archived_fitness_never_decreases() {
    init_tracing();
    let mut previous = f64::NEG_INFINITY;

    for generations in 0..=5 {
        let options = ExperimentOptions::builder()
            .population_size(10)
            .max_generations(generations)
            .num_parent_pairs(5)
            .crossover_probability(0.5)
            .build()
            .unwrap();
        let outcome = run_manhattan(options, 7);

        assert_eq!(outcome.termination, TerminationReason::MaxGenerations);
        assert_eq!(outcome.generations, generations);
        assert!(outcome.best_individuals.len() <= 5);

        let best = outcome.best_individual().unwrap();
        let archived = best.fitness().unwrap();
        assert_eq!(archived, manhattan(best.chromosome()));
        assert!(archived >= previous, "{} < {}", archived, previous);
        previous = archived;

        let values = best.chromosome().values();
        assert!(values.iter().all(|v| (-10.0..=10.0).contains(v)));
    }
}

#[test]
fn test_statistics_cover_every_generation() {
    let options = ExperimentOptions::builder()
        .population_size(10)
        .max_generations(5)
        .num_parent_pairs(5)
        .build()
        .unwrap();
    let outcome = run_manhattan(options, 11);

    for name in ["average", "best", "standard_deviation"] {
        let data = outcome.statistic(name).unwrap().data();
        let generations: Vec<usize> = data.iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, vec![0, 1, 2, 3, 4, 5], "{}", name);
    }

    // Elitist survivors keep the population best from dropping.
    let best = outcome.statistic("best").unwrap().data();
    assert!(best.windows(2).all(|w| w[1].1 >= w[0].1));
    assert_eq!(
        best.last().unwrap().1,
        outcome.best_individual().unwrap().fitness().unwrap()
    );
}

#[test]
fn test_same_seed_same_run() {
    let options = ExperimentOptions::builder()
        .population_size(8)
        .max_generations(20)
        .num_parent_pairs(4)
        .crossover_probability(0.3)
        .build()
        .unwrap();
    let first = run_manhattan(options.clone(), 99);
    let second = run_manhattan(options, 99);

    assert_eq!(first.evaluations, second.evaluations);
    assert_eq!(
        first.best_individual().unwrap().chromosome(),
        second.best_individual().unwrap().chromosome()
    );
}

// Random factory that counts how many chromosomes it has drawn
#[derive(Debug)]
struct CountingFactory {
    inner: RandomChromosomeFactory<Float>,
    draws: Arc<AtomicUsize>,
}

impl ChromosomeFactory<Float> for CountingFactory {
    fn random(&self, rng: &mut RandomNumberGenerator) -> Chromosome<Float> {
        self.draws.fetch_add(1, Ordering::SeqCst);
        self.inner.random(rng)
    }
}

fn run_stagnant(max_generations: usize, draws: Arc<AtomicUsize>) -> ExperimentOutcome<Float> {
    let options = ExperimentOptions::builder()
        .population_size(6)
        .max_generations(max_generations)
        .num_parent_pairs(3)
        .restart_tolerance(2)
        .build()
        .unwrap();
    let config = Arc::new(ProblemConfig::new(2, -10.0, 10.0).unwrap());

    ExperimentBuilder::<Float, _, _>::new()
        .with_options(options)
        .with_chromosome_factory(CountingFactory {
            inner: RandomChromosomeFactory::new(config),
            draws,
        })
        .with_fitness_computer(|_: &Chromosome<Float>| 1.0)
        .with_mutator(DeltaMutator::new(1.0).unwrap())
        .with_recombiner(MidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(3))
        .unwrap()
}

#[test]
fn test_stagnation_restarts_population() {
    init_tracing();
    let draws = Arc::new(AtomicUsize::new(0));
    let outcome = run_stagnant(10, Arc::clone(&draws));

    // Every second generation completes a stagnant streak of two.
    assert_eq!(outcome.termination, TerminationReason::MaxGenerations);
    assert_eq!(outcome.generations, 10);
    assert_eq!(outcome.restarts, 5);
    assert!(outcome.final_population.iter().all(|i| i.generation() == 0));
    assert_eq!(outcome.final_population.len(), 6);

    // One fresh population per restart on top of the initial one.
    assert_eq!(draws.load(Ordering::SeqCst), 6 * (outcome.restarts + 1));

    // 6 initial evaluations, 5 restarts of 6, and 5 breeding rounds of
    // 3 children costing the 2 mutator evaluations only.
    assert_eq!(outcome.evaluations, 6 + 5 * 6 + 5 * 3 * 2);
}

#[test]
fn test_restart_replaces_stagnant_chromosomes() {
    // Same seed, stopped one generation before the first restart.
    let before = run_stagnant(1, Arc::new(AtomicUsize::new(0)));
    assert_eq!(before.restarts, 0);
    let after = run_stagnant(2, Arc::new(AtomicUsize::new(0)));
    assert_eq!(after.restarts, 1);

    for individual in &after.final_population {
        assert!(before
            .final_population
            .iter()
            .all(|stagnant| stagnant.chromosome() != individual.chromosome()));
    }
}

#[test]
fn test_mutated_offspring_reuse_mutator_fitness() {
    let options = ExperimentOptions::builder()
        .population_size(4)
        .max_generations(1)
        .num_parent_pairs(2)
        .crossover_probability(0.0)
        .mutation_probability(1.0)
        .build()
        .unwrap();
    let outcome = run_manhattan(options, 17);

    // 4 initial evaluations, then 2 children each scored before and after
    // the delta mutation and never again.
    assert_eq!(outcome.evaluations, 4 + 2 * 2);
}

#[test]
fn test_offspring_are_tagged_with_their_generation() {
    let options = ExperimentOptions::builder()
        .population_size(4)
        .max_generations(3)
        .num_parent_pairs(2)
        .breed_size(2)
        .build()
        .unwrap();

    let outcome = ExperimentBuilder::<Float, _, _>::new()
        .with_options(options)
        .with_problem(ProblemConfig::new(2, -10.0, 10.0).unwrap())
        .with_fitness_computer(manhattan)
        .with_mutator(DeltaMutator::new(1.0).unwrap())
        .with_recombiner(MidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestOffspringSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(5))
        .unwrap();

    assert!(outcome.final_population.iter().all(|i| i.generation() == 3));
}

#[test]
fn test_target_fitness_stops_the_run() {
    let options = ExperimentOptions::builder()
        .population_size(10)
        .max_generations(10_000)
        .num_parent_pairs(5)
        .target_fitness(-1.0)
        .build()
        .unwrap();
    let outcome = run_manhattan(options, 21);

    assert_eq!(outcome.termination, TerminationReason::TargetReached);
    assert!(outcome.generations < 10_000);
    assert!(outcome.best_individual().unwrap().fitness().unwrap() >= -1.0);
}

#[test]
fn test_evaluation_budget_stops_the_run() {
    let options = ExperimentOptions::builder()
        .population_size(10)
        .max_generations(10_000)
        .num_parent_pairs(5)
        .max_fitness_evaluations(50)
        .build()
        .unwrap();
    let outcome = run_manhattan(options, 4);

    assert_eq!(outcome.termination, TerminationReason::BudgetExhausted);
    assert!(outcome.evaluations >= 50);
    assert!(outcome.generations < 10);
}

#[test]
fn test_single_individual_skips_breeding() {
    let options = ExperimentOptions::builder()
        .population_size(1)
        .max_generations(5)
        .build()
        .unwrap();
    let outcome = run_manhattan(options, 8);

    assert_eq!(outcome.termination, TerminationReason::MaxGenerations);
    assert_eq!(outcome.evaluations, 1);
    assert_eq!(outcome.final_population.len(), 1);
}

#[test]
fn test_non_finite_fitness_aborts() {
    let result = ExperimentBuilder::<Float, _, _>::new()
        .with_problem(ProblemConfig::new(2, -10.0, 10.0).unwrap())
        .with_fitness_computer(|_: &Chromosome<Float>| f64::NAN)
        .with_mutator(DeltaMutator::new(1.0).unwrap())
        .with_recombiner(MidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(1));

    assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));
}

#[test]
fn test_invalid_options_are_rejected_at_build() {
    let result = ExperimentOptions::builder().num_parent_pairs(0).build();
    assert!(matches!(result, Err(GeneticError::Configuration(_))));
}

fn ackley_options(generations: usize) -> ExperimentOptions {
    ExperimentOptions::builder()
        .population_size(20)
        .max_generations(generations)
        .num_parent_pairs(10)
        .crossover_probability(0.5)
        .build()
        .unwrap()
}

fn improved<R: evostrat::Representation>(outcome: &ExperimentOutcome<R>) -> bool {
    let best = outcome.statistic("best").unwrap().data();
    best.last().unwrap().1 > best.first().unwrap().1
}

#[test]
fn test_covariance_run_on_ackley() {
    init_tracing();
    let config = ProblemConfig::new(5, -15.0, 15.0).unwrap();
    let outcome = ExperimentBuilder::<CovarianceFloat, _, _>::new()
        .with_options(ackley_options(200))
        .with_problem(config)
        .with_fitness_computer(AckleyFitness::default())
        .with_mutator(CovarianceMutator::default())
        .with_recombiner(CovarianceMidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(17))
        .unwrap();

    assert!(improved(&outcome));
    for individual in &outcome.final_population {
        let (values, steps, angles) = individual.chromosome().parts();
        assert!(values.iter().all(|v| (-15.0..=15.0).contains(v)));
        assert!(steps.iter().all(|s| *s > 0.0));
        assert!(angles.iter().all(|a| *a > -PI && *a <= PI));
    }
}

#[test]
fn test_adaptive_step_runs_on_ackley() {
    let config = ProblemConfig::new(5, -15.0, 15.0)
        .unwrap()
        .with_initial_step_size(1.0)
        .unwrap();

    let lognormal = ExperimentBuilder::<AdaptiveStepFloat, _, _>::new()
        .with_options(ackley_options(200))
        .with_problem(config.clone())
        .with_fitness_computer(AckleyFitness::default())
        .with_mutator(AdaptiveStepMutator::default())
        .with_recombiner(AdaptiveStepMidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(23))
        .unwrap();
    assert!(improved(&lognormal));

    let fitness_scaled = ExperimentBuilder::<AdaptiveStepFloat, _, _>::new()
        .with_options(ackley_options(200))
        .with_problem(config)
        .with_fitness_computer(AckleyFitness::default())
        .with_mutator(AdaptiveFitnessStepMutator::new(1.0, 0.05).unwrap())
        .with_recombiner(AdaptiveStepMidPointRecombiner)
        .with_mating_selector(MatingSelectorKind::BestFromRandom)
        .with_survivor_selector(SurvivorSelectorKind::BestFitness)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(29))
        .unwrap();
    assert!(improved(&fitness_scaled));

    for individual in &fitness_scaled.final_population {
        assert!(individual
            .chromosome()
            .genes()
            .iter()
            .all(|g| g.step > 0.0 && (-15.0..=15.0).contains(&g.value)));
    }
}

#[test]
fn test_named_selectors_run() {
    for mating in MatingSelectorKind::ALL {
        for survivor in SurvivorSelectorKind::ALL {
            let outcome = ExperimentBuilder::<Float, _, _>::new()
                .with_options(ackley_options(15))
                .with_problem(ProblemConfig::new(3, -15.0, 15.0).unwrap())
                .with_fitness_computer(AckleyFitness::default())
                .with_mutator(DeltaMutator::new(2.0).unwrap())
                .with_recombiner(MidPointRecombiner)
                .with_mating_selector(mating)
                .with_survivor_selector(survivor)
                .build()
                .unwrap()
                .run(&mut RandomNumberGenerator::from_seed(31))
                .unwrap();

            assert_eq!(outcome.generations, 15, "{} / {}", mating, survivor);
            assert_eq!(outcome.final_population.len(), 20, "{} / {}", mating, survivor);
            assert_eq!(outcome.statistic("average").unwrap().data().len(), 16);
        }
    }
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let run = |threshold: usize| {
        let options = ExperimentOptions::builder()
            .population_size(16)
            .max_generations(30)
            .num_parent_pairs(8)
            .crossover_probability(0.5)
            .parallel_threshold(threshold)
            .build()
            .unwrap();
        ExperimentBuilder::<CovarianceFloat, _, _>::new()
            .with_options(options)
            .with_problem(ProblemConfig::new(4, -15.0, 15.0).unwrap())
            .with_fitness_computer(AckleyFitness::default())
            .with_mutator(CovarianceMutator::default())
            .with_recombiner(CovarianceMidPointRecombiner)
            .with_mating_selector(BestFitnessMatingSelector)
            .with_survivor_selector(BestFitnessSurvivorSelector)
            .build()
            .unwrap()
            .run(&mut RandomNumberGenerator::from_seed(41))
            .unwrap()
    };

    let parallel = run(1);
    let sequential = run(usize::MAX);
    assert_eq!(parallel.evaluations, sequential.evaluations);
    assert_eq!(
        parallel.best_individual().unwrap().chromosome(),
        sequential.best_individual().unwrap().chromosome()
    );
}

#[test]
fn test_covariance_chromosome_layout_in_run() {
    let config = ProblemConfig::new(3, -15.0, 15.0).unwrap();
    let outcome = ExperimentBuilder::<CovarianceFloat, _, _>::new()
        .with_options(ackley_options(3))
        .with_problem(config)
        .with_fitness_computer(AckleyFitness::default())
        .with_mutator(CovarianceMutator::new(0.5).unwrap())
        .with_recombiner(CovarianceMidPointRecombiner)
        .with_mating_selector(BestFitnessMatingSelector)
        .with_survivor_selector(BestFitnessSurvivorSelector)
        .build()
        .unwrap()
        .run(&mut RandomNumberGenerator::from_seed(2))
        .unwrap();

    assert!(outcome
        .final_population
        .iter()
        .all(|i| i.chromosome().len() == 3 + 3 + 3));
}
