use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use evostrat::{
    chromosome::{Chromosome, CovarianceFloat, Float, ProblemConfig},
    experiment::{ExperimentBuilder, ExperimentOptions},
    fitness::FitnessEvaluator,
    mutation::{CovarianceMutator, DeltaMutator, Mutator},
    problems::AckleyFitness,
    recombination::{CovarianceMidPointRecombiner, MidPointRecombiner},
    rng::RandomNumberGenerator,
    selection::{BestFitnessMatingSelector, BestFitnessSurvivorSelector},
};

fn bench_covariance_mutation(c: &mut Criterion) {
    let evaluator = FitnessEvaluator::new(AckleyFitness::default());
    let mut rng = RandomNumberGenerator::from_seed(1);
    let mut mutator = CovarianceMutator::default();

    let mut group = c.benchmark_group("covariance_mutation");
    for n in [2, 10, 30].iter() {
        let config = Arc::new(ProblemConfig::new(*n, -15.0, 15.0).unwrap());
        let chromosome = Chromosome::<CovarianceFloat>::random(config, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let mut mutated = chromosome.clone();
                mutator
                    .mutate_inplace(black_box(&mut mutated), &evaluator, &mut rng)
                    .unwrap();
                mutated
            })
        });
    }
    group.finish();
}

fn bench_delta_mutation(c: &mut Criterion) {
    let evaluator = FitnessEvaluator::new(AckleyFitness::default());
    let mut rng = RandomNumberGenerator::from_seed(2);
    let mut mutator = DeltaMutator::new(10.0).unwrap();
    let config = Arc::new(ProblemConfig::new(30, -15.0, 15.0).unwrap());
    let chromosome = Chromosome::<Float>::random(config, &mut rng);

    c.bench_function("delta_mutation_30", |b| {
        b.iter(|| {
            let mut mutated = chromosome.clone();
            mutator
                .mutate_inplace(black_box(&mut mutated), &evaluator, &mut rng)
                .unwrap();
            mutated
        })
    });
}

fn bench_ackley_experiment(c: &mut Criterion) {
    let mut group = c.benchmark_group("ackley_experiment");
    group.sample_size(10);

    for population_size in [20, 200].iter() {
        group.bench_with_input(
            BenchmarkId::new("float_delta", population_size),
            population_size,
            |b, &size| {
                b.iter(|| {
                    let options = ExperimentOptions::builder()
                        .population_size(size)
                        .max_generations(50)
                        .num_parent_pairs(size / 2)
                        .crossover_probability(0.5)
                        .build()
                        .unwrap();
                    ExperimentBuilder::<Float, _, _>::new()
                        .with_options(options)
                        .with_problem(ProblemConfig::new(10, -15.0, 15.0).unwrap())
                        .with_fitness_computer(AckleyFitness::default())
                        .with_mutator(DeltaMutator::new(10.0).unwrap())
                        .with_recombiner(MidPointRecombiner)
                        .with_mating_selector(BestFitnessMatingSelector)
                        .with_survivor_selector(BestFitnessSurvivorSelector)
                        .build()
                        .unwrap()
                        .run(&mut RandomNumberGenerator::from_seed(3))
                        .unwrap()
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("covariance", population_size),
            population_size,
            |b, &size| {
                b.iter(|| {
                    let options = ExperimentOptions::builder()
                        .population_size(size)
                        .max_generations(50)
                        .num_parent_pairs(size / 2)
                        .crossover_probability(0.5)
                        .parallel_threshold(100)
                        .build()
                        .unwrap();
                    ExperimentBuilder::<CovarianceFloat, _, _>::new()
                        .with_options(options)
                        .with_problem(ProblemConfig::new(10, -15.0, 15.0).unwrap())
                        .with_fitness_computer(AckleyFitness::default())
                        .with_mutator(CovarianceMutator::default())
                        .with_recombiner(CovarianceMidPointRecombiner)
                        .with_mating_selector(BestFitnessMatingSelector)
                        .with_survivor_selector(BestFitnessSurvivorSelector)
                        .build()
                        .unwrap()
                        .run(&mut RandomNumberGenerator::from_seed(4))
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_covariance_mutation,
    bench_delta_mutation,
    bench_ackley_experiment
);
criterion_main!(benches);
