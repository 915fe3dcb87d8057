use gamesim::equilibrium::*;
use gamesim::rng::RngKind;
use gamesim::rng::Source;
use gamesim::simulation::*;
use gamesim::strategy::Archetype;
use gamesim::strategy::PlayerRule;
use gamesim::*;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        drawing_mersenne_numbers,
        drawing_xorshift_numbers,
        validating_generator_quality,
        simulating_mixed_batches,
        simulating_behavioral_batches,
        solving_pure_nash,
        solving_mixed_nash,
        analyzing_dominance,
}

fn drawing_mersenne_numbers(c: &mut criterion::Criterion) {
    let mut source = Source::new(RngKind::Mersenne, 42);
    c.bench_function("draw 10k Mersenne floats", |b| {
        b.iter(|| (0..10_000).map(|_| source.next()).sum::<f64>())
    });
}

fn drawing_xorshift_numbers(c: &mut criterion::Criterion) {
    let mut source = Source::new(RngKind::Xorshift, 42);
    c.bench_function("draw 10k Xorshift floats", |b| {
        b.iter(|| (0..10_000).map(|_| source.next()).sum::<f64>())
    });
}

fn validating_generator_quality(c: &mut criterion::Criterion) {
    let source = Source::new(RngKind::Mersenne, 42);
    c.bench_function("validate 10k draws of generator quality", |b| {
        b.iter(|| source.validate_quality(10_000))
    });
}

fn simulating_mixed_batches(c: &mut criterion::Criterion) {
    let rules = vec![PlayerRule::Mixed { probabilities: None }; 2];
    let config = SimulationConfig::new(PayoffTensor::prisoners_dilemma(), rules, 10_000);
    c.bench_function("simulate 10k mixed Prisoner's Dilemma iterations", |b| {
        b.iter(|| Simulation::new().run(config.clone(), &mut Silent))
    });
}

fn simulating_behavioral_batches(c: &mut criterion::Criterion) {
    let rules = vec![
        PlayerRule::Behavioral {
            archetype: Archetype::TitForTat,
        },
        PlayerRule::Behavioral {
            archetype: Archetype::Pavlov,
        },
    ];
    let config = SimulationConfig::new(PayoffTensor::prisoners_dilemma(), rules, 10_000);
    c.bench_function("simulate 10k behavioral Prisoner's Dilemma iterations", |b| {
        b.iter(|| Simulation::new().run(config.clone(), &mut Silent))
    });
}

fn solving_pure_nash(c: &mut criterion::Criterion) {
    let game = PayoffTensor::random();
    c.bench_function("find pure Nash equilibria of a random game", |b| {
        b.iter(|| find_pure_nash(&game))
    });
}

fn solving_mixed_nash(c: &mut criterion::Criterion) {
    let game = PayoffTensor::rock_paper_scissors();
    c.bench_function("find mixed Nash equilibria of Rock Paper Scissors", |b| {
        b.iter(|| find_mixed_nash(&game, MIXED_ITERATIONS, EQUILIBRIUM_TOLERANCE))
    });
}

fn analyzing_dominance(c: &mut criterion::Criterion) {
    let game = PayoffTensor::random();
    c.bench_function("analyze dominance of a random game", |b| {
        b.iter(|| analyze_dominance(&game))
    });
}
