use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use playcall_core::taxonomy::{Bucket, ClockBucket, DistanceBucket, FieldZone, Possession, Turnover, YardsBucket};
use playcall_core::{
    posterior_mean, CallContext, CallType, Condition, Counts, EpModel, GameState, LeagueMix,
    Matcher, Observation, PlayResult, PriorEngine, TaggedPlay, TaggedResult,
};

fn pick<B: Bucket>(rng: &mut ChaCha8Rng) -> B {
    let all = B::all();
    all[rng.gen_range(0..all.len())]
}

fn random_condition(rng: &mut ChaCha8Rng) -> Condition {
    Condition::situation(
        rng.gen_range(1..=4),
        pick::<DistanceBucket>(rng),
        pick::<FieldZone>(rng),
        pick::<ClockBucket>(rng),
    )
    .with_possession(pick::<Possession>(rng))
    .with_hurry_up(rng.gen_bool(0.1))
}

fn create_call_log(n: usize, seed: u64) -> Vec<Observation<CallType>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let condition = random_condition(&mut rng);
            let label = rng.gen_bool(0.95).then(|| pick::<CallType>(&mut rng));
            Observation::new(condition, label)
        })
        .collect()
}

fn create_play_log(n: usize, seed: u64) -> Vec<TaggedPlay> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let state = GameState::new(
                rng.gen_range(1..=4),
                pick::<DistanceBucket>(&mut rng),
                pick::<FieldZone>(&mut rng),
                pick::<ClockBucket>(&mut rng),
                rng.gen_bool(0.1),
            );
            let result = PlayResult {
                first_down: rng.gen_bool(0.3),
                touchdown: rng.gen_bool(0.05),
                yards: pick::<YardsBucket>(&mut rng),
                turnover: if rng.gen_bool(0.03) { Turnover::Int } else { Turnover::None },
            };
            let mut result = TaggedResult::from(result);
            // Some rows are still being tagged.
            if rng.gen_bool(0.1) {
                result.yards = None;
            }
            TaggedPlay { state, result }
        })
        .collect()
}

fn bench_estimate(c: &mut Criterion) {
    let matcher = Matcher::default();
    let hist = create_call_log(5_000, 42);
    let live = create_call_log(60, 7);
    let condition = Condition::situation(1, DistanceBucket::Medium, FieldZone::Midfield, ClockBucket::Other);

    c.bench_function("estimate_5000_hist", |b| {
        b.iter(|| matcher.estimate(black_box(&condition), black_box(&hist), black_box(&live)))
    });

    c.bench_function("estimate_by_clock_5000_hist", |b| {
        b.iter(|| {
            matcher.estimate_by_clock(
                black_box(&condition),
                black_box(&hist),
                black_box(&live),
                ClockBucket::ALL,
            )
        })
    });
}

fn bench_call_posterior(c: &mut Criterion) {
    let engine = PriorEngine::default();
    let ctx = CallContext {
        down: 3,
        distance: DistanceBucket::Long,
        zone: FieldZone::HighRed,
        clock: ClockBucket::From2To0,
        hurry_up: true,
        ..CallContext::default()
    };
    let counts: Counts<CallType> = [(CallType::PassDropback, 6), (CallType::Screen, 2)]
        .into_iter()
        .collect();

    c.bench_function("call_alpha_posterior", |b| {
        b.iter(|| {
            let alpha = engine.call_alpha(black_box(&ctx), LeagueMix::default(), 1.0);
            posterior_mean(&alpha, black_box(&counts))
        })
    });
}

fn bench_epa(c: &mut Criterion) {
    let model = EpModel::default();
    let plays = create_play_log(2_000, 42);

    c.bench_function("epa_batch_2000_plays", |b| {
        b.iter(|| model.epa_batch(black_box(&plays), LeagueMix::default()))
    });
}

criterion_group!(benches, bench_estimate, bench_call_posterior, bench_epa);
criterion_main!(benches);
