use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mcts::{games::TicTacToe, RolloutVoter, VoteConfig};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

pub fn criterion_benchmark(criterion: &mut Criterion) {
    let voter = RolloutVoter::new(VoteConfig::with_rollouts(200));
    let mut rng = XorShiftRng::seed_from_u64(1337);
    criterion.bench_function("vote_empty_board", |b| {
        b.iter(|| {
            let game = TicTacToe::new();
            black_box(voter.choose(&game, &mut rng).unwrap());
        });
    });
    let midgame = TicTacToe::from_cells("X...O..X.").unwrap();
    criterion.bench_function("vote_midgame", |b| {
        b.iter(|| black_box(voter.choose(&midgame, &mut rng).unwrap()));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50).warm_up_time(Duration::from_secs(3));
    targets = criterion_benchmark
}
criterion_main!(benches);
