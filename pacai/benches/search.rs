use std::{sync::Arc, time::Duration};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maze_types::{GridMaze, SMALL_LAYOUT};
use pacai::{GreedyController, MazeGame, MctsPac, SearchConfig, Simulation, Tactic};

pub fn criterion_benchmark(criterion: &mut Criterion) {
    let maze = Arc::new(GridMaze::parse(SMALL_LAYOUT).unwrap());
    let game = MazeGame::new(maze, 0);
    let config = SearchConfig::default();

    criterion.bench_function("think", |b| {
        let mut rng = config.rng();
        let mut agent = MctsPac::new(config.clone(), Tactic::Pill, GreedyController).unwrap();
        b.iter(|| black_box(agent.think(&game, &mut rng).unwrap()));
    });

    criterion.bench_function("playout", |b| {
        let mut controller = GreedyController;
        b.iter(|| black_box(pacai::playout(&game, &mut controller, config.playout_ticks)));
    });

    criterion.bench_function("game tick", |b| {
        b.iter(|| {
            let mut game = game.clone();
            for _ in 0..100 {
                game.update();
            }
            black_box(game.tick())
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(100).warm_up_time(Duration::from_secs(3));
    targets = criterion_benchmark
}
criterion_main!(benches);
