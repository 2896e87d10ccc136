use std::collections::{HashSet, VecDeque};

use maze_types::{Cell, Direction, Maze, ALL_DIRECTIONS};
use mcts::policies::select_first_max;
use smallvec::SmallVec;

use crate::{Controller, MazeGame};

/// Heads for the closest pill while giving dangerous predators a one cell
/// berth, and runs away when no pill is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyController;

impl Controller<MazeGame> for GreedyController {
    fn direction(&mut self, game: &MazeGame) -> Option<Direction> {
        nearest_pill(game).or_else(|| flee(game))
    }
}

fn nearest_pill(game: &MazeGame) -> Option<Direction> {
    let maze = game.grid();
    let start = game.agent();
    let blocked: HashSet<Cell> = game
        .dangerous_cells()
        .flat_map(|cell| {
            ALL_DIRECTIONS
                .into_iter()
                .filter_map(move |dir| maze.neighbor(cell, dir))
                .chain(std::iter::once(cell))
        })
        .collect();

    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::new();
    for dir in maze.possible_directions(start) {
        if let Some(next) = maze.neighbor(start, dir) {
            if !blocked.contains(&next) && seen.insert(next) {
                queue.push_back((next, dir));
            }
        }
    }
    while let Some((cell, first)) = queue.pop_front() {
        if game.has_pill(cell) {
            return Some(first);
        }
        for dir in maze.possible_directions(cell) {
            let Some(next) = maze.neighbor(cell, dir) else {
                continue;
            };
            if !blocked.contains(&next) && seen.insert(next) {
                queue.push_back((next, first));
            }
        }
    }
    None
}

fn flee(game: &MazeGame) -> Option<Direction> {
    let maze = game.grid();
    let start = game.agent();
    let dangers: SmallVec<Cell, 4> = game.dangerous_cells().collect();
    let options: SmallVec<(Direction, Cell), 4> = maze
        .possible_directions(start)
        .into_iter()
        .filter_map(|dir| maze.neighbor(start, dir).map(|next| (dir, next)))
        .collect();
    let (_, (dir, _)) = select_first_max(options.into_iter(), |(_, next)| {
        let closest = dangers
            .iter()
            .map(|danger| next.manhattan(*danger))
            .min()
            .unwrap_or(u32::MAX);
        f64::from(closest)
    })?;
    Some(dir)
}
