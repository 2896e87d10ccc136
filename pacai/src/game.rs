use std::sync::Arc;

use maze_types::{Cell, Direction, GridMaze, Maze};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;

use crate::Simulation;

pub const FRIGHTENED_TICKS: u32 = 40;
pub const PILL_SCORE: u32 = 10;
pub const POWER_PILL_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;
/// Chance that a predator heads for the agent at a fork instead of wandering.
pub const CHASE_PROBABILITY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub position: Cell,
    pub home: Cell,
    pub heading: Direction,
    pub frightened: u32,
}

impl Ghost {
    #[must_use]
    pub const fn is_frightened(&self) -> bool {
        self.frightened > 0
    }
}

/// A small single-life maze chase used to exercise the agent.
///
/// Predators move with the game's own generator, so a clone replays the same
/// future for the same inputs.
#[derive(Debug, Clone)]
pub struct MazeGame {
    maze: Arc<GridMaze>,
    agent: Cell,
    heading: Option<Direction>,
    wanted: Option<Direction>,
    pills: Vec<bool>,
    power_pills: Vec<bool>,
    pills_left: usize,
    ghosts: Vec<Ghost>,
    ghosts_eaten: usize,
    ghosts_edible: usize,
    score: u32,
    tick: u64,
    over: bool,
    rng: XorShiftRng,
}

impl MazeGame {
    #[must_use]
    pub fn new(maze: Arc<GridMaze>, seed: u64) -> Self {
        let cells = maze.width() as usize * maze.height() as usize;
        let mut pills = vec![false; cells];
        let mut power_pills = vec![false; cells];
        for cell in maze.pills() {
            pills[maze.index(*cell)] = true;
        }
        for cell in maze.power_pills() {
            power_pills[maze.index(*cell)] = true;
        }
        let ghosts = maze
            .ghost_starts()
            .iter()
            .map(|start| Ghost {
                position: *start,
                home: *start,
                heading: Direction::Up,
                frightened: 0,
            })
            .collect();
        Self {
            agent: maze.agent_start(),
            heading: None,
            wanted: None,
            pills_left: maze.pills().len() + maze.power_pills().len(),
            pills,
            power_pills,
            ghosts,
            ghosts_eaten: 0,
            ghosts_edible: 0,
            score: 0,
            tick: 0,
            over: false,
            rng: XorShiftRng::seed_from_u64(seed),
            maze,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Arc<GridMaze> {
        &self.maze
    }

    #[must_use]
    pub fn agent(&self) -> Cell {
        self.agent
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    #[must_use]
    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    #[must_use]
    pub fn has_pill(&self, cell: Cell) -> bool {
        if !self.maze.contains(cell) {
            return false;
        }
        let idx = self.maze.index(cell);
        self.pills[idx] || self.power_pills[idx]
    }

    /// Cells a predator can kill the agent on right now.
    pub fn dangerous_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.ghosts
            .iter()
            .filter(|ghost| !ghost.is_frightened())
            .map(|ghost| ghost.position)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.pills_left == 0
    }

    fn move_agent(&mut self) {
        if let Some(dir) = self.wanted {
            if self.maze.neighbor(self.agent, dir).is_some() {
                self.heading = Some(dir);
            }
        }
        let Some(next) = self.heading.and_then(|dir| self.maze.neighbor(self.agent, dir)) else {
            return;
        };
        self.agent = next;

        let idx = self.maze.index(next);
        if std::mem::take(&mut self.pills[idx]) {
            self.pills_left -= 1;
            self.score += PILL_SCORE;
        }
        if std::mem::take(&mut self.power_pills[idx]) {
            self.pills_left -= 1;
            self.score += POWER_PILL_SCORE;
            for ghost in &mut self.ghosts {
                ghost.frightened = FRIGHTENED_TICKS;
            }
            self.ghosts_edible += self.ghosts.len();
        }
    }

    fn move_ghosts(&mut self) {
        let target = self.agent;
        for i in 0..self.ghosts.len() {
            let ghost = self.ghosts[i];
            let options: SmallVec<(Direction, Cell), 4> = self
                .maze
                .possible_directions(ghost.position)
                .into_iter()
                .filter_map(|dir| self.maze.neighbor(ghost.position, dir).map(|next| (dir, next)))
                .collect();
            let forward: SmallVec<(Direction, Cell), 4> = options
                .iter()
                .copied()
                .filter(|(dir, _)| *dir != ghost.heading.opposite())
                .collect();
            let options = if forward.is_empty() { options } else { forward };

            let chase = !ghost.is_frightened() && self.rng.gen_bool(CHASE_PROBABILITY);
            let pick = if chase {
                options
                    .iter()
                    .min_by_key(|(_, next)| next.manhattan(target))
                    .copied()
            } else {
                options.choose(&mut self.rng).copied()
            };
            if let Some((dir, next)) = pick {
                let ghost = &mut self.ghosts[i];
                ghost.heading = dir;
                ghost.position = next;
            }
        }
    }

    fn resolve_collisions(&mut self) {
        for ghost in &mut self.ghosts {
            if ghost.position != self.agent {
                continue;
            }
            if ghost.is_frightened() {
                ghost.position = ghost.home;
                ghost.frightened = 0;
                self.ghosts_eaten += 1;
                self.score += GHOST_SCORE;
            } else {
                self.over = true;
            }
        }
    }
}

impl Simulation for MazeGame {
    type Maze = GridMaze;

    fn maze(&self) -> &GridMaze {
        &self.maze
    }

    fn position(&self) -> Cell {
        self.agent
    }

    fn pills_remaining(&self) -> usize {
        self.pills_left
    }

    fn ghosts_eaten(&self) -> usize {
        self.ghosts_eaten
    }

    fn ghosts_edible(&self) -> usize {
        self.ghosts_edible
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn steer(&mut self, dir: Direction) {
        self.wanted = Some(dir);
    }

    fn update(&mut self) {
        if self.over {
            return;
        }
        self.move_agent();
        self.resolve_collisions();
        if !self.over {
            self.move_ghosts();
            self.resolve_collisions();
        }
        for ghost in &mut self.ghosts {
            ghost.frightened = ghost.frightened.saturating_sub(1);
        }
        self.tick += 1;
    }
}

#[cfg(test)]
mod tests {
    use maze_types::SMALL_LAYOUT;

    use super::*;

    fn game(layout: &str) -> MazeGame {
        MazeGame::new(Arc::new(GridMaze::parse(layout).unwrap()), 7)
    }

    #[test]
    fn agent_eats_pills_along_its_heading() {
        let mut game = game("#######\n#P...##\n#######");
        assert_eq!(game.pills_remaining(), 3);
        game.steer(Direction::Right);
        game.update();
        game.update();
        assert_eq!(game.agent(), Cell::new(3, 1));
        assert_eq!(game.pills_remaining(), 1);
        assert_eq!(game.score(), 2 * PILL_SCORE);
        assert!(!game.has_pill(Cell::new(2, 1)));
        assert!(game.has_pill(Cell::new(4, 1)));
    }

    #[test]
    fn blocked_turns_keep_the_old_heading() {
        let mut game = game("#######\n#P...##\n#######");
        game.steer(Direction::Right);
        game.update();
        game.steer(Direction::Up);
        game.update();
        assert_eq!(game.agent(), Cell::new(3, 1));
        assert_eq!(game.heading(), Some(Direction::Right));
    }

    #[test]
    fn touching_a_predator_ends_the_game() {
        let mut game = game("#######\n#P..G##\n#######");
        game.steer(Direction::Right);
        for _ in 0..3 {
            game.update();
        }
        assert!(game.is_over());
        let tick = game.tick();
        game.update();
        assert_eq!(game.tick(), tick);
    }

    #[test]
    fn stepping_onto_a_predator_is_caught_before_it_moves() {
        let mut game = game("#####\n#PG##\n#####");
        game.steer(Direction::Right);
        game.update();
        assert!(game.is_over());
        assert_eq!(game.agent(), Cell::new(2, 1));
        assert_eq!(game.ghosts()[0].position, Cell::new(2, 1));
    }

    #[test]
    fn power_pill_makes_predators_edible() {
        let mut game = game("########\n#Po..G##\n########");
        game.steer(Direction::Right);
        // the predator walks into the agent on the second tick
        game.update();
        game.update();
        assert!(!game.is_over());
        assert_eq!(game.ghosts_edible(), 1);
        assert_eq!(game.ghosts_eaten(), 1);
        assert_eq!(game.ghosts()[0].position, Cell::new(5, 1));
        assert_eq!(game.score(), POWER_PILL_SCORE + PILL_SCORE + GHOST_SCORE);
    }

    #[test]
    fn clones_replay_the_same_future() {
        let mut a = game(SMALL_LAYOUT);
        let mut b = a.clone();
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            for _ in 0..10 {
                a.steer(dir);
                b.steer(dir);
                a.update();
                b.update();
            }
        }
        assert_eq!(a.agent(), b.agent());
        assert_eq!(a.ghosts(), b.ghosts());
        assert_eq!(a.score(), b.score());
    }
}
