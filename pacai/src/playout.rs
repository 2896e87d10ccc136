use maze_types::{Direction, Maze};

use crate::Rewards;

/// A live game the tree search can observe, steer and fast-forward.
///
/// Cloning must give an independent copy. Playouts only ever advance clones.
pub trait Simulation: Clone {
    type Maze: Maze;

    fn maze(&self) -> &Self::Maze;
    fn position(&self) -> Position<Self>;
    /// Pills and power pills still on the board.
    fn pills_remaining(&self) -> usize;
    /// Predators eaten since the game started.
    fn ghosts_eaten(&self) -> usize;
    /// Predators made edible since the game started.
    fn ghosts_edible(&self) -> usize;
    fn is_over(&self) -> bool;
    fn steer(&mut self, dir: Direction);
    /// Advances the game by one tick.
    fn update(&mut self);
}

pub type Position<S> = <<S as Simulation>::Maze as Maze>::Position;

/// The heuristic that drives the agent during a playout.
pub trait Controller<S> {
    fn direction(&mut self, state: &S) -> Option<Direction>;
}

impl<S, F> Controller<S> for F
where
    F: FnMut(&S) -> Option<Direction>,
{
    fn direction(&mut self, state: &S) -> Option<Direction> {
        self(state)
    }
}

/// Plays a copy of `live` for at most `ticks` ticks under `controller`.
pub fn playout<S, C>(live: &S, controller: &mut C, ticks: u32) -> Rewards
where
    S: Simulation,
    C: Controller<S> + ?Sized,
{
    let mut sim = live.clone();
    let pills = sim.pills_remaining();
    let eaten = sim.ghosts_eaten();
    let edible = sim.ghosts_edible();

    for _ in 0..ticks {
        if sim.is_over() {
            break;
        }
        if let Some(dir) = controller.direction(&sim) {
            sim.steer(dir);
        }
        sim.update();
    }

    let survival = if ticks > 0 && sim.is_over() { 0.0 } else { 1.0 };
    Rewards::new(
        ratio(sim.ghosts_eaten().saturating_sub(eaten), sim.ghosts_edible().saturating_sub(edible)),
        ratio(pills.saturating_sub(sim.pills_remaining()), pills),
        survival,
    )
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = part as f64 / whole as f64;
    ratio
}
