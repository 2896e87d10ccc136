use std::{fmt::Debug, hash::Hash};

use smallvec::SmallVec;

use crate::Direction;

pub type Directions = SmallVec<Direction, 4>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Corridor,
    Junction,
}

impl CellKind {
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

/// Read-only view of a maze as a graph of cells.
///
/// Positions are opaque keys handed out by the implementation. Two positions
/// compare equal exactly when they name the same location.
pub trait Maze {
    type Position: Copy + Eq + Hash + Debug;

    fn kind(&self, pos: Self::Position) -> CellKind;

    /// The open cell reached by one step from `pos`, `None` if a wall is in the way.
    fn neighbor(&self, pos: Self::Position, dir: Direction) -> Option<Self::Position>;

    fn possible_directions(&self, pos: Self::Position) -> Directions;

    /// Length of one corridor segment between adjacent cells.
    fn node_distance(&self) -> u32;

    fn is_junction(&self, pos: Self::Position) -> bool {
        self.possible_directions(pos).len() > 2
    }
}
