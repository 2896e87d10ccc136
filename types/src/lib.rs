pub mod cell;
pub mod direction;
pub mod grid;
pub mod maze;

pub use cell::*;
pub use direction::*;
pub use grid::*;
pub use maze::*;
