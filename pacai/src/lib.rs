#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod node;
pub mod playout;
pub mod rewards;
pub mod search;
pub mod tree;

pub use config::SearchConfig;
pub use controller::GreedyController;
pub use error::{ConfigError, SearchError};
pub use game::MazeGame;
pub use node::{NodeId, RewardNode};
pub use playout::{playout, Controller, Position, Simulation};
pub use rewards::{RewardHistory, Rewards, Tactic};
pub use search::MctsPac;
pub use tree::{walk_to_junction, SearchTree, Selection, SelectionKind, Walk};
