use std::fmt::Debug;

pub mod config;
pub mod error;
pub mod games;
pub mod policies;
pub mod vote;

pub use config::VoteConfig;
pub use error::VoteError;
pub use vote::{prune, Pruned, RolloutVoter};

pub type Move<G> = <G as Game>::Move;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Status of a game as seen from outside, independent of whose turn it is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Ongoing,
    PlayerOne,
    PlayerTwo,
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn win_for(player: Player) -> Self {
        match player {
            Player::One => Outcome::PlayerOne,
            Player::Two => Outcome::PlayerTwo,
        }
    }

    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Outcome::PlayerOne => Some(Player::One),
            Outcome::PlayerTwo => Some(Player::Two),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// A two-player, turn-based game the rollout voter can search.
///
/// Cloning must produce a fully independent copy: rollouts mutate their
/// clone freely and the caller's snapshot is never touched.
pub trait Game: Clone {
    type Move: Clone + PartialEq + Debug;
    type MoveList: IntoIterator<Item = Self::Move>;

    fn status(&self) -> Outcome;
    fn current_player(&self) -> Player;

    fn current_opponent(&self) -> Player {
        self.current_player().opponent()
    }

    fn player_tag(&self, player: Player) -> &'static str;
    fn legal_moves(&self) -> Self::MoveList;
    fn is_move_valid(&self, mv: &Self::Move) -> bool;
    fn make_move(&mut self, mv: &Self::Move);

    /// Maps a point in the unit square onto a move, e.g. a click on a board.
    fn move_for_coordinate(&self, x: f32, y: f32) -> Option<Self::Move>;
}
