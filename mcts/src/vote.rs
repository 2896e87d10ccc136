use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

use crate::{policies::select_by_key, Game, Move, Outcome, Player, VoteConfig, VoteError};

/// Result of the one-ply safety check over a candidate list.
#[derive(Debug, Clone, PartialEq)]
pub enum Pruned<M> {
    /// A move that wins on the spot. Nothing else needs to be searched.
    Winner(M),
    /// Moves that do not hand the opponent an immediate win, in input order.
    Survivors(Vec<M>),
}

/// Filters out moves that let the opponent win with their very next reply.
///
/// The scan stops at the first move that wins outright for the player to move.
pub fn prune<G: Game>(game: &G, candidates: &[Move<G>]) -> Pruned<Move<G>> {
    let me = game.current_player();
    let opponent = game.current_opponent();
    let mut survivors = Vec::with_capacity(candidates.len());

    for mv in candidates {
        let mut after = game.clone();
        after.make_move(mv);
        let status = after.status();
        if status == Outcome::win_for(me) {
            return Pruned::Winner(mv.clone());
        }
        if status == Outcome::win_for(opponent) {
            continue;
        }
        if status.is_terminal() {
            survivors.push(mv.clone());
            continue;
        }

        let assists = after.legal_moves().into_iter().any(|reply| {
            let mut reply_state = after.clone();
            reply_state.make_move(&reply);
            reply_state.status() == Outcome::win_for(opponent)
        });
        if assists {
            trace!(?mv, "discarding move that assists the opponent");
        } else {
            survivors.push(mv.clone());
        }
    }
    Pruned::Survivors(survivors)
}

/// Flat Monte Carlo move selection for two-player games.
///
/// Every move that survives [`prune`] is scored by the average result of
/// uniformly random playouts. The search holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct RolloutVoter {
    config: VoteConfig,
}

impl RolloutVoter {
    #[must_use]
    pub fn new(config: VoteConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &VoteConfig {
        &self.config
    }

    pub fn choose<G: Game, R: Rng>(
        &self,
        game: &G,
        rng: &mut R,
    ) -> Result<Move<G>, VoteError> {
        let moves = game.legal_moves().into_iter().collect_vec();
        self.choose_among(game, &moves, rng)
    }

    pub fn choose_among<G: Game, R: Rng>(
        &self,
        game: &G,
        moves: &[Move<G>],
        rng: &mut R,
    ) -> Result<Move<G>, VoteError> {
        let Some(first) = moves.first() else {
            return Err(VoteError::NoLegalMoves);
        };

        let survivors = match prune(game, moves) {
            Pruned::Winner(mv) => {
                debug!(?mv, "immediate win");
                return Ok(mv);
            }
            Pruned::Survivors(survivors) => survivors,
        };

        match survivors.len() {
            0 => {
                debug!("every move assists the opponent, falling back to the first one");
                return Ok(first.clone());
            }
            1 => return Ok(survivors[0].clone()),
            _ => {}
        }

        let me = game.current_player();
        let scores = survivors
            .iter()
            .map(|mv| {
                let score = self.rollout_score(game, mv, me, rng);
                debug!(?mv, score, "rollout vote");
                score
            })
            .collect_vec();

        let (idx, _) = select_by_key(scores.iter(), |score| **score, rng)
            .ok_or(VoteError::NoLegalMoves)?;
        Ok(survivors[idx].clone())
    }

    /// Average result of `rollouts` random games after `mv`, in [-1, 1].
    pub fn rollout_score<G: Game, R: Rng>(
        &self,
        game: &G,
        mv: &Move<G>,
        me: Player,
        rng: &mut R,
    ) -> f64 {
        let rollouts = self.config.rollouts.max(1);
        let mut value: i64 = 0;
        for _ in 0..rollouts {
            let mut playout = game.clone();
            playout.make_move(mv);
            let outcome = simulate(&mut playout, self.config.max_rollout_length, rng);
            value += match outcome.winner() {
                Some(winner) if winner == me => 1,
                Some(_) => -1,
                None if rng.gen_bool(0.5) => 1,
                None => -1,
            };
        }
        #[allow(clippy::cast_precision_loss)]
        let average = value as f64 / rollouts as f64;
        average
    }
}

/// Plays uniformly random legal moves until the game ends.
///
/// A game still running after `max_length` plies, or one that is stuck
/// without legal moves, counts as a draw.
pub fn simulate<G: Game, R: Rng>(game: &mut G, max_length: usize, rng: &mut R) -> Outcome {
    for _ in 0..max_length {
        let status = game.status();
        if status.is_terminal() {
            return status;
        }
        let moves = game.legal_moves().into_iter().collect_vec();
        let Some(mv) = moves.choose(rng) else {
            return Outcome::Draw;
        };
        game.make_move(mv);
    }
    match game.status() {
        Outcome::Ongoing => Outcome::Draw,
        status => status,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::games::tictactoe::TicTacToe;

    fn board(cells: &str) -> TicTacToe {
        TicTacToe::from_cells(cells).unwrap()
    }

    #[test]
    fn prune_returns_immediate_win_alone() {
        // X to move, X wins with cell 2
        let game = board("XX.OO....");
        let moves = game.legal_moves();
        assert_eq!(prune(&game, &moves), Pruned::Winner(2));
    }

    #[test]
    fn prune_prefers_a_later_win_over_earlier_survivors() {
        // O to move, cell 1 is safe but cell 5 wins
        let game = board("X.XOO..X.");
        let moves = game.legal_moves();
        assert_eq!(prune(&game, &moves), Pruned::Winner(5));
    }

    #[test]
    fn prune_keeps_only_the_block() {
        // X to move, O threatens cell 5
        let game = board("X..OO..X.");
        let moves = game.legal_moves();
        assert_eq!(prune(&game, &moves), Pruned::Survivors(vec![5]));
    }

    #[test]
    fn single_survivor_is_returned_without_rollouts() {
        let game = board("X..OO..X.");
        let voter = RolloutVoter::new(VoteConfig::with_rollouts(1));
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert_eq!(voter.choose(&game, &mut rng), Ok(5));
    }

    #[test]
    fn no_moves_is_an_error() {
        let game = board("XOXXOOOXX");
        let voter = RolloutVoter::default();
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert_eq!(voter.choose(&game, &mut rng), Err(VoteError::NoLegalMoves));
    }

    #[test]
    fn simulate_does_not_touch_the_caller_state() {
        let game = TicTacToe::new();
        let voter = RolloutVoter::new(VoteConfig::with_rollouts(20));
        let mut rng = XorShiftRng::seed_from_u64(9);
        let _ = voter.choose(&game, &mut rng).unwrap();
        assert_eq!(game, TicTacToe::new());
    }

    #[test]
    fn simulate_reaches_a_terminal_state() {
        let mut rng = XorShiftRng::seed_from_u64(5);
        for _ in 0..20 {
            let mut game = TicTacToe::new();
            let outcome = simulate(&mut game, 1_000, &mut rng);
            assert!(outcome.is_terminal());
            assert_eq!(outcome, game.status());
        }
    }

    #[test]
    fn simulate_caps_rollout_length() {
        let mut rng = XorShiftRng::seed_from_u64(5);
        let mut game = TicTacToe::new();
        assert_eq!(simulate(&mut game, 2, &mut rng), Outcome::Draw);
        assert_eq!(game.legal_moves().len(), 7);
    }
}
