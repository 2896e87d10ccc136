use std::fmt;

use crate::{Game, Outcome, Player};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Tic-tac-toe with cells numbered 0-8 row-major. `X` is [`Player::One`] and moves first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TicTacToe {
    cells: [Option<Player>; 9],
    to_move: Player,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [None; 9],
            to_move: Player::One,
        }
    }

    /// Builds a position from nine glyphs (`X`, `O`, `.`). The side to move
    /// follows from the piece counts.
    #[must_use]
    pub fn from_cells(cells: &str) -> Option<Self> {
        let glyphs: Vec<char> = cells.chars().filter(|c| !c.is_whitespace()).collect();
        if glyphs.len() != 9 {
            return None;
        }
        let mut game = Self::new();
        for (idx, glyph) in glyphs.into_iter().enumerate() {
            game.cells[idx] = match glyph {
                'X' | 'x' => Some(Player::One),
                'O' | 'o' => Some(Player::Two),
                '.' => None,
                _ => return None,
            };
        }
        let count = |p| game.cells.iter().filter(|c| **c == Some(p)).count();
        let (xs, os) = (count(Player::One), count(Player::Two));
        game.to_move = match xs.checked_sub(os)? {
            0 => Player::One,
            1 => Player::Two,
            _ => return None,
        };
        Some(game)
    }

    #[must_use]
    pub fn cell(&self, idx: usize) -> Option<Player> {
        self.cells.get(idx).copied().flatten()
    }

    fn winner(&self) -> Option<Player> {
        LINES.iter().find_map(|[a, b, c]| {
            let owner = self.cells[*a]?;
            (self.cells[*b] == Some(owner) && self.cells[*c] == Some(owner)).then_some(owner)
        })
    }
}

impl Game for TicTacToe {
    type Move = usize;
    type MoveList = Vec<usize>;

    fn status(&self) -> Outcome {
        match self.winner() {
            Some(player) => Outcome::win_for(player),
            None if self.cells.iter().all(Option::is_some) => Outcome::Draw,
            None => Outcome::Ongoing,
        }
    }

    fn current_player(&self) -> Player {
        self.to_move
    }

    fn player_tag(&self, player: Player) -> &'static str {
        match player {
            Player::One => "X",
            Player::Two => "O",
        }
    }

    fn legal_moves(&self) -> Vec<usize> {
        if self.status().is_terminal() {
            return Vec::new();
        }
        (0..9).filter(|idx| self.cells[*idx].is_none()).collect()
    }

    fn is_move_valid(&self, mv: &usize) -> bool {
        *mv < 9 && self.cells[*mv].is_none() && !self.status().is_terminal()
    }

    fn make_move(&mut self, mv: &usize) {
        debug_assert!(self.is_move_valid(mv), "illegal move {mv}");
        self.cells[*mv] = Some(self.to_move);
        self.to_move = self.to_move.opponent();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn move_for_coordinate(&self, x: f32, y: f32) -> Option<usize> {
        if !(0.0..1.0).contains(&x) || !(0.0..1.0).contains(&y) {
            return None;
        }
        let mv = (y * 3.0) as usize * 3 + (x * 3.0) as usize;
        self.is_move_valid(&mv).then_some(mv)
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let glyph = match self.cells[row * 3 + col] {
                    Some(player) => self.player_tag(player),
                    None => ".",
                };
                write!(f, "{glyph}")?;
            }
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_to_move_follows_piece_counts() {
        let game = TicTacToe::from_cells("X........").unwrap();
        assert_eq!(game.current_player(), Player::Two);
        let game = TicTacToe::from_cells("XO.......").unwrap();
        assert_eq!(game.current_player(), Player::One);
        assert!(TicTacToe::from_cells("XX.......").is_none());
        assert!(TicTacToe::from_cells("O........").is_none());
        assert!(TicTacToe::from_cells("X.").is_none());
    }

    #[test]
    fn detects_every_line() {
        for line in LINES {
            let mut game = TicTacToe::new();
            for idx in line {
                game.cells[idx] = Some(Player::Two);
            }
            assert_eq!(game.status(), Outcome::PlayerTwo);
            assert!(game.legal_moves().is_empty());
        }
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let game = TicTacToe::from_cells("XOXXOOOXX").unwrap();
        assert_eq!(game.status(), Outcome::Draw);
    }

    #[test]
    fn coordinates_map_to_cells() {
        let game = TicTacToe::from_cells("X........").unwrap();
        assert_eq!(game.move_for_coordinate(0.1, 0.1), None);
        assert_eq!(game.move_for_coordinate(0.5, 0.5), Some(4));
        assert_eq!(game.move_for_coordinate(0.9, 0.4), Some(5));
        assert_eq!(game.move_for_coordinate(1.0, 0.4), None);
    }

    #[test]
    fn display_uses_player_tags() {
        let game = TicTacToe::from_cells("X...O....").unwrap();
        assert_eq!(game.to_string(), "X..\n.O.\n...");
    }
}
