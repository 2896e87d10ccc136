use std::str::FromStr;

use enum_map::EnumMap;
use thiserror::Error;

use crate::{Cell, CellKind, Direction, Directions, Maze, ALL_DIRECTIONS};

pub const DEFAULT_NODE_DISTANCE: u32 = 8;

pub const SMALL_LAYOUT: &str = "\
###################
#o.......#.......o#
#.##.###.#.###.##.#
#.................#
#.##.#.#####.#.##.#
#....#...G...#....#
####.### # ###.####
    .#G     G#.    
####.# ##### #.####
#........P........#
#.##.###.#.###.##.#
#o.......#.......o#
###################";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout is empty")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("maze has no agent start")]
    MissingStart,

    #[error("maze dimensions exceed {max}x{max}", max = u16::MAX)]
    TooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Open,
}

/// A rectangular maze parsed from ASCII art.
///
/// `#` is a wall, `.` a pill, `o` a power pill, ` ` an empty corridor,
/// `P` the agent start and `G` a predator start. Rows whose edge cells are
/// both open wrap around, as do columns.
#[derive(Debug, Clone)]
pub struct GridMaze {
    width: u16,
    height: u16,
    tiles: Vec<Tile>,
    neighbors: Vec<EnumMap<Direction, Option<Cell>>>,
    pills: Vec<Cell>,
    power_pills: Vec<Cell>,
    agent_start: Cell,
    ghost_starts: Vec<Cell>,
    node_distance: u32,
}

impl GridMaze {
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let rows = match rows.iter().rposition(|row| !row.is_empty()) {
            Some(last) => &rows[..=last],
            None => return Err(MazeError::Empty),
        };

        let expected = rows[0].chars().count();
        if expected > u16::MAX as usize || rows.len() > u16::MAX as usize {
            return Err(MazeError::TooLarge);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        let mut pills = Vec::new();
        let mut power_pills = Vec::new();
        let mut ghost_starts = Vec::new();
        let mut agent_start = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != expected {
                return Err(MazeError::RaggedRow {
                    row: y,
                    found,
                    expected,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let cell = Cell::new(x as u16, y as u16);
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' => {
                        pills.push(cell);
                        Tile::Open
                    }
                    'o' => {
                        power_pills.push(cell);
                        Tile::Open
                    }
                    ' ' => Tile::Open,
                    'P' => {
                        agent_start = Some(cell);
                        Tile::Open
                    }
                    'G' => {
                        ghost_starts.push(cell);
                        Tile::Open
                    }
                    _ => return Err(MazeError::UnknownGlyph { glyph, x, y }),
                };
                tiles.push(tile);
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let mut maze = Self {
            width: expected as u16,
            height: rows.len() as u16,
            tiles,
            neighbors: Vec::new(),
            pills,
            power_pills,
            agent_start: agent_start.ok_or(MazeError::MissingStart)?,
            ghost_starts,
            node_distance: DEFAULT_NODE_DISTANCE,
        };
        maze.neighbors = maze.compute_neighbors();
        Ok(maze)
    }

    #[must_use]
    pub fn with_node_distance(mut self, node_distance: u32) -> Self {
        self.node_distance = node_distance;
        self
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn pills(&self) -> &[Cell] {
        &self.pills
    }

    #[must_use]
    pub fn power_pills(&self) -> &[Cell] {
        &self.power_pills
    }

    #[must_use]
    pub const fn agent_start(&self) -> Cell {
        self.agent_start
    }

    #[must_use]
    pub fn ghost_starts(&self) -> &[Cell] {
        &self.ghost_starts
    }

    #[must_use]
    pub fn index(&self, cell: Cell) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.contains(cell) && self.tiles[self.index(cell)] == Tile::Open
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(|cell| self.is_open(*cell))
    }

    fn step(&self, cell: Cell, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        let x = (i32::from(cell.x) + dx).rem_euclid(i32::from(self.width));
        let y = (i32::from(cell.y) + dy).rem_euclid(i32::from(self.height));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cell = Cell::new(x as u16, y as u16);
        cell
    }

    fn compute_neighbors(&self) -> Vec<EnumMap<Direction, Option<Cell>>> {
        let mut neighbors = vec![EnumMap::default(); self.tiles.len()];
        for cell in self.open_cells() {
            let entry = &mut neighbors[self.index(cell)];
            for dir in ALL_DIRECTIONS {
                let next = self.step(cell, dir);
                if next != cell && self.is_open(next) {
                    entry[dir] = Some(next);
                }
            }
        }
        neighbors
    }
}

impl FromStr for GridMaze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Maze for GridMaze {
    type Position = Cell;

    fn kind(&self, pos: Cell) -> CellKind {
        if !self.is_open(pos) {
            CellKind::Wall
        } else if self.is_junction(pos) {
            CellKind::Junction
        } else {
            CellKind::Corridor
        }
    }

    fn neighbor(&self, pos: Cell, dir: Direction) -> Option<Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.neighbors[self.index(pos)][dir]
    }

    fn possible_directions(&self, pos: Cell) -> Directions {
        ALL_DIRECTIONS
            .into_iter()
            .filter(|dir| self.neighbor(pos, *dir).is_some())
            .collect()
    }

    fn node_distance(&self) -> u32 {
        self.node_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS: &str = "\
#####
##.##
#.P.#
##.##
#####";

    #[test]
    fn parses_small_layout() {
        let maze = GridMaze::parse(SMALL_LAYOUT).unwrap();
        assert_eq!(maze.width(), 19);
        assert_eq!(maze.height(), 13);
        assert_eq!(maze.agent_start(), Cell::new(9, 9));
        assert_eq!(maze.ghost_starts().len(), 3);
        assert_eq!(maze.power_pills().len(), 4);
        assert!(!maze.pills().is_empty());
    }

    #[test]
    fn classifies_cells() {
        let maze = GridMaze::parse(PLUS).unwrap();
        assert_eq!(maze.kind(Cell::new(0, 0)), CellKind::Wall);
        assert_eq!(maze.kind(Cell::new(2, 2)), CellKind::Junction);
        assert_eq!(maze.kind(Cell::new(1, 2)), CellKind::Corridor);
        assert_eq!(maze.possible_directions(Cell::new(2, 2)).len(), 4);
        assert_eq!(
            maze.possible_directions(Cell::new(1, 2)).into_vec(),
            vec![Direction::Right]
        );
    }

    #[test]
    fn neighbors_stop_at_walls() {
        let maze = GridMaze::parse(PLUS).unwrap();
        assert_eq!(
            maze.neighbor(Cell::new(2, 2), Direction::Up),
            Some(Cell::new(2, 1))
        );
        assert_eq!(maze.neighbor(Cell::new(2, 1), Direction::Up), None);
        assert_eq!(maze.neighbor(Cell::new(0, 0), Direction::Right), None);
    }

    #[test]
    fn tunnels_wrap_around() {
        let maze = GridMaze::parse(SMALL_LAYOUT).unwrap();
        assert_eq!(
            maze.neighbor(Cell::new(0, 7), Direction::Left),
            Some(Cell::new(18, 7))
        );
        assert_eq!(
            maze.neighbor(Cell::new(18, 7), Direction::Right),
            Some(Cell::new(0, 7))
        );
    }

    #[test]
    fn rejects_bad_layouts() {
        assert_eq!(GridMaze::parse("").unwrap_err(), MazeError::Empty);
        assert_eq!(
            GridMaze::parse("#P#\n##").unwrap_err(),
            MazeError::RaggedRow {
                row: 1,
                found: 2,
                expected: 3
            }
        );
        assert_eq!(
            GridMaze::parse("#P?").unwrap_err(),
            MazeError::UnknownGlyph {
                glyph: '?',
                x: 2,
                y: 0
            }
        );
        assert_eq!(GridMaze::parse("#.#").unwrap_err(), MazeError::MissingStart);
    }
}
