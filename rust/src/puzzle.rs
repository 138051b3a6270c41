//! Sliding-tile puzzle states for best-first search.
//!
//! The goal layout is `0, 1, ..., n²-1` in row-major order, with the blank
//! (tile `0`) in the top-left corner.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use crate::search::SearchProblem;

/// Largest supported board width (tiles are stored as `u8`).
pub const MAX_WIDTH: usize = 16;

/// Errors raised when building a puzzle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Board width must be between 2 and 16, got {0}")]
    InvalidWidth(usize),
    #[error("Expected {expected} tiles, got {actual}")]
    WrongTileCount { expected: usize, actual: usize },
    #[error("Tiles must be a permutation of 0..{0}")]
    NotAPermutation(usize),
}

/// Direction the blank moves in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];
}

/// A puzzle configuration: tile layout plus the blank's position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: Vec<u8>,
    blank: usize,
}

impl Board {
    /// The solved layout for a `width`×`width` board.
    pub fn goal(width: usize) -> Self {
        Self {
            tiles: (0..width * width).map(|t| t as u8).collect(),
            blank: 0,
        }
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    fn can_move(&self, width: usize, dir: Direction) -> bool {
        let (row, col) = (self.blank / width, self.blank % width);
        match dir {
            Direction::Right => col < width - 1,
            Direction::Left => col > 0,
            Direction::Up => row > 0,
            Direction::Down => row < width - 1,
        }
    }

    /// The board after sliding the blank one step, if that stays on the board.
    pub fn moved(&self, width: usize, dir: Direction) -> Option<Self> {
        if !self.can_move(width, dir) {
            return None;
        }
        let target = match dir {
            Direction::Right => self.blank + 1,
            Direction::Left => self.blank - 1,
            Direction::Up => self.blank - width,
            Direction::Down => self.blank + width,
        };
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(Self {
            tiles,
            blank: target,
        })
    }

    /// Sum of Manhattan distances of every non-blank tile to its goal slot.
    pub fn manhattan(&self, width: usize) -> i32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != 0)
            .map(|(pos, &t)| {
                let goal = t as usize;
                (pos % width).abs_diff(goal % width) + (pos / width).abs_diff(goal / width)
            })
            .sum::<usize>() as i32
    }

    fn inversions(&self) -> usize {
        let tiles: Vec<u8> = self.tiles.iter().copied().filter(|&t| t != 0).collect();
        let mut count = 0;
        for (i, &a) in tiles.iter().enumerate() {
            count += tiles[i + 1..].iter().filter(|&&b| b < a).count();
        }
        count
    }
}

/// A sliding-tile puzzle instance.
#[derive(Clone, Debug)]
pub struct SlidingPuzzle {
    width: usize,
    start: Board,
}

impl SlidingPuzzle {
    /// Build a puzzle from a row-major tile layout (`0` is the blank).
    pub fn new(width: usize, tiles: Vec<u8>) -> Result<Self, PuzzleError> {
        if !(2..=MAX_WIDTH).contains(&width) {
            return Err(PuzzleError::InvalidWidth(width));
        }
        let expected = width * width;
        if tiles.len() != expected {
            return Err(PuzzleError::WrongTileCount {
                expected,
                actual: tiles.len(),
            });
        }
        let mut seen = vec![false; expected];
        for &t in &tiles {
            match seen.get_mut(t as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(PuzzleError::NotAPermutation(expected)),
            }
        }
        let blank = tiles
            .iter()
            .position(|&t| t == 0)
            .ok_or(PuzzleError::NotAPermutation(expected))?;
        Ok(Self {
            width,
            start: Board { tiles, blank },
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the goal layout is reachable from the start layout.
    ///
    /// Odd widths: inversion count must be even. Even widths: inversions plus
    /// the blank's row must be even (the goal has the blank in row 0).
    pub fn is_solvable(&self) -> bool {
        let inversions = self.start.inversions();
        if self.width % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.start.blank / self.width) % 2 == 0
        }
    }
}

impl SearchProblem for SlidingPuzzle {
    type State = Board;

    fn start(&self) -> &Board {
        &self.start
    }

    fn is_goal(&self, state: &Board) -> bool {
        state.tiles.iter().enumerate().all(|(i, &t)| i == t as usize)
    }

    fn successors(&self, state: &Board) -> Vec<(Board, i32)> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| state.moved(self.width, dir))
            .map(|board| (board, 1))
            .collect()
    }

    fn heuristic(&self, state: &Board) -> i32 {
        state.manhattan(self.width)
    }
}

/// Generate a solvable puzzle by walking the blank `moves` random steps from the goal.
pub fn scramble(width: usize, moves: usize, seed: u64) -> Result<SlidingPuzzle, PuzzleError> {
    if !(2..=MAX_WIDTH).contains(&width) {
        return Err(PuzzleError::InvalidWidth(width));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::goal(width);
    for _ in 0..moves {
        let options: Vec<Board> = Direction::ALL
            .iter()
            .filter_map(|&dir| board.moved(width, dir))
            .collect();
        if let Some(next) = options.choose(&mut rng) {
            board = next.clone();
        }
    }
    SlidingPuzzle::new(width, board.tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::search::best_first_search;

    #[test]
    fn test_goal_layout() {
        let puzzle = SlidingPuzzle::new(3, Board::goal(3).tiles).unwrap();
        assert!(puzzle.is_goal(puzzle.start()));
        assert_eq!(puzzle.heuristic(puzzle.start()), 0);
        assert!(puzzle.is_solvable());
    }

    #[test]
    fn test_corner_blank_has_two_moves() {
        let puzzle = SlidingPuzzle::new(3, Board::goal(3).tiles).unwrap();
        let next = puzzle.successors(puzzle.start());
        assert_eq!(next.len(), 2);
        assert!(next.iter().all(|(_, step)| *step == 1));
    }

    #[test]
    fn test_manhattan_distance() {
        // 1 and 0 swapped: tile 1 is one column away from home.
        let puzzle = SlidingPuzzle::new(2, vec![1, 0, 2, 3]).unwrap();
        assert_eq!(puzzle.heuristic(puzzle.start()), 1);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert_eq!(
            SlidingPuzzle::new(1, vec![0]).unwrap_err(),
            PuzzleError::InvalidWidth(1)
        );
        assert_eq!(
            SlidingPuzzle::new(2, vec![0, 1, 2]).unwrap_err(),
            PuzzleError::WrongTileCount {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            SlidingPuzzle::new(2, vec![0, 1, 1, 3]).unwrap_err(),
            PuzzleError::NotAPermutation(4)
        );
        assert_eq!(
            SlidingPuzzle::new(2, vec![0, 1, 2, 9]).unwrap_err(),
            PuzzleError::NotAPermutation(4)
        );
    }

    #[test]
    fn test_unsolvable_detected() {
        // Swapping two non-blank tiles flips the parity.
        let puzzle = SlidingPuzzle::new(3, vec![0, 2, 1, 3, 4, 5, 6, 7, 8]).unwrap();
        assert!(!puzzle.is_solvable());
        let puzzle = SlidingPuzzle::new(4, {
            let mut tiles = Board::goal(4).tiles;
            tiles.swap(14, 15);
            tiles
        })
        .unwrap();
        assert!(!puzzle.is_solvable());
    }

    #[test]
    fn test_scramble_is_deterministic_and_solvable() {
        let a = scramble(4, 30, 7).unwrap();
        let b = scramble(4, 30, 7).unwrap();
        assert_eq!(a.start(), b.start());
        assert!(a.is_solvable());
    }

    #[test]
    fn test_solves_scrambled_eight_puzzle() {
        let puzzle = scramble(3, 20, 42).unwrap();
        let outcome = best_first_search(&puzzle, &SearchConfig::default())
            .unwrap()
            .unwrap();
        // Optimal cost cannot exceed the scramble length and shares its parity.
        assert!(outcome.cost <= 20);
        assert_eq!(outcome.cost % 2, 0);
        assert_eq!(outcome.path.len() as i32, outcome.cost + 1);
        assert_eq!(outcome.path.first(), Some(puzzle.start()));
        assert!(puzzle.is_goal(outcome.path.last().unwrap()));
        for pair in outcome.path.windows(2) {
            assert!(puzzle
                .successors(&pair[0])
                .iter()
                .any(|(next, _)| *next == pair[1]));
        }
    }

    #[test]
    fn test_one_move_from_goal() {
        let puzzle = SlidingPuzzle::new(3, vec![3, 1, 2, 0, 4, 5, 6, 7, 8]).unwrap();
        let outcome = best_first_search(&puzzle, &SearchConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(outcome.cost, 1);
    }
}
