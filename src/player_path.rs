/*
player_path.rs

Copyright 2025 Hervé Quatremain

This file is part of Gridstroke.

Gridstroke is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Gridstroke is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Gridstroke. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Manage the path that the player draws.
//!
//! The module applies the game rules to each new cell.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::generator::grid::{Cell, Grid};
use crate::generator::path::Path;
use crate::generator::puzzle::PuzzleResult;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum MoveError {
    /// The path must start on dot 1.
    NotStart(Cell),

    /// The cell is outside the grid.
    OutOfBounds(Cell),

    /// The cell is not next to the end of the path.
    NotAdjacent(Cell),

    /// The cell is already in the path.
    AlreadyVisited(Cell),

    /// The cell holds a dot that is not the next one.
    WrongDot { expected: usize, found: usize },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::NotStart(cell) => write!(f, "the path must start on dot 1, not {cell}"),
            MoveError::OutOfBounds(cell) => write!(f, "cell {cell} is outside the grid"),
            MoveError::NotAdjacent(cell) => {
                write!(f, "cell {cell} is not next to the end of the path")
            }
            MoveError::AlreadyVisited(cell) => write!(f, "cell {cell} is already in the path"),
            MoveError::WrongDot { expected, found } => {
                write!(f, "dot #{found} reached while dot #{expected} is expected")
            }
        }
    }
}

impl Error for MoveError {}

/// Path drawn by the player.
#[derive(Debug, Clone)]
pub struct PlayerPath {
    grid: Grid,

    /// Dot number for each dotted cell.
    dots: HashMap<Cell, usize>,

    /// Number of dots.
    num_dots: usize,

    /// Cells that the player drew so far.
    path: Path,

    /// Number of the next dot to reach.
    next_dot: usize,
}

impl PlayerPath {
    /// Create a [`PlayerPath`] object for the given puzzle.
    pub fn new(puzzle: &PuzzleResult) -> Self {
        let grid: Grid = Grid::new(puzzle.grid_size());
        Self {
            grid,
            dots: puzzle.dots().iter().map(|d| (d.cell, d.num)).collect(),
            num_dots: puzzle.dot_count(),
            path: Path::new(grid.num_cells()),
            next_dot: 1,
        }
    }

    /// Reset the object.
    pub fn clear(&mut self) {
        self.path.clear();
        self.next_dot = 1;
    }

    /// Return the cells of the path.
    pub fn cells(&self) -> &[Cell] {
        self.path.get()
    }

    /// Return the number of cells in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Return the number of the next dot to reach.
    pub fn next_dot(&self) -> usize {
        self.next_dot
    }

    /// Verify that the cell can extend the path.
    fn check(&self, cell: Cell) -> Result<(), MoveError> {
        if !self.grid.contains(cell) {
            return Err(MoveError::OutOfBounds(cell));
        }
        let dot: Option<usize> = self.dots.get(&cell).copied();
        match self.path.get_last() {
            None => {
                if dot != Some(1) {
                    return Err(MoveError::NotStart(cell));
                }
            }
            Some(last) => {
                if self.path.contains(cell) {
                    return Err(MoveError::AlreadyVisited(cell));
                }
                if !last.is_adjacent(&cell) {
                    return Err(MoveError::NotAdjacent(cell));
                }
                if let Some(num) = dot
                    && num != self.next_dot
                {
                    return Err(MoveError::WrongDot {
                        expected: self.next_dot,
                        found: num,
                    });
                }
            }
        }
        Ok(())
    }

    /// Extend the path with the given cell.
    ///
    /// # Errors
    ///
    /// Return the rule that the move breaks. The path is not modified in that case.
    pub fn push(&mut self, cell: Cell) -> Result<(), MoveError> {
        self.check(cell)?;
        if self.dots.contains_key(&cell) {
            self.next_dot += 1;
        }
        self.path.push(cell);
        Ok(())
    }

    /// Whether the path fills the grid and ends on the last dot.
    pub fn is_won(&self) -> bool {
        self.path.len() == self.grid.num_cells()
            && self
                .path
                .get_last()
                .is_some_and(|c| self.dots.get(&c) == Some(&self.num_dots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::patterns::{FamilyChoice, PatternFamily};
    use crate::generator::puzzle::{PuzzleFactory, PuzzleSpec};

    fn snake_puzzle(size: usize, dots: usize) -> PuzzleResult {
        let spec = PuzzleSpec::new(size, dots).with_family(FamilyChoice::Fixed(PatternFamily::Snake));
        PuzzleFactory::default().generate(&spec).expect("valid spec")
    }

    #[test]
    fn solution_wins() {
        let puzzle: PuzzleResult = snake_puzzle(4, 5);
        let mut player = PlayerPath::new(&puzzle);
        for cell in puzzle.solution_path() {
            assert_eq!(player.push(*cell), Ok(()));
        }
        assert!(player.is_won());
        assert_eq!(player.next_dot(), 6);
    }

    #[test]
    fn start_on_dot_one() {
        let puzzle: PuzzleResult = snake_puzzle(3, 3);
        let mut player = PlayerPath::new(&puzzle);
        assert_eq!(
            player.push(Cell::new(1, 1)),
            Err(MoveError::NotStart(Cell::new(1, 1)))
        );
        assert!(player.is_empty());
    }

    #[test]
    fn rejected_moves() {
        // Snake on 3x3 with 3 dots: (0,0), (1,1), (2,2)
        let puzzle: PuzzleResult = snake_puzzle(3, 3);
        assert_eq!(puzzle.dot_at(Cell::new(1, 1)), Some(2));
        let mut player = PlayerPath::new(&puzzle);
        assert_eq!(player.push(Cell::new(0, 0)), Ok(()));
        assert_eq!(
            player.push(Cell::new(1, 1)),
            Err(MoveError::NotAdjacent(Cell::new(1, 1)))
        );
        assert_eq!(
            player.push(Cell::new(0, 0)),
            Err(MoveError::AlreadyVisited(Cell::new(0, 0)))
        );
        assert_eq!(
            player.push(Cell::new(0, 3)),
            Err(MoveError::OutOfBounds(Cell::new(0, 3)))
        );
        assert_eq!(player.push(Cell::new(1, 0)), Ok(()));
        assert_eq!(player.push(Cell::new(2, 0)), Ok(()));
        assert_eq!(player.push(Cell::new(2, 1)), Ok(()));
        assert_eq!(
            player.push(Cell::new(2, 2)),
            Err(MoveError::WrongDot {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(player.len(), 4);
    }

    #[test]
    fn partial_path_is_not_won() {
        let puzzle: PuzzleResult = snake_puzzle(2, 2);
        let mut player = PlayerPath::new(&puzzle);
        for cell in &puzzle.solution_path()[..3] {
            assert_eq!(player.push(*cell), Ok(()));
        }
        assert!(!player.is_won());
        player.clear();
        assert!(player.is_empty());
        assert_eq!(player.next_dot(), 1);
    }
}
