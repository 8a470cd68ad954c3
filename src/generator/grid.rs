/*
grid.rs

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

//! Square grid geometry.
//!
//! Cells are identified by their `(row, col)` coordinates. The [`Grid`] object only knows the
//! size of the grid; it answers bounds and adjacency questions and converts cells to linear
//! indexes (`row * size + col`) for the algorithms that store per-cell data in vectors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid cell.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// Create a [`Cell`] object.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells.
    pub fn distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two cells share an edge.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Moving directions on the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All the directions, in the order used by [`Grid::neighbors`].
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row and column offsets.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Opposite direction.
    pub fn reverse(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Direction after a quarter turn clockwise.
    pub fn turn_right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Whether the direction moves along a row.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Square grid of `size` x `size` cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    /// Create a [`Grid`] object.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.size * self.size
    }

    /// Whether the signed coordinates are inside the grid.
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Whether the cell is inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Return the adjacent cell in the given direction, if it exists.
    pub fn step(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let row: isize = cell.row as isize + dr;
        let col: isize = cell.col as isize + dc;
        if self.in_bounds(row, col) {
            Some(Cell::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Return the in-bounds neighbors of the cell (up, right, down, left).
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        Direction::ALL
            .iter()
            .filter_map(|d| self.step(cell, *d))
            .collect()
    }

    /// Linear index of the cell.
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.size + cell.col
    }

    /// Cell at the given linear index.
    pub fn cell(&self, index: usize) -> Cell {
        Cell::new(index / self.size, index % self.size)
    }

    /// Iterate over all the cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.num_cells()).map(|i| self.cell(i))
    }
}
