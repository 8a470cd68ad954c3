/*
validator.rs

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

//! Certify candidate paths.
//!
//! A path is certified when every consecutive pair of cells is one grid step apart (adjacency)
//! and when it visits every cell of the grid exactly once (coverage).
//! The validator never repairs a path.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use super::dots::Dot;
use super::grid::{Cell, Grid};

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum ValidationError {
    /// The cells at `index` and `index + 1` are not adjacent.
    NotAdjacent { index: usize, from: Cell, to: Cell },

    /// The path does not have one cell per grid cell.
    WrongLength { expected: usize, found: usize },

    /// The path goes outside the grid.
    OutOfBounds(Cell),

    /// The path visits the same cell twice.
    Duplicate(Cell),

    /// The checkpoints do not follow the path.
    BadDots(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::NotAdjacent { index, from, to } => {
                write!(f, "cells {from} and {to} at index {index} are not adjacent")
            }
            ValidationError::WrongLength { expected, found } => {
                write!(f, "path has {found} cells instead of {expected}")
            }
            ValidationError::OutOfBounds(cell) => write!(f, "cell {cell} is outside the grid"),
            ValidationError::Duplicate(cell) => write!(f, "cell {cell} is visited twice"),
            ValidationError::BadDots(msg) => write!(f, "invalid checkpoints: {msg}"),
        }
    }
}

impl Error for ValidationError {}

/// Certify that the path is adjacency-valid and covers the `size` x `size` grid.
///
/// # Errors
///
/// Return the first violation found. Adjacency is checked before coverage.
pub fn certify(path: &[Cell], size: usize) -> Result<(), ValidationError> {
    for (index, pair) in path.windows(2).enumerate() {
        if !pair[0].is_adjacent(&pair[1]) {
            return Err(ValidationError::NotAdjacent {
                index,
                from: pair[0],
                to: pair[1],
            });
        }
    }

    let grid: Grid = Grid::new(size);
    if path.len() != grid.num_cells() {
        return Err(ValidationError::WrongLength {
            expected: grid.num_cells(),
            found: path.len(),
        });
    }

    let mut seen: HashSet<Cell> = HashSet::with_capacity(path.len());
    for cell in path {
        if !grid.contains(*cell) {
            return Err(ValidationError::OutOfBounds(*cell));
        }
        if !seen.insert(*cell) {
            return Err(ValidationError::Duplicate(*cell));
        }
    }
    Ok(())
}

/// Verify that the dots are numbered from 1, sit on the path, start and end it, and appear in
/// ascending order along it.
///
/// # Errors
///
/// Return [`ValidationError::BadDots`] with a description of the first problem.
pub fn certify_dots(dots: &[Dot], path: &[Cell]) -> Result<(), ValidationError> {
    if dots.len() < 2 {
        return Err(ValidationError::BadDots(format!(
            "{} dots, at least 2 required",
            dots.len()
        )));
    }
    let mut previous: Option<usize> = None;
    for (i, dot) in dots.iter().enumerate() {
        if dot.num != i + 1 {
            return Err(ValidationError::BadDots(format!(
                "dot #{} found at position {}",
                dot.num,
                i + 1
            )));
        }
        let index: usize = path
            .iter()
            .position(|c| *c == dot.cell)
            .ok_or_else(|| ValidationError::BadDots(format!("dot #{} is off the path", dot.num)))?;
        if previous.is_some_and(|p| index <= p) {
            return Err(ValidationError::BadDots(format!(
                "dot #{} comes before dot #{} along the path",
                dot.num,
                dot.num - 1
            )));
        }
        previous = Some(index);
    }
    if dots[0].cell != path[0] {
        return Err(ValidationError::BadDots(
            "dot #1 is not the first cell".to_string(),
        ));
    }
    if previous != Some(path.len() - 1) {
        return Err(ValidationError::BadDots(format!(
            "dot #{} is not the last cell",
            dots.len()
        )));
    }
    Ok(())
}
