/*
dots.rs

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

//! Place the numbered checkpoints (dots).
//!
//! A dot is a numbered cell that the player must reach in ascending order while filling the grid.
//! Dot 1 is always the first cell of the path and the last dot is always the last cell.
//! The other dots are spread evenly along the path, so their order along the path follows their
//! numbers: the path itself proves that the puzzle can be solved.
//!
//! [`scatter`] builds placements that do not follow any path. Such placements must be verified
//! with the [`super::solver::Solver`].

use log::{Level, debug, log_enabled};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::grid::Cell;

/// Checkpoint.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dot {
    /// Dot number, starting at 1.
    pub num: usize,

    /// Cell of the dot.
    #[serde(flatten)]
    pub cell: Cell,
}

impl Dot {
    /// Create a [`Dot`] object.
    pub fn new(num: usize, cell: Cell) -> Self {
        Self { num, cell }
    }
}

/// Optional adjustment applied after the dots have been placed along the path.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementOverride {
    /// Move the dot `num` to the cell one row above, if that cell comes earlier in the path
    /// (but after the previous dot) and does not hold another dot.
    LiftDot { num: usize },
}

impl PlacementOverride {
    /// Lift of the ninth dot, used by one of the difficulty tiers.
    pub fn ninth_dot_lift() -> Self {
        PlacementOverride::LiftDot { num: 9 }
    }

    /// Apply the override to dots placed along `path`. The ascending order is preserved: if the
    /// override would break it, the dots are left untouched.
    pub fn apply(&self, dots: &mut [Dot], path: &[Cell]) {
        match self {
            PlacementOverride::LiftDot { num } => lift_dot(dots, path, *num),
        }
    }
}

fn lift_dot(dots: &mut [Dot], path: &[Cell], num: usize) {
    // Only interior dots can move
    if num < 2 || num >= dots.len() {
        return;
    }
    let i: usize = num - 1;
    let cell: Cell = dots[i].cell;
    if cell.row == 0 {
        return;
    }
    let above: Cell = Cell::new(cell.row - 1, cell.col);
    let position = |c: Cell| path.iter().position(|p| *p == c);

    let (Some(current), Some(target), Some(previous)) =
        (position(cell), position(above), position(dots[i - 1].cell))
    else {
        return;
    };
    if target < current && target > previous && !dots.iter().any(|d| d.cell == above) {
        debug!("Lifting dot #{num} from {cell} to {above}");
        dots[i].cell = above;
    }
}

/// Select `count` cells along the path and return the dots in ascending order.
///
/// The stride between two dots is `(len - 1) / (count - 1)`. The last slot of the path is
/// reserved for the last dot.
pub fn place(path: &[Cell], count: usize) -> Vec<Dot> {
    let len: usize = path.len();
    let mut dots: Vec<Dot> = Vec::with_capacity(count);
    if len < 2 || count < 2 {
        return dots;
    }
    let stride: usize = (len - 1) / (count - 1);
    let max_index: usize = len - 2;
    let mut used: HashSet<usize> = HashSet::with_capacity(count);

    dots.push(Dot::new(1, path[0]));
    used.insert(0);
    for num in 2..count {
        let mut index: usize = (stride * (num - 1)).min(max_index);
        while used.contains(&index) && index < max_index {
            index += 1;
        }
        used.insert(index);
        dots.push(Dot::new(num, path[index]));
    }
    dots.push(Dot::new(count, path[len - 1]));
    if log_enabled!(Level::Debug) {
        let mut indexes: Vec<usize> = used.iter().copied().collect();
        indexes.sort_unstable();
        debug!("Stride {stride}: dot indexes {indexes:?}");
    }
    dots
}

/// Place the first and last dots at the ends of the path, and the other dots on random cells.
///
/// The interior dots are numbered in random order, so nothing guarantees that a path visiting
/// them in ascending order exists.
pub fn scatter<R: Rng + ?Sized>(path: &[Cell], count: usize, rng: &mut R) -> Vec<Dot> {
    let len: usize = path.len();
    let mut dots: Vec<Dot> = Vec::with_capacity(count);
    if len < 2 || count < 2 {
        return dots;
    }
    let mut interior: Vec<Cell> = path[1..len - 1].to_vec();
    interior.shuffle(rng);

    dots.push(Dot::new(1, path[0]));
    for (i, cell) in interior.into_iter().take(count - 2).enumerate() {
        dots.push(Dot::new(i + 2, cell));
    }
    dots.push(Dot::new(count, path[len - 1]));
    dots
}
