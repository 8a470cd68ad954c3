/*
solver.rs

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

//! Verify that a dot assignment can be solved.
//!
//! The [`Solver`] searches for a path that starts at dot 1, visits every cell once, reaches the
//! dots in ascending order, and ends at the last dot.
//! The search is a depth-first search over the cell indexes. Instead of recursing, it keeps an
//! explicit stack of frames, one per cell in the current path.
//!
//! The search can take a very long time on large grids, so it stops after the given time budget.
//! The elapsed time is only checked every [`Solver::check_interval`] moves.

use log::{Level, debug, log_enabled};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use super::dots::Dot;
use super::grid::{Cell, Grid};
use crate::config::DEFAULT_CHECK_INTERVAL;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SolverError {
    /// No possible path.
    NoSolution,

    /// No path found before the timeout.
    Timeout,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::NoSolution => write!(f, "the puzzle has no solution"),
            SolverError::Timeout => write!(f, "no solution found before the timeout"),
        }
    }
}

impl Error for SolverError {}

/// Stack frame: one cell of the path being built.
struct Frame {
    /// Cell index.
    cell: usize,

    /// Position of the next neighbor to try in [`Solver::neighbors`].
    next: usize,

    /// Whether entering the cell advanced the expected dot number.
    advanced: bool,
}

/// [`Solver`] object.
pub struct Solver {
    /// Grid to fill.
    pub grid: Grid,

    /// Check the elapsed time every `check_interval` moves.
    pub check_interval: usize,

    /// Number of moves of the last search.
    pub iteration: usize,

    /// Duration in seconds of the last search.
    pub duration: f32,

    /// For each cell index, the indexes of the adjacent cells.
    neighbors: Vec<Vec<usize>>,

    /// For each cell index, the dot number of the cell if any.
    dot_at: Vec<Option<usize>>,

    /// Cell index of dot 1.
    start_cell: Option<usize>,

    /// Number of dots.
    num_dots: usize,

    /// Time when the search started. Used to compute the [`Solver::duration`].
    start: Instant,
}

impl Solver {
    /// Create the object.
    ///
    /// An inconsistent dot list (missing or duplicated numbers, cells outside the grid, two dots
    /// on the same cell, fewer than two dots) makes every search fail with
    /// [`SolverError::NoSolution`].
    pub fn new(size: usize, dots: &[Dot]) -> Self {
        let grid: Grid = Grid::new(size);
        let neighbors: Vec<Vec<usize>> = grid
            .cells()
            .map(|c| grid.neighbors(c).iter().map(|n| grid.index(*n)).collect())
            .collect();

        let mut dot_at: Vec<Option<usize>> = vec![None; grid.num_cells()];
        let mut seen: Vec<bool> = vec![false; dots.len() + 1];
        let mut consistent: bool = dots.len() >= 2;
        for dot in dots {
            if !grid.contains(dot.cell) || dot.num == 0 || dot.num > dots.len() || seen[dot.num] {
                consistent = false;
                break;
            }
            let index: usize = grid.index(dot.cell);
            if dot_at[index].is_some() {
                consistent = false;
                break;
            }
            seen[dot.num] = true;
            dot_at[index] = Some(dot.num);
        }

        let start_cell: Option<usize> = if consistent {
            dot_at.iter().position(|d| *d == Some(1))
        } else {
            debug!("Inconsistent dot list: {dots:?}");
            None
        };

        Self {
            grid,
            check_interval: DEFAULT_CHECK_INTERVAL,
            iteration: 0,
            duration: 0.0,
            neighbors,
            dot_at,
            start_cell,
            num_dots: dots.len(),
            start: Instant::now(),
        }
    }

    /// Search for a path that solves the puzzle.
    ///
    /// # Errors
    ///
    /// The method returns [`SolverError::NoSolution`] when the whole search space has been
    /// explored, and [`SolverError::Timeout`] when `budget` has elapsed first.
    pub fn solve(&mut self, budget: Duration) -> Result<Vec<Cell>, SolverError> {
        self.iteration = 0;
        self.duration = 0.0;
        self.start = Instant::now();

        let res: Result<Vec<usize>, SolverError> = match self.start_cell {
            Some(start_cell) => self.search(start_cell, budget),
            None => Err(SolverError::NoSolution),
        };

        self.duration = self.start.elapsed().as_secs_f32();
        debug!(
            "Iterations = {}  Duration = {}  Result = {:?}",
            self.iteration,
            self.duration,
            res.as_ref().map(|p| p.len())
        );
        res.map(|path| path.into_iter().map(|i| self.grid.cell(i)).collect())
    }

    fn search(&mut self, start_cell: usize, budget: Duration) -> Result<Vec<usize>, SolverError> {
        let total: usize = self.grid.num_cells();
        let check_interval: usize = self.check_interval.max(1);
        let mut visited: Vec<bool> = vec![false; total];
        let mut path: Vec<usize> = Vec::with_capacity(total);
        let mut stack: Vec<Frame> = Vec::with_capacity(total);
        // Dot 1 is the fixed start
        let mut expected: usize = 2;

        visited[start_cell] = true;
        path.push(start_cell);
        stack.push(Frame {
            cell: start_cell,
            next: 0,
            advanced: false,
        });

        while let Some(frame) = stack.last_mut() {
            if path.len() == total && expected > self.num_dots {
                return Ok(path);
            }

            // Either all the neighbors have been tried, or the grid is full without the last
            // dot: go back
            if path.len() == total || frame.next >= self.neighbors[frame.cell].len() {
                if let Some(f) = stack.pop() {
                    visited[f.cell] = false;
                    path.pop();
                    if f.advanced {
                        expected -= 1;
                    }
                }
                continue;
            }

            let current: usize = frame.cell;
            let next_cell: usize = self.neighbors[current][frame.next];
            frame.next += 1;

            if visited[next_cell] {
                continue;
            }
            let advanced: bool = match self.dot_at[next_cell] {
                None => false,
                Some(num) if num == expected => {
                    // The last dot must be the last cell
                    if num == self.num_dots && path.len() + 1 != total {
                        continue;
                    }
                    true
                }
                Some(_) => continue,
            };
            if self.strands_neighbor(current, next_cell, &visited) {
                continue;
            }

            self.iteration += 1;
            if self.iteration % check_interval == 0 && self.start.elapsed() >= budget {
                if log_enabled!(Level::Debug) {
                    debug!(
                        "Timeout after {} iterations with {} of {total} cells",
                        self.iteration,
                        path.len()
                    );
                }
                return Err(SolverError::Timeout);
            }

            visited[next_cell] = true;
            path.push(next_cell);
            if advanced {
                expected += 1;
            }
            stack.push(Frame {
                cell: next_cell,
                next: 0,
                advanced,
            });
        }
        Err(SolverError::NoSolution)
    }

    /// Whether moving from `from` to `to` leaves an unvisited neighbor of `from` without any
    /// unvisited neighbor, while not being adjacent to `to`. Such a cell can never be reached.
    fn strands_neighbor(&self, from: usize, to: usize, visited: &[bool]) -> bool {
        self.neighbors[from]
            .iter()
            .filter(|u| **u != to && !visited[**u])
            .any(|u| {
                !self.neighbors[*u].contains(&to)
                    && self.neighbors[*u]
                        .iter()
                        .all(|w| *w == to || *w == from || visited[*w])
            })
    }
}

/// Search for a solution of the puzzle defined by `dots` on a `size` x `size` grid, within the
/// given time budget.
///
/// # Errors
///
/// See [`Solver::solve`].
pub fn verify(dots: &[Dot], size: usize, budget: Duration) -> Result<Vec<Cell>, SolverError> {
    Solver::new(size, dots).solve(budget)
}

#[cfg(test)]
mod tests {
    use super::super::dots::place;
    use super::super::patterns::snake;
    use super::super::validator::{certify, certify_dots};
    use super::*;

    const BUDGET: Duration = Duration::from_secs(10);

    fn dots(list: &[(usize, usize)]) -> Vec<Dot> {
        list.iter()
            .enumerate()
            .map(|(i, (r, c))| Dot::new(i + 1, Cell::new(*r, *c)))
            .collect()
    }

    #[test]
    fn solves_three_dots_on_four() {
        let d: Vec<Dot> = dots(&[(0, 0), (1, 3), (3, 0)]);
        let path: Vec<Cell> = verify(&d, 4, BUDGET).expect("solvable");
        assert_eq!(path.len(), 16);
        assert_eq!(path[0], Cell::new(0, 0));
        assert_eq!(path[15], Cell::new(3, 0));
        assert!(path.contains(&Cell::new(1, 3)));
        assert_eq!(certify(&path, 4), Ok(()));
        assert_eq!(certify_dots(&d, &path), Ok(()));
    }

    #[test]
    fn solves_evenly_placed_dots() {
        for size in 2..=5 {
            let path: Vec<Cell> = snake(size).into_vec();
            let d: Vec<Dot> = place(&path, size + 1);
            let solution: Vec<Cell> = verify(&d, size, BUDGET).expect("solvable");
            assert_eq!(certify(&solution, size), Ok(()));
            assert_eq!(certify_dots(&d, &solution), Ok(()));
        }
    }

    #[test]
    fn pocket_has_no_solution() {
        // The corner (0,0) can only be entered between dots 2 and 4, with dot 3 elsewhere
        let d: Vec<Dot> = dots(&[(3, 3), (0, 1), (2, 2), (1, 0), (3, 0)]);
        assert_eq!(verify(&d, 4, BUDGET), Err(SolverError::NoSolution));
    }

    #[test]
    fn same_color_ends_have_no_solution() {
        let d: Vec<Dot> = dots(&[(0, 0), (3, 3)]);
        assert_eq!(verify(&d, 4, BUDGET), Err(SolverError::NoSolution));
    }

    #[test]
    fn last_dot_must_end_the_path() {
        // (0,1) would be reached early on any path: it can only be the last cell if the path
        // ends there, which the 3x3 coloring forbids
        let d: Vec<Dot> = dots(&[(0, 0), (0, 1)]);
        assert_eq!(verify(&d, 3, BUDGET), Err(SolverError::NoSolution));
    }

    #[test]
    fn inconsistent_dots_have_no_solution() {
        let missing_one: Vec<Dot> = vec![
            Dot::new(2, Cell::new(0, 0)),
            Dot::new(3, Cell::new(1, 0)),
        ];
        assert_eq!(verify(&missing_one, 3, BUDGET), Err(SolverError::NoSolution));

        let outside: Vec<Dot> = dots(&[(0, 0), (5, 5)]);
        assert_eq!(verify(&outside, 3, BUDGET), Err(SolverError::NoSolution));

        let shared: Vec<Dot> = dots(&[(0, 0), (0, 0)]);
        assert_eq!(verify(&shared, 3, BUDGET), Err(SolverError::NoSolution));
    }

    #[test]
    fn zero_budget_times_out() {
        // Same-color ends on an even grid: unsolvable, with a huge search space
        let d: Vec<Dot> = dots(&[(0, 0), (7, 7)]);
        let mut solver: Solver = Solver::new(8, &d);
        solver.check_interval = 16;
        assert_eq!(solver.solve(Duration::ZERO), Err(SolverError::Timeout));
        assert_eq!(solver.iteration, 16);
    }
}
