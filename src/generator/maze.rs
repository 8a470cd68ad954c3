/*
maze.rs

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

//! Randomized walks: the maze and labyrinth pattern families.
//!
//! Both walks try hard to visit every cell, but neither of them is guaranteed to succeed.
//! When they give up, they append the remaining cells in a way that breaks the adjacency of the
//! path, so that the validator rejects the result and the caller falls back to the snake.

use log::{Level, debug, log_enabled};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::cmp::Reverse;

use super::grid::{Cell, Direction, Grid};
use super::path::Path;
use super::patterns::{free_step, nearest_unvisited};

/// The backtracking walk gives up after `MAZE_STEP_FACTOR * number of cells` moves.
const MAZE_STEP_FACTOR: usize = 64;

/// Probability of offering a two-cell straight jump in addition to the single step.
const JUMP_PROBABILITY: f64 = 0.25;

/// Probability of offering a three-cell U-turn (mini-spiral) in addition to the single step.
const SPIRAL_PROBABILITY: f64 = 0.15;

/// The walks rotate the tail of a stuck path at most `ROTATION_FACTOR * number of cells`
/// times.
const ROTATION_FACTOR: usize = 16;

/// Direction preferences of the labyrinth walk. The walk moves to the next phase after every
/// step, so consecutive moves favor opposite directions.
const DIRECTION_PHASES: [[Direction; 4]; 8] = [
    [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ],
    [
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Right,
    ],
    [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ],
    [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ],
    [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ],
    [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ],
    [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ],
    [
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
    ],
];

/// Stack frame of the backtracking walk.
struct Frame {
    /// Number of cells the move that created the frame added to the path.
    added: usize,

    /// Moves not tried yet. The next move to try is the last one.
    moves: Vec<Vec<Cell>>,
}

/// Return a random corner of the grid.
///
/// On odd grids, only the cells of the majority color can start a path that covers the grid.
/// Corners always have that color.
fn random_corner<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Cell {
    let last: usize = size - 1;
    match rng.random_range(0..4) {
        0 => Cell::new(0, 0),
        1 => Cell::new(0, last),
        2 => Cell::new(last, 0),
        _ => Cell::new(last, last),
    }
}

/// Number of unvisited neighbors of the cell.
fn free_degree(grid: &Grid, path: &Path, cell: Cell) -> usize {
    grid.neighbors(cell)
        .iter()
        .filter(|c| !path.contains(**c))
        .count()
}

/// Multi-phase randomized walk.
///
/// 1. Randomized backtracking walk mixing single steps, two-cell jumps, and three-cell U-turns.
/// 2. Zigzag sweep from the end of the path.
/// 3. Cleanup of the stragglers: random walk from the end of the path, rotating the tail when
///    the walk is stuck, then detour splicing of unvisited pairs of cells along a path edge.
/// 4. Row scan appending any cell still unvisited.
///
/// Phases 2 and 3 repeat while they make progress.
pub fn maze<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Path {
    if size == 0 {
        return Path::new(0);
    }
    let grid: Grid = Grid::new(size);
    let total: usize = grid.num_cells();
    let mut path: Path = Path::new(total);

    path.push(random_corner(size, rng));
    backtracking_walk(&grid, &mut path, rng);
    debug!("Maze phase 1: {} of {total} cells", path.len());

    while path.len() < total {
        let before: usize = path.len();
        zigzag_sweep(&grid, &mut path);
        random_walk(&grid, &mut path, rng);
        splice_detours(&grid, &mut path, rng);
        debug!("Maze phases 2 and 3: {} of {total} cells", path.len());
        if path.len() == before {
            break;
        }
    }

    if path.len() < total {
        debug!("Maze phase 4: {} cells left", total - path.len());
        for cell in grid.cells() {
            if !path.contains(cell) {
                path.push(cell);
            }
        }
    }
    path
}

/// List the moves from `head`, in the order they must be tried (last first).
fn candidate_moves<R: Rng + ?Sized>(
    grid: &Grid,
    path: &Path,
    head: Cell,
    rng: &mut R,
) -> Vec<Vec<Cell>> {
    let mut moves: Vec<Vec<Cell>> = Vec::with_capacity(8);

    for d in Direction::ALL {
        let Some(c1) = free_step(grid, path, head, d) else {
            continue;
        };
        moves.push(vec![c1]);

        if rng.random_bool(JUMP_PROBABILITY) {
            if let Some(c2) = free_step(grid, path, c1, d) {
                moves.push(vec![c1, c2]);
            }
        }

        if rng.random_bool(SPIRAL_PROBABILITY) {
            let side: Direction = if rng.random_bool(0.5) {
                d.turn_right()
            } else {
                d.turn_right().reverse()
            };
            if let (Some(c2), Some(c3)) = (
                free_step(grid, path, c1, side),
                free_step(grid, path, head, side),
            ) {
                moves.push(vec![c1, c2, c3]);
            }
        }
    }

    // Among equivalent moves the order is random. Moves leading to cells with few exits are
    // tried first (they end up at the end of the vector).
    moves.shuffle(rng);
    moves.sort_by_key(|m| Reverse(segment_exits(grid, path, m)));
    moves
}

/// Number of unvisited neighbors of the last cell of the segment, once the segment is in the
/// path.
fn segment_exits(grid: &Grid, path: &Path, segment: &[Cell]) -> usize {
    match segment.last() {
        Some(last) => grid
            .neighbors(*last)
            .iter()
            .filter(|c| !path.contains(**c) && !segment.contains(c))
            .count(),
        None => 0,
    }
}

/// Phase 1 of the maze: randomized depth-first walk with a step budget.
///
/// On return, `path` holds the longest path found.
fn backtracking_walk<R: Rng + ?Sized>(grid: &Grid, path: &mut Path, rng: &mut R) {
    let total: usize = grid.num_cells();
    let budget: usize = MAZE_STEP_FACTOR * total;
    let Some(start) = path.get_last() else {
        return;
    };
    let mut best: Vec<Cell> = path.get().clone();
    let mut stack: Vec<Frame> = vec![Frame {
        added: path.len(),
        moves: candidate_moves(grid, path, start, rng),
    }];
    let mut steps: usize = 0;

    while path.len() < total && steps < budget {
        steps += 1;
        let next: Option<Vec<Cell>> = match stack.last_mut() {
            Some(frame) => frame.moves.pop(),
            None => break,
        };

        match next {
            Some(segment) => {
                if segment.iter().any(|c| path.contains(*c)) {
                    continue;
                }
                let Some(&head) = segment.last() else {
                    continue;
                };
                segment.iter().for_each(|c| path.push(*c));
                let moves: Vec<Vec<Cell>> = candidate_moves(grid, path, head, rng);
                stack.push(Frame {
                    added: segment.len(),
                    moves,
                });
                if path.len() > best.len() {
                    best.clone_from(path.get());
                }
            }
            None => {
                // Never backtrack over the starting cell
                if stack.len() == 1 {
                    break;
                }
                if let Some(frame) = stack.pop() {
                    path.truncate(path.len() - frame.added);
                }
            }
        }
    }

    if log_enabled!(Level::Debug) {
        debug!(
            "Backtracking walk: {steps} steps, best length {} of {total}",
            best.len()
        );
    }
    if path.len() < best.len() {
        *path = Path::from_vec(&best);
    }
}

/// Phase 2 of the maze: keep sweeping horizontally, stepping vertically when blocked.
fn zigzag_sweep(grid: &Grid, path: &mut Path) {
    let mut horizontal: Direction = Direction::Right;
    let Some(mut head) = path.get_last() else {
        return;
    };

    loop {
        let next: Option<(Cell, bool)> = free_step(grid, path, head, horizontal)
            .map(|c| (c, false))
            .or_else(|| free_step(grid, path, head, Direction::Down).map(|c| (c, true)))
            .or_else(|| free_step(grid, path, head, Direction::Up).map(|c| (c, true)))
            .or_else(|| {
                free_step(grid, path, head, horizontal.reverse()).map(|c| (c, true))
            });
        match next {
            Some((c, turn)) => {
                path.push(c);
                head = c;
                if turn {
                    horizontal = horizontal.reverse();
                }
            }
            None => break,
        }
    }
}

/// First part of phase 3 of the maze: extend the path with random steps.
///
/// When the end of the path has no unvisited neighbor, the tail is rotated with
/// [`rotate_tail`] to get a new end, until the rotation budget is spent.
fn random_walk<R: Rng + ?Sized>(grid: &Grid, path: &mut Path, rng: &mut R) {
    let total: usize = grid.num_cells();
    let max_rotations: usize = ROTATION_FACTOR * total;
    let mut rotations: usize = 0;

    while path.len() < total {
        let Some(head) = path.get_last() else {
            break;
        };
        let free: Vec<Cell> = Direction::ALL
            .into_iter()
            .filter_map(|d| free_step(grid, path, head, d))
            .collect();
        match free.choose(rng) {
            Some(c) => path.push(*c),
            None => {
                if rotations >= max_rotations || !rotate_tail(grid, path, rng) {
                    break;
                }
                rotations += 1;
            }
        }
    }
    debug!("Random walk: {rotations} rotations, {} of {total} cells", path.len());
}

/// Rotate the tail of the path so that it ends on another cell.
///
/// If the last cell is adjacent to the cell at index `i`, reversing the cells after `i` keeps
/// the path connected, and the cell at `i + 1` becomes the last cell. Rotations ending on a cell
/// with unvisited neighbors are preferred.
/// Return `false` when no rotation is possible.
fn rotate_tail<R: Rng + ?Sized>(grid: &Grid, path: &mut Path, rng: &mut R) -> bool {
    let len: usize = path.len();
    let Some(head) = path.get_last() else {
        return false;
    };
    // The previous cell is not a pivot
    let pivots: Vec<usize> = grid
        .neighbors(head)
        .into_iter()
        .filter_map(|c| path.cell_index(c))
        .filter(|i| i + 2 < len)
        .collect();
    let open: Vec<usize> = pivots
        .iter()
        .copied()
        .filter(|i| free_degree(grid, path, path.get()[i + 1]) > 0)
        .collect();
    let pivot: Option<&usize> = if open.is_empty() {
        pivots.choose(rng)
    } else {
        open.choose(rng)
    };
    match pivot {
        Some(i) => {
            path.reverse_from(i + 1);
            true
        }
        None => false,
    }
}

/// Return the direction from `from` to the adjacent cell `to`.
fn direction_between(from: Cell, to: Cell) -> Option<Direction> {
    Direction::ALL.into_iter().find(|d| {
        let (dr, dc) = d.delta();
        from.row as isize + dr == to.row as isize && from.col as isize + dc == to.col as isize
    })
}

/// Second part of phase 3 of the maze: absorb unvisited cells with detours.
///
/// For a path edge `p -> q`, if the two cells next to `p` and `q` on the same side are
/// unvisited, the path becomes `p -> p' -> q' -> q`. The edges are scanned from a random offset
/// until no detour is possible.
fn splice_detours<R: Rng + ?Sized>(grid: &Grid, path: &mut Path, rng: &mut R) {
    let total: usize = grid.num_cells();

    while path.len() < total && path.len() >= 2 {
        let num_edges: usize = path.len() - 1;
        let offset: usize = rng.random_range(0..num_edges);
        let mut spliced: bool = false;

        for k in 0..num_edges {
            let i: usize = (offset + k) % num_edges;
            let p: Cell = path.get()[i];
            let q: Cell = path.get()[i + 1];
            let Some(edge) = direction_between(p, q) else {
                continue;
            };
            let mut sides: [Direction; 2] = [edge.turn_right(), edge.turn_right().reverse()];
            sides.shuffle(rng);
            for side in sides {
                if let (Some(p2), Some(q2)) = (
                    free_step(grid, path, p, side),
                    free_step(grid, path, q, side),
                ) {
                    path.insert(i + 1, p2);
                    path.insert(i + 2, q2);
                    spliced = true;
                    break;
                }
            }
            if spliced {
                break;
            }
        }
        if !spliced {
            break;
        }
    }
}

/// Greedy walk whose direction preferences cycle through [`DIRECTION_PHASES`].
///
/// Neighbors with at most one exit left are visited first, because they would otherwise become
/// unreachable. On a dead end, the walk rotates the tail of the path with [`rotate_tail`] to get
/// a new end. When the rotation budget is spent, it reroutes to the nearest unvisited cell through
/// a stepwise connector that skips visited cells.
pub fn labyrinth<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Path {
    if size == 0 {
        return Path::new(0);
    }
    let grid: Grid = Grid::new(size);
    let total: usize = grid.num_cells();
    let mut path: Path = Path::new(total);
    let mut phase: usize = rng.random_range(0..DIRECTION_PHASES.len());
    let max_rotations: usize = ROTATION_FACTOR * total;
    let mut rotations: usize = 0;
    let mut reroutes: usize = 0;

    path.push(random_corner(size, rng));
    while path.len() < total {
        let Some(head) = path.get_last() else {
            break;
        };

        let free: Vec<Cell> = DIRECTION_PHASES[phase]
            .into_iter()
            .filter_map(|d| free_step(&grid, &path, head, d))
            .collect();

        let next: Option<Cell> = free
            .iter()
            .map(|c| (*c, free_degree(&grid, &path, *c)))
            .filter(|(_, exits)| *exits <= 1)
            .min_by_key(|(_, exits)| *exits)
            .map(|(c, _)| c)
            .or_else(|| free.first().copied());

        match next {
            Some(c) => path.push(c),
            None => {
                if rotations < max_rotations && rotate_tail(&grid, &mut path, rng) {
                    rotations += 1;
                } else {
                    reroutes += 1;
                    reroute(&grid, &mut path, head);
                }
            }
        }
        phase = (phase + 1) % DIRECTION_PHASES.len();
    }
    debug!("Labyrinth walk done with {rotations} rotations and {reroutes} reroutes");
    path
}

/// Connect the dead end `head` to the nearest unvisited cell, one grid step at a time, first
/// along the column then along the row. Visited cells on the way are skipped.
fn reroute(grid: &Grid, path: &mut Path, head: Cell) {
    let Some(target) = nearest_unvisited(grid, path, head) else {
        return;
    };
    let mut current: Cell = head;
    while current != target {
        if current.row != target.row {
            current.row = if current.row < target.row {
                current.row + 1
            } else {
                current.row - 1
            };
        } else if current.col < target.col {
            current.col += 1;
        } else {
            current.col -= 1;
        }
        if !path.contains(current) {
            path.push(current);
        }
    }
}
