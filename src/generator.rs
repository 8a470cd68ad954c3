/*
generator.rs

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

//! Generate puzzles.
//!
//! A puzzle is a square grid and a list of numbered dots.
//! The player must draw a single path that starts at dot 1, visits every cell once, passes over
//! the dots in ascending order, and ends at the last dot.
//!
//! Generating a puzzle is composed of three steps:
//!
//! * A candidate path is built by one of the [`patterns::PatternFamily`] strategies.
//!   Some strategies can produce invalid paths, so every candidate is certified by
//!   [`validator::certify`]. An invalid candidate is replaced by the snake path.
//!
//! * The dots are placed along the path by [`dots::place`].
//!   Because the dots follow the path, the path is a solution.
//!   The dots can also be scattered with [`dots::scatter`], in which case the
//!   [`solver::Solver`] must find a solution within a time budget.
//!
//! * The [`puzzle::PuzzleFactory`] drives the two steps, retries when the solver gives up, and
//!   returns a [`puzzle::PuzzleResult`].

pub mod dots;
pub mod grid;
mod maze;
pub mod path;
pub mod patterns;
pub mod puzzle;
pub mod solver;
pub mod validator;
