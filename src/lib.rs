/*
lib.rs

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

//! Generate grid path puzzles.
//!
//! A puzzle is a square grid with numbered dots. The player draws a single path that visits
//! every cell once and passes over the dots in ascending order.
//! Use [`generator::puzzle::PuzzleFactory`] to generate puzzles, and [`player_path::PlayerPath`]
//! to check the path that a player draws.

pub mod config;
pub mod generator;
pub mod player_path;
pub mod saver;
