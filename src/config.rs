/*
config.rs

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

//! Crate constants and generation settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law."
);

/// Number of generation attempts before falling back to the snake path.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

/// Time budget of the solver for each attempt, in milliseconds.
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 2000;

/// The solver checks the elapsed time every `DEFAULT_CHECK_INTERVAL` moves.
pub const DEFAULT_CHECK_INTERVAL: usize = 1024;

/// Settings of the [`crate::generator::puzzle::PuzzleFactory`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FactoryConfig {
    /// Maximum number of attempts for placements that need the solver.
    pub max_attempts: usize,

    /// Time budget of the solver for each attempt.
    pub attempt_timeout: Duration,

    /// The solver checks the elapsed time every `check_interval` moves.
    pub check_interval: usize,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS),
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}
