/*
puzzle.rs

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

//! Build complete puzzles.
//!
//! The [`PuzzleFactory`] turns a [`PuzzleSpec`] into a [`PuzzleResult`]: a path that visits every
//! cell and the dots placed along it.
//! Except for an invalid [`PuzzleSpec`], generating a puzzle never fails: when a pattern family
//! produces an invalid path, the snake path replaces it, and when the solver cannot verify a
//! scattered placement in time, the factory falls back to the snake path with evenly spaced dots.

use clap::ValueEnum;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use super::dots::{self, Dot, PlacementOverride};
use super::grid::Cell;
use super::patterns::{self, FamilyChoice, PatternFamily};
use super::solver::{Solver, SolverError};
use super::validator::{self, ValidationError};
use crate::config::FactoryConfig;

/// How the dots are placed.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Evenly spaced along the path. The path proves that the puzzle can be solved.
    #[default]
    Even,

    /// Interior dots on random cells. The solver must verify the puzzle.
    Scattered,
}

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum SpecError {
    /// The grid must have at least two rows.
    GridTooSmall(usize),

    /// The number of dots must be between 2 and the number of cells.
    DotCount { count: usize, max: usize },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpecError::GridTooSmall(size) => {
                write!(f, "grid size {size} is too small (minimum is 2)")
            }
            SpecError::DotCount { count, max } => {
                write!(f, "{count} dots requested, must be between 2 and {max}")
            }
        }
    }
}

impl Error for SpecError {}

/// Puzzle request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSpec {
    /// Number of rows and columns.
    pub grid_size: usize,

    /// Number of dots.
    pub dot_count: usize,

    /// Pattern family of the solution path.
    #[serde(default)]
    pub pattern_family: FamilyChoice,

    /// Dot placement strategy.
    #[serde(default)]
    pub placement: Placement,

    /// Optional adjustment of the dot placement.
    #[serde(default)]
    pub placement_override: Option<PlacementOverride>,
}

impl PuzzleSpec {
    /// Create a [`PuzzleSpec`] object with evenly spaced dots and an automatic pattern family.
    pub fn new(grid_size: usize, dot_count: usize) -> Self {
        Self {
            grid_size,
            dot_count,
            pattern_family: FamilyChoice::Auto,
            placement: Placement::Even,
            placement_override: None,
        }
    }

    /// Set the pattern family.
    pub fn with_family(mut self, family: FamilyChoice) -> Self {
        self.pattern_family = family;
        self
    }

    /// Set the dot placement strategy.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the placement override.
    pub fn with_override(mut self, placement_override: Option<PlacementOverride>) -> Self {
        self.placement_override = placement_override;
        self
    }

    /// Verify the request.
    ///
    /// # Errors
    ///
    /// Return an error if the grid is smaller than 2x2 or if the number of dots is not between
    /// 2 and the number of cells.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.grid_size < 2 {
            return Err(SpecError::GridTooSmall(self.grid_size));
        }
        let max: usize = self.grid_size * self.grid_size;
        if self.dot_count < 2 || self.dot_count > max {
            return Err(SpecError::DotCount {
                count: self.dot_count,
                max,
            });
        }
        Ok(())
    }
}

/// Generated puzzle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleResult {
    /// Dots, ordered by number.
    dots: Vec<Dot>,

    /// A path that solves the puzzle.
    solution_path: Vec<Cell>,

    /// Number of rows and columns.
    grid_size: usize,
}

impl PuzzleResult {
    fn new(dots: Vec<Dot>, solution_path: Vec<Cell>, grid_size: usize) -> Self {
        Self {
            dots,
            solution_path,
            grid_size,
        }
    }

    /// Return the dots, ordered by number.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Return the solution path.
    pub fn solution_path(&self) -> &[Cell] {
        &self.solution_path
    }

    /// Return the number of rows and columns.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Return the number of dots.
    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    /// Return the dot number of the cell, if any.
    pub fn dot_at(&self, cell: Cell) -> Option<usize> {
        self.dots.iter().find(|d| d.cell == cell).map(|d| d.num)
    }

    /// Verify the path and the dots. Used for puzzles that do not come from the factory.
    ///
    /// # Errors
    ///
    /// Return the first problem found.
    pub fn certify(&self) -> Result<(), ValidationError> {
        validator::certify(&self.solution_path, self.grid_size)?;
        validator::certify_dots(&self.dots, &self.solution_path)
    }

    /// Return up to `max_len` cells of the solution that follow the part of `filled` matching the
    /// start of the solution.
    ///
    /// If `filled` does not start like the solution, the hint is the start of the solution.
    pub fn hint(&self, filled: &[Cell], max_len: usize) -> &[Cell] {
        let matched: usize = filled
            .iter()
            .zip(&self.solution_path)
            .take_while(|(a, b)| a == b)
            .count();
        let end: usize = matched.saturating_add(max_len).min(self.solution_path.len());
        &self.solution_path[matched..end]
    }
}

/// Puzzle factory.
///
/// The factory only holds its settings. Each call to [`PuzzleFactory::generate`] owns its own
/// path, dots, and random source, so the same factory can serve several threads.
#[derive(Debug, Clone, Default)]
pub struct PuzzleFactory {
    config: FactoryConfig,
}

impl PuzzleFactory {
    /// Create a [`PuzzleFactory`] object.
    pub fn new(config: FactoryConfig) -> Self {
        Self { config }
    }

    /// Return the settings.
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Generate a puzzle with a fresh random source.
    ///
    /// # Errors
    ///
    /// The method returns an error only if the [`PuzzleSpec`] is invalid.
    pub fn generate(&self, spec: &PuzzleSpec) -> Result<PuzzleResult, SpecError> {
        let mut rng: StdRng = StdRng::from_rng(&mut rand::rng());
        self.generate_with_rng(spec, &mut rng)
    }

    /// Generate a puzzle with the given random source. The same seed always produces the same
    /// puzzle (unless the solver times out, which depends on the machine speed).
    ///
    /// # Errors
    ///
    /// The method returns an error only if the [`PuzzleSpec`] is invalid. Nothing is generated
    /// in that case.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        spec: &PuzzleSpec,
        rng: &mut R,
    ) -> Result<PuzzleResult, SpecError> {
        spec.validate()?;
        let puzzle: PuzzleResult = match spec.placement {
            Placement::Even => self.even_puzzle(spec, rng),
            Placement::Scattered => self.scattered_puzzle(spec, rng),
        };
        info!(
            "Generated a {size}x{size} puzzle with {} dots",
            puzzle.dot_count(),
            size = puzzle.grid_size()
        );
        Ok(puzzle)
    }

    /// Generate a path with the requested family and certify it. An invalid path is replaced
    /// by the snake path.
    fn candidate_path<R: Rng + ?Sized>(
        &self,
        spec: &PuzzleSpec,
        rng: &mut R,
    ) -> (PatternFamily, Vec<Cell>) {
        let size: usize = spec.grid_size;
        let family: PatternFamily = spec.pattern_family.resolve(size, rng);
        let path: Vec<Cell> = family.generate(size, rng).into_vec();
        match validator::certify(&path, size) {
            Ok(()) => (family, path),
            Err(e) => {
                debug!("The {family} path is invalid ({e}): using the snake path");
                (PatternFamily::Snake, patterns::snake(size).into_vec())
            }
        }
    }

    fn even_puzzle<R: Rng + ?Sized>(&self, spec: &PuzzleSpec, rng: &mut R) -> PuzzleResult {
        let (family, path) = self.candidate_path(spec, rng);
        debug!("Placing {} dots along the {family} path", spec.dot_count);
        self.placed_along(spec, path)
    }

    /// Place the dots evenly along the path and apply the override.
    fn placed_along(&self, spec: &PuzzleSpec, path: Vec<Cell>) -> PuzzleResult {
        let mut dots: Vec<Dot> = dots::place(&path, spec.dot_count);
        if let Some(o) = spec.placement_override {
            o.apply(&mut dots, &path);
        }
        PuzzleResult::new(dots, path, spec.grid_size)
    }

    fn scattered_puzzle<R: Rng + ?Sized>(&self, spec: &PuzzleSpec, rng: &mut R) -> PuzzleResult {
        let size: usize = spec.grid_size;

        for attempt in 1..=self.config.max_attempts {
            let (family, path) = self.candidate_path(spec, rng);
            let mut dots: Vec<Dot> = dots::scatter(&path, spec.dot_count, rng);

            // The dots might happen to follow the path
            let solution: Result<Vec<Cell>, SolverError> =
                if validator::certify_dots(&dots, &path).is_ok() {
                    debug!("Attempt {attempt}: dots follow the {family} path");
                    Ok(path)
                } else {
                    let mut solver: Solver = Solver::new(size, &dots);
                    solver.check_interval = self.config.check_interval;
                    let res = solver.solve(self.config.attempt_timeout);
                    match &res {
                        Ok(_) => debug!(
                            "Attempt {attempt}: solved in {} iterations ({}s)",
                            solver.iteration, solver.duration
                        ),
                        Err(SolverError::Timeout) => info!(
                            "Attempt {attempt}: solver timeout after {} iterations ({}s)",
                            solver.iteration, solver.duration
                        ),
                        Err(SolverError::NoSolution) => debug!(
                            "Attempt {attempt}: no solution ({} iterations)",
                            solver.iteration
                        ),
                    }
                    res
                };

            if let Ok(solution_path) = solution {
                if let Some(o) = spec.placement_override {
                    o.apply(&mut dots, &solution_path);
                }
                return PuzzleResult::new(dots, solution_path, size);
            }
        }

        warn!(
            "No solvable scattered placement after {} attempts: using the snake path",
            self.config.max_attempts
        );
        self.placed_along(spec, patterns::snake(size).into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    fn assert_valid(puzzle: &PuzzleResult, spec: &PuzzleSpec) {
        let size: usize = spec.grid_size;
        let path: &[Cell] = puzzle.solution_path();
        assert_eq!(puzzle.grid_size(), size);
        assert_eq!(path.len(), size * size);
        assert_eq!(
            path.iter().collect::<HashSet<_>>().len(),
            size * size,
            "distinct cells"
        );
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
        let dots: &[Dot] = puzzle.dots();
        assert_eq!(dots.len(), spec.dot_count);
        assert_eq!(dots[0].cell, path[0]);
        assert_eq!(dots[dots.len() - 1].cell, path[path.len() - 1]);
        let positions: Vec<usize> = dots
            .iter()
            .map(|d| path.iter().position(|c| *c == d.cell).expect("dot on path"))
            .collect();
        assert!(positions.windows(2).all(|p| p[0] < p[1]));
        assert_eq!(puzzle.certify(), Ok(()));
    }

    fn cells(list: &[(usize, usize)]) -> Vec<Cell> {
        list.iter().map(|(r, c)| Cell::new(*r, *c)).collect()
    }

    #[test]
    fn snake_four_three_dots() {
        let spec = PuzzleSpec::new(4, 3).with_family(FamilyChoice::Fixed(PatternFamily::Snake));
        let mut rng = StdRng::seed_from_u64(0);
        let puzzle = PuzzleFactory::default()
            .generate_with_rng(&spec, &mut rng)
            .expect("valid spec");
        assert_eq!(
            puzzle.solution_path(),
            cells(&[
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 3),
                (1, 2),
                (1, 1),
                (1, 0),
                (2, 0),
                (2, 1),
                (2, 2),
                (2, 3),
                (3, 3),
                (3, 2),
                (3, 1),
                (3, 0)
            ])
            .as_slice()
        );
        assert_eq!(puzzle.dots()[0], Dot::new(1, Cell::new(0, 0)));
        assert_eq!(puzzle.dots()[1], Dot::new(2, Cell::new(1, 0)));
        assert_eq!(puzzle.dots()[2], Dot::new(3, Cell::new(3, 0)));
    }

    #[test]
    fn spiral_five_five_dots() {
        let spec = PuzzleSpec::new(5, 5).with_family(FamilyChoice::Fixed(PatternFamily::Spiral));
        let puzzle = PuzzleFactory::default().generate(&spec).expect("valid spec");
        assert_eq!(
            puzzle.solution_path()[..7],
            cells(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 4), (2, 4)])
        );
        assert_eq!(puzzle.solution_path()[24], Cell::new(2, 2));
        assert_eq!(puzzle.dots()[4], Dot::new(5, Cell::new(2, 2)));
        assert_valid(&puzzle, &spec);
    }

    #[test]
    fn every_family_gives_a_valid_puzzle() {
        let factory = PuzzleFactory::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut choices: Vec<FamilyChoice> = PatternFamily::all()
            .into_iter()
            .map(FamilyChoice::Fixed)
            .collect();
        choices.push(FamilyChoice::Auto);
        for choice in choices {
            for size in 2..=8 {
                for count in [2, size, size * size] {
                    let spec = PuzzleSpec::new(size, count).with_family(choice);
                    let puzzle = factory
                        .generate_with_rng(&spec, &mut rng)
                        .expect("valid spec");
                    assert_valid(&puzzle, &spec);
                }
            }
        }
    }

    #[test]
    fn scattered_dots_are_verified() {
        let factory = PuzzleFactory::new(FactoryConfig {
            max_attempts: 5,
            attempt_timeout: Duration::from_millis(500),
            ..FactoryConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(99);
        for size in 3..=5 {
            let spec = PuzzleSpec::new(size, 4).with_placement(Placement::Scattered);
            let puzzle = factory
                .generate_with_rng(&spec, &mut rng)
                .expect("valid spec");
            assert_valid(&puzzle, &spec);
        }
    }

    #[test]
    fn no_attempt_falls_back_to_the_snake() {
        let factory = PuzzleFactory::new(FactoryConfig {
            max_attempts: 0,
            ..FactoryConfig::default()
        });
        let spec = PuzzleSpec::new(4, 3).with_placement(Placement::Scattered);
        let puzzle = factory.generate(&spec).expect("valid spec");
        assert_eq!(puzzle.solution_path(), patterns::snake(4).get().as_slice());
        assert_eq!(puzzle.dots()[1].cell, Cell::new(1, 0));
        assert_valid(&puzzle, &spec);
    }

    #[test]
    fn invalid_specs_are_rejected() {
        let factory = PuzzleFactory::default();
        assert_eq!(
            factory.generate(&PuzzleSpec::new(1, 2)),
            Err(SpecError::GridTooSmall(1))
        );
        assert_eq!(
            factory.generate(&PuzzleSpec::new(3, 1)),
            Err(SpecError::DotCount { count: 1, max: 9 })
        );
        assert_eq!(
            factory.generate(&PuzzleSpec::new(3, 10)),
            Err(SpecError::DotCount { count: 10, max: 9 })
        );
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let factory = PuzzleFactory::default();
        let spec = PuzzleSpec::new(6, 7);
        let a = factory.generate_with_rng(&spec, &mut StdRng::seed_from_u64(17));
        let b = factory.generate_with_rng(&spec, &mut StdRng::seed_from_u64(17));
        assert_eq!(a, b);
    }

    #[test]
    fn override_keeps_the_puzzle_valid() {
        let factory = PuzzleFactory::default();
        let mut rng = StdRng::seed_from_u64(5);
        for size in 4..=7 {
            let spec = PuzzleSpec::new(size, 12)
                .with_override(Some(PlacementOverride::ninth_dot_lift()));
            let puzzle = factory
                .generate_with_rng(&spec, &mut rng)
                .expect("valid spec");
            assert_valid(&puzzle, &spec);
        }
    }

    #[test]
    fn factory_is_shared_between_threads() {
        let factory = PuzzleFactory::default();
        std::thread::scope(|s| {
            for size in 3..7 {
                let factory = &factory;
                s.spawn(move || {
                    let spec = PuzzleSpec::new(size, 4);
                    let puzzle = factory.generate(&spec).expect("valid spec");
                    assert_valid(&puzzle, &spec);
                });
            }
        });
    }

    #[test]
    fn hint_follows_the_matching_prefix() {
        let spec = PuzzleSpec::new(3, 2).with_family(FamilyChoice::Fixed(PatternFamily::Snake));
        let puzzle = PuzzleFactory::default().generate(&spec).expect("valid spec");
        let filled = cells(&[(0, 0), (0, 1)]);
        assert_eq!(puzzle.hint(&filled, 2), cells(&[(0, 2), (1, 2)]).as_slice());

        // Diverging player path: the hint starts where the paths diverge
        let filled = cells(&[(0, 0), (1, 0)]);
        assert_eq!(puzzle.hint(&filled, 1), cells(&[(0, 1)]).as_slice());

        // Nothing matches
        assert_eq!(puzzle.hint(&[], 3), &puzzle.solution_path()[..3]);

        // Complete path
        assert!(puzzle.hint(puzzle.solution_path(), 3).is_empty());
    }

    #[test]
    fn unbounded_hint_returns_the_rest_of_the_solution() {
        let spec = PuzzleSpec::new(3, 2).with_family(FamilyChoice::Fixed(PatternFamily::Snake));
        let puzzle = PuzzleFactory::default().generate(&spec).expect("valid spec");
        let filled = cells(&[(0, 0)]);
        assert_eq!(puzzle.hint(&filled, usize::MAX), &puzzle.solution_path()[1..]);
        assert_eq!(puzzle.hint(&[], usize::MAX), puzzle.solution_path());
    }

    #[test]
    fn json_layout() {
        let spec = PuzzleSpec::new(2, 2).with_family(FamilyChoice::Fixed(PatternFamily::Snake));
        let puzzle = PuzzleFactory::default().generate(&spec).expect("valid spec");
        let json: String = serde_json::to_string(&puzzle).expect("serializable");
        assert_eq!(
            json,
            r#"{"dots":[{"num":1,"row":0,"col":0},{"num":2,"row":1,"col":0}],"solutionPath":[{"row":0,"col":0},{"row":0,"col":1},{"row":1,"col":1},{"row":1,"col":0}],"gridSize":2}"#
        );
    }

    #[test]
    fn spec_from_json() {
        let spec: PuzzleSpec =
            serde_json::from_str(r#"{"gridSize":5,"dotCount":4,"patternFamily":"l-shape"}"#)
                .expect("valid json");
        assert_eq!(spec.pattern_family, FamilyChoice::Fixed(PatternFamily::LShape));
        assert_eq!(spec.placement, Placement::Even);

        let spec: PuzzleSpec =
            serde_json::from_str(r#"{"gridSize":5,"dotCount":4,"patternFamily":"auto"}"#)
                .expect("valid json");
        assert_eq!(spec.pattern_family, FamilyChoice::Auto);
    }
}
