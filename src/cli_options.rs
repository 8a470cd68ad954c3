/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! List the pattern families:
//!
//! ```
//! $ gridstroke --ls
//! snake
//! spiral
//! column
//! l-shape
//! diamond
//! wave
//! layered
//! fractal (random)
//! complex
//! maze (random)
//! labyrinth (random)
//! ```
//!
//! Generate a 4x4 puzzle with three dots along the snake path:
//!
//! ```
//! $ gridstroke -n 4 -k 3 -p snake
//! {
//!   "dots": [
//!     {
//!       "num": 1,
//!       "row": 0,
//!       "col": 0
//!     },
//! ...
//! ```
//!
//! Generate ten reproducible puzzles with scattered dots, save them, and print some statistics:
//!
//! ```
//! $ gridstroke -n 6 -k 5 --placement scattered -c 10 --seed 42 -o puzzles.json -s
//! ```

use clap::Parser;
use log::{debug, error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use gridstroke::config::{
    COPYRIGHT_NOTICE, DEFAULT_ATTEMPT_TIMEOUT_MS, DEFAULT_MAX_ATTEMPTS, FactoryConfig,
};
use gridstroke::generator::dots::PlacementOverride;
use gridstroke::generator::patterns::{FamilyChoice, PatternFamily};
use gridstroke::generator::puzzle::{Placement, PuzzleFactory, PuzzleResult, PuzzleSpec};
use gridstroke::saver::puzzle::{PuzzleFile, SaverPuzzle};

/// Generate Gridstroke puzzles.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the pattern families
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Number of rows and columns of the grid
    #[arg(short = 'n', long, default_value_t = 6)]
    size: usize,

    /// Number of dots (defaults to the grid size)
    #[arg(short = 'k', long)]
    dots: Option<usize>,

    /// Pattern family of the solution path ("auto" to pick one at random)
    #[arg(short, long, default_value_t = FamilyChoice::Auto)]
    pattern: FamilyChoice,

    /// Dot placement strategy
    #[arg(value_enum, long, default_value_t = Placement::Even)]
    placement: Placement,

    /// Move the ninth dot one row up when possible
    #[arg(long, default_value_t = false)]
    lift_ninth: bool,

    /// Number of puzzles to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Seed of the random source, for reproducible puzzles
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of attempts for scattered dots
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: usize,

    /// Solver time budget for each attempt, in milliseconds
    #[arg(long, default_value_t = DEFAULT_ATTEMPT_TIMEOUT_MS)]
    timeout: u64,

    /// Save the puzzles in the given JSON file instead of printing them
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print some statistics after generating the puzzles
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    //
    // List the pattern families
    //
    if args.ls {
        for family in PatternFamily::all() {
            if family.is_randomized() {
                println!("{family} (random)");
            } else {
                println!("{family}");
            }
        }
        return 0;
    }

    let spec: PuzzleSpec = PuzzleSpec::new(args.size, args.dots.unwrap_or(args.size))
        .with_family(args.pattern)
        .with_placement(args.placement)
        .with_override(args.lift_ninth.then(PlacementOverride::ninth_dot_lift));
    if let Err(e) = spec.validate() {
        eprintln!("Error: {e}");
        return 1;
    }

    let factory: PuzzleFactory = PuzzleFactory::new(FactoryConfig {
        max_attempts: args.attempts,
        attempt_timeout: Duration::from_millis(args.timeout),
        ..FactoryConfig::default()
    });
    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut puzzles: Vec<PuzzleResult> = Vec::with_capacity(args.count);
    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    for i in 0..args.count {
        debug!("Puzzle {i}");
        let start: Instant = Instant::now();
        match factory.generate_with_rng(&spec, &mut rng) {
            Ok(puzzle) => puzzles.push(puzzle),
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        }
        let duration: f32 = start.elapsed().as_secs_f32();
        total += duration;
        if duration > max {
            max = duration;
        }
    }

    //
    // Save or print the puzzles
    //
    match &args.output {
        Some(path) => {
            let saver: SaverPuzzle = SaverPuzzle::new(path.clone());
            if let Err(e) = saver.save_puzzles(&PuzzleFile::new(args.seed, puzzles)) {
                error!("Cannot save the puzzles: {e}");
                return 1;
            }
        }
        None => {
            for puzzle in &puzzles {
                match serde_json::to_string_pretty(puzzle) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        error!("Cannot serialize the puzzle: {e}");
                        return 1;
                    }
                }
            }
        }
    }

    // Print some stats
    if args.summary && args.count > 0 {
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s",
            total,
            total / args.count as f32,
            max,
        );
    }
    0
}
