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

//! Save and restore a list of puzzles.
//!
//! The saved object is a serialization of the [`PuzzleFile`] object in JSON format by
//! using [`serde`].
//! The puzzles are certified again when they are loaded, so a file edited by hand cannot bring
//! in a puzzle without a valid solution.

use chrono::Local;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::generator::puzzle::PuzzleResult;

/// Content of a puzzle file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PuzzleFile {
    /// Creation time, in RFC 3339 format.
    pub generated: String,

    /// Seed of the random source, when the puzzles were generated from a seed.
    pub seed: Option<u64>,

    /// Generated puzzles.
    pub puzzles: Vec<PuzzleResult>,
}

impl PuzzleFile {
    /// Create a [`PuzzleFile`] object stamped with the current local time.
    pub fn new(seed: Option<u64>, puzzles: Vec<PuzzleResult>) -> Self {
        Self {
            generated: Local::now().to_rfc3339(),
            seed,
            puzzles,
        }
    }
}

/// Object to save and restore puzzles.
pub struct SaverPuzzle {
    /// Path to the save file.
    save_file: PathBuf,
}

impl SaverPuzzle {
    /// Create a [`SaverPuzzle`] object.
    ///
    /// The provided [`PathBuf`] is the path to the puzzle file.
    pub fn new(save_file: PathBuf) -> Self {
        debug!("Puzzle file: {save_file:?}");
        Self { save_file }
    }

    /// Retrieve the [`PuzzleFile`] object from the puzzle file.
    ///
    /// Return the [`PuzzleFile`] object or None if the puzzle file does not exist.
    /// Return an error if the file cannot be read, or if one of its puzzles is invalid.
    pub fn get_puzzles(&self) -> Result<Option<PuzzleFile>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let puzzle_file: PuzzleFile = serde_json::from_reader(reader)?;
        for puzzle in &puzzle_file.puzzles {
            puzzle.certify()?;
        }
        Ok(Some(puzzle_file))
    }

    /// Save the provided [`PuzzleFile`] object.
    pub fn save_puzzles(&self, puzzle_file: &PuzzleFile) -> Result<(), Box<dyn Error>> {
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, puzzle_file)?;
        writer.flush()?;
        Ok(())
    }

    /// Delete the puzzle file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::puzzle::{PuzzleFactory, PuzzleSpec};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::fs;
    use tempfile::TempDir;

    /// Return a saver writing into a temporary directory, removed when the [`TempDir`] is
    /// dropped.
    fn temp_saver() -> (TempDir, SaverPuzzle) {
        let dir: TempDir = tempfile::tempdir().expect("Failed to create temp dir");
        let saver: SaverPuzzle = SaverPuzzle::new(dir.path().join("puzzles.json"));
        (dir, saver)
    }

    #[test]
    fn save_and_restore() {
        let (_dir, saver) = temp_saver();
        let factory = PuzzleFactory::default();
        let mut rng = StdRng::seed_from_u64(8);
        let puzzles: Vec<PuzzleResult> = (3..6)
            .map(|size| {
                factory
                    .generate_with_rng(&PuzzleSpec::new(size, 4), &mut rng)
                    .expect("valid spec")
            })
            .collect();
        let puzzle_file = PuzzleFile::new(Some(8), puzzles);

        saver.save_puzzles(&puzzle_file).expect("writable temp dir");
        let restored: Option<PuzzleFile> = saver.get_puzzles().expect("readable file");
        assert_eq!(restored, Some(puzzle_file));
    }

    #[test]
    fn missing_file() {
        let (_dir, saver) = temp_saver();
        assert!(matches!(saver.get_puzzles(), Ok(None)));
    }

    #[test]
    fn delete_removes_the_file() {
        let (_dir, saver) = temp_saver();
        saver
            .save_puzzles(&PuzzleFile::new(None, Vec::new()))
            .expect("writable temp dir");
        assert!(saver.save_file.exists());
        saver.delete_save();
        assert!(!saver.save_file.exists());
    }

    #[test]
    fn invalid_puzzle_is_rejected() {
        let (_dir, saver) = temp_saver();
        // Dot 2 is not the last cell of the path
        let content = r#"{
            "generated": "2025-01-01T00:00:00+00:00",
            "seed": null,
            "puzzles": [{
                "dots": [{"num": 1, "row": 0, "col": 0}, {"num": 2, "row": 0, "col": 1}],
                "solutionPath": [
                    {"row": 0, "col": 0}, {"row": 0, "col": 1},
                    {"row": 1, "col": 1}, {"row": 1, "col": 0}
                ],
                "gridSize": 2
            }]
        }"#;
        fs::write(&saver.save_file, content).expect("writable temp dir");
        assert!(saver.get_puzzles().is_err());
    }
}
