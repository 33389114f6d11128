// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Prefix-sweep search loop.
//!
//! For every module: 7 baseline measurements in the fixed level order, then
//! one measurement per prefix of the chosen base sequence, from length 0 to
//! the full sequence. Modules are processed strictly sequentially in sorted
//! filename order, and each one contributes exactly one matrix row.

use crate::pipeline::{Pipeline, PipelineError};
use optsweep_core::catalog::BASELINE_LEVELS;
use optsweep_core::results::{MatrixError, ResultMatrix};
use optsweep_core::score::Score;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that abort the whole sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to read module directory {directory}: {source}")]
    Directory {
        directory: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Lists the module filenames in `directory`: entries ending in `.bc`,
/// lexicographically sorted. An unreadable directory is fatal; no partial
/// matrix is ever produced from a bad input set.
pub fn discover_modules(directory: &Path) -> Result<Vec<String>, SweepError> {
    let read_err = |source| SweepError::Directory {
        directory: directory.display().to_string(),
        source,
    };

    let mut modules = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".bc") {
                modules.push(name.to_string());
            }
        }
    }
    modules.sort();
    Ok(modules)
}

/// Runs baseline and prefix measurements for single modules.
pub struct SweepRunner<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> SweepRunner<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// Measures the 7 baseline levels in their fixed order:
    /// none, `-O0`, `-O1`, `-O2`, `-O3`, `-Os`, `-Oz`.
    pub async fn run_baselines(&self, module: &Path) -> Result<Vec<Score>, PipelineError> {
        let mut scores = Vec::with_capacity(BASELINE_LEVELS.len());
        for level in BASELINE_LEVELS {
            let flags: Vec<&str> = level.flag().into_iter().collect();
            let score = self.pipeline.measure(module, &flags).await?;
            info!("Baseline {} score: {}", level.label(), score.display_or("missing"));
            scores.push(score);
        }
        Ok(scores)
    }

    /// Measures every prefix of `sequence`, from length 0 to the full
    /// sequence, in strictly increasing order. Prefix `i` passes exactly the
    /// first `i` tokens; no prefix is sampled or skipped.
    pub async fn run_prefixes(
        &self,
        module: &Path,
        sequence: &[&str],
    ) -> Result<Vec<Score>, PipelineError> {
        let mut scores = Vec::with_capacity(sequence.len() + 1);
        for i in 0..=sequence.len() {
            let score = self.pipeline.measure(module, &sequence[..i]).await?;
            info!("Prefix {i} score: {}", score.display_or("missing"));
            scores.push(score);
        }
        Ok(scores)
    }

    /// Produces one module's full row: baseline scores, then prefix scores.
    pub async fn run_module(
        &self,
        module: &Path,
        sequence: &[&str],
    ) -> Result<Vec<Score>, PipelineError> {
        let mut row = self.run_baselines(module).await?;
        row.extend(self.run_prefixes(module, sequence).await?);
        Ok(row)
    }
}

/// Processes `modules` sequentially and aggregates their rows into the
/// result matrix. Module paths resolve relative to `directory`; row order
/// matches the order of `modules`.
pub async fn run_batch(
    pipeline: &Pipeline,
    directory: &Path,
    modules: &[String],
    sequence: &[&str],
) -> Result<ResultMatrix, SweepError> {
    let runner = SweepRunner::new(pipeline);
    let mut matrix = ResultMatrix::for_sequence_len(sequence.len());

    for module in modules {
        info!("{module}");
        let row = runner.run_module(&directory.join(module), sequence).await?;
        matrix.push_row(module.clone(), row)?;
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case("a.bc", true ; "bitcode module is discovered")]
    #[test_case("a.bc.bak", false ; "backup file is skipped")]
    #[test_case("notes.txt", false ; "unrelated file is skipped")]
    #[test_case("bc", false ; "bare extension name is skipped")]
    fn discovery_recognizes_bitcode_names(name: &str, expected: bool) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(name), b"").unwrap();

        let modules = discover_modules(dir.path()).unwrap();
        assert_eq!(!modules.is_empty(), expected);
    }

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.bc", "notes.txt", "a.bc", "c.bc.bak"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let modules = discover_modules(dir.path()).unwrap();
        assert_eq!(modules, ["a.bc", "b.bc"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("no-such-dir");
        assert!(matches!(
            discover_modules(&gone),
            Err(SweepError::Directory { .. })
        ));
    }
}
