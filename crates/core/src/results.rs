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

//! Result aggregation.
//!
//! Collects one score row per module into a matrix with a fixed column
//! layout (7 baseline columns, then one column per prefix length) and
//! serializes it as CSV with the module filename as the row label.

use crate::catalog::BASELINE_LEVELS;
use crate::score::Score;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors raised while aggregating or serializing results.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("row for {module} has {got} cells, expected {expected}")]
    RowWidth { module: String, got: usize, expected: usize },

    #[error("failed to write results: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush results: {0}")]
    Io(#[from] std::io::Error),
}

/// The per-run result matrix: one row per module, in insertion order.
///
/// Every row has exactly `7 + N + 1` cells for a base sequence of length `N`;
/// rows of any other width are rejected.
#[derive(Debug)]
pub struct ResultMatrix {
    columns: Vec<String>,
    rows: Vec<(String, Vec<Score>)>,
}

impl ResultMatrix {
    /// Creates an empty matrix for a base sequence of `sequence_len` tokens.
    ///
    /// Column labels are `Baseline <level>` for the 7 fixed levels followed by
    /// `Prefix 0` through `Prefix N`, identical for every row of the run.
    pub fn for_sequence_len(sequence_len: usize) -> Self {
        let mut columns = Vec::with_capacity(BASELINE_LEVELS.len() + sequence_len + 1);
        for level in BASELINE_LEVELS {
            columns.push(format!("Baseline {}", level.label()));
        }
        for i in 0..=sequence_len {
            columns.push(format!("Prefix {i}"));
        }
        Self { columns, rows: Vec::new() }
    }

    /// Appends one module's row, enforcing the fixed row width.
    pub fn push_row(&mut self, module: String, row: Vec<Score>) -> Result<(), MatrixError> {
        if row.len() != self.columns.len() {
            return Err(MatrixError::RowWidth {
                module,
                got: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push((module, row));
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[(String, Vec<Score>)] {
        &self.rows
    }

    /// Serializes the matrix as CSV. The row-label column is named
    /// `Filename`; missing scores become empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), MatrixError> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("Filename".to_string());
        header.extend(self.columns.iter().cloned());
        csv.write_record(&header)?;

        for (module, row) in &self.rows {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(module.clone());
            record.extend(row.iter().map(Score::to_string));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Serializes the matrix to a file at `path`.
    pub fn write_csv_file(&self, path: &Path) -> Result<(), MatrixError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_the_fixed_layout() {
        let matrix = ResultMatrix::for_sequence_len(3);
        assert_eq!(
            matrix.columns(),
            &[
                "Baseline None",
                "Baseline O0",
                "Baseline O1",
                "Baseline O2",
                "Baseline O3",
                "Baseline Os",
                "Baseline Oz",
                "Prefix 0",
                "Prefix 1",
                "Prefix 2",
                "Prefix 3",
            ]
        );
    }

    #[test]
    fn rejects_rows_of_the_wrong_width() {
        let mut matrix = ResultMatrix::for_sequence_len(2);
        let err = matrix
            .push_row("a.bc".to_string(), vec![Score::Missing; 3])
            .unwrap_err();
        assert!(matches!(err, MatrixError::RowWidth { got: 3, expected: 10, .. }));
    }

    #[test]
    fn missing_scores_serialize_as_empty_cells() {
        let mut matrix = ResultMatrix::for_sequence_len(0);
        let row = vec![
            Score::Value(1.0),
            Score::Missing,
            Score::Value(-3.5),
            Score::Missing,
            Score::Value(1e10),
            Score::Value(0.0),
            Score::Missing,
            Score::Value(2.0),
        ];
        matrix.push_row("a.bc".to_string(), row).unwrap();

        let mut buf = Vec::new();
        matrix.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Filename,Baseline None,Baseline O0,Baseline O1,Baseline O2,Baseline O3,\
             Baseline Os,Baseline Oz,Prefix 0"
        );
        assert_eq!(lines.next().unwrap(), "a.bc,1,,-3.5,,10000000000,0,,2");
        assert!(lines.next().is_none());
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut matrix = ResultMatrix::for_sequence_len(0);
        for name in ["a.bc", "b.bc"] {
            matrix
                .push_row(name.to_string(), vec![Score::Missing; 8])
                .unwrap();
        }
        let names: Vec<_> = matrix.rows().iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(names, ["a.bc", "b.bc"]);
    }
}
