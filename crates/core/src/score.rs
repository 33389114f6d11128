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

//! Measurement scores.
//!
//! A score is the final scalar emitted by the evaluation stage for one
//! (module, flag-list) pair, or a distinguished missing marker when that
//! output could not be read as a finite number. Missing is never conflated
//! with zero; it serializes to an empty cell.

use std::fmt;

/// Result of one pipeline measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    /// A finite measured value.
    Value(f64),
    /// No valid measurement was obtained.
    Missing,
}

impl Score {
    /// Parses the evaluator's final output token.
    ///
    /// Anything that is not a finite number (empty output, diagnostics,
    /// `nan`, `inf`) becomes [`Score::Missing`]; a dead or misbehaving stage
    /// therefore surfaces here without aborting the batch.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Score::Value(value),
            _ => Score::Missing,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Score::Missing)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Score::Value(value) => Some(value),
            Score::Missing => None,
        }
    }

    /// Renders the score for log output, substituting `fallback` for a
    /// missing measurement. Values render exactly as in the CSV cell.
    pub fn display_or(self, fallback: &str) -> String {
        match self {
            Score::Missing => fallback.to_string(),
            Score::Value(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Score {
    /// Renders the tabular cell for this score: the number, or an empty cell
    /// for a missing measurement.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Value(value) => write!(f, "{value}"),
            Score::Missing => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0", Some(0.0))]
    #[test_case("-3.5", Some(-3.5))]
    #[test_case("1e10", Some(1e10))]
    #[test_case("  42.0\n", Some(42.0))]
    #[test_case("", None)]
    #[test_case("nan-ish", None)]
    #[test_case("error: timeout", None)]
    #[test_case("nan", None)]
    #[test_case("inf", None)]
    fn parse_matches_finite_numbers_only(raw: &str, expected: Option<f64>) {
        assert_eq!(Score::parse(raw).value(), expected);
    }

    #[test]
    fn missing_is_not_zero() {
        assert_ne!(Score::Missing, Score::Value(0.0));
        assert_eq!(Score::Missing.to_string(), "");
        assert_eq!(Score::Value(0.0).to_string(), "0");
    }

    #[test]
    fn log_rendering_matches_the_cell_form_for_values() {
        assert_eq!(Score::Value(-3.5).display_or("missing"), Score::Value(-3.5).to_string());
        assert_eq!(Score::Missing.display_or("missing"), "missing");
    }
}
