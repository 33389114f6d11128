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

//! Optsweep Core Library
//!
//! Domain types for the optimization prefix-sweep experiment: the fixed
//! pass-list catalog, measurement scores, and the per-run result matrix.

pub mod catalog;
pub mod results;
pub mod score;

pub use catalog::{BASELINE_LEVELS, BaselineLevel, sequence_for_level};
pub use results::{MatrixError, ResultMatrix};
pub use score::Score;
