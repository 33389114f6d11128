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

//! Optsweep Tools Library
//!
//! Drivers for the prefix-sweep cost-measurement experiment: the external
//! three-stage measurement pipeline, the baseline/prefix sweep loop, and the
//! command-line entry point.

pub mod cli;
pub mod pipeline;
pub mod sweep;

pub use cli::sweep::{SweepArgs, run_sweep};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError};
pub use sweep::{SweepError, SweepRunner, discover_modules, run_batch};
