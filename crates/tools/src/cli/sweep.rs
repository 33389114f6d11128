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

//! Command-line surface of the prefix-sweep experiment.

use crate::pipeline::{Pipeline, PipelineConfig};
use crate::sweep::{SweepError, discover_modules, run_batch};
use clap::Parser;
use optsweep_core::catalog::sequence_for_level;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// CLI arguments for the sweep run.
#[derive(Parser, Debug)]
#[command(name = "optsweep")]
#[command(about = "Measure cost scores across optimization-sequence prefixes")]
#[command(version = "0.1.0")]
pub struct SweepArgs {
    /// Directory containing the benchmark bitcode modules (*.bc)
    #[arg(value_name = "BENCHMARK_DIR")]
    pub benchmark_dir: PathBuf,

    /// Base pass sequence for the prefix sweep (O0-O3); unknown names fall
    /// back to O3
    #[arg(value_name = "BASE_SEQUENCE", default_value = "O3")]
    pub base_sequence: String,

    /// Output CSV file
    #[arg(short, long, default_value = "result.csv")]
    pub output: PathBuf,

    /// Cost model CSV consumed by the cost-analysis stage
    #[arg(long, default_value = "costModel.csv")]
    pub cost_model: PathBuf,

    /// Target architecture for cost analysis
    #[arg(long, default_value = "wasm32")]
    pub arch: String,

    /// Inline threshold passed to the cost-analysis stage
    #[arg(long, default_value = "1000")]
    pub inline_threshold: u32,

    /// Bounds file for the score evaluator
    #[arg(long, default_value = "bounds")]
    pub bounds_file: PathBuf,

    /// Per-measurement timeout in seconds; on expiry the measurement is
    /// recorded as missing
    #[arg(long, default_value = "300")]
    pub timeout_secs: u64,

    /// Optimizer stage program
    #[arg(long, default_value = "opt")]
    pub opt_program: PathBuf,

    /// Cost-analysis stage program
    #[arg(long, default_value = "gpscat-cost")]
    pub cost_program: PathBuf,

    /// Score-evaluation stage program
    #[arg(long, default_value = "gpscat-score")]
    pub score_program: PathBuf,
}

impl SweepArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            opt_program: self.opt_program.clone(),
            cost_program: self.cost_program.clone(),
            score_program: self.score_program.clone(),
            cost_model: self.cost_model.clone(),
            arch: self.arch.clone(),
            inline_threshold: self.inline_threshold,
            bounds_file: self.bounds_file.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Runs the whole experiment: module discovery, baseline and prefix
/// measurements for each module, and the final CSV write.
pub async fn run_sweep(args: SweepArgs) -> Result<(), SweepError> {
    let sequence = sequence_for_level(&args.base_sequence);
    let modules = discover_modules(&args.benchmark_dir)?;
    info!(
        "sweeping {} module(s) with base sequence {} ({} tokens)",
        modules.len(),
        args.base_sequence,
        sequence.len()
    );

    let pipeline = Pipeline::new(args.pipeline_config());
    let matrix = run_batch(&pipeline, &args.benchmark_dir, &modules, sequence).await?;

    matrix.write_csv_file(&args.output)?;
    info!("results written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_experiment_setup() {
        let args = SweepArgs::parse_from(["optsweep", "benchmarks"]);
        assert_eq!(args.base_sequence, "O3");
        assert_eq!(args.output, PathBuf::from("result.csv"));

        let config = args.pipeline_config();
        assert_eq!(config.cost_model, PathBuf::from("costModel.csv"));
        assert_eq!(config.arch, "wasm32");
        assert_eq!(config.inline_threshold, 1000);
        assert_eq!(config.bounds_file, PathBuf::from("bounds"));
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn benchmark_directory_is_required() {
        assert!(SweepArgs::try_parse_from(["optsweep"]).is_err());
    }
}
