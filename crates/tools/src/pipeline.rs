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

//! Three-stage measurement pipeline.
//!
//! One invocation turns a (module, flag-list) pair into a single [`Score`] by
//! chaining three external programs: the optimizer, the cost analyzer, and
//! the score evaluator. The stages run concurrently, connected stdout→stdin
//! through OS pipes, so intermediate streams are never buffered in memory and
//! backpressure falls out of pipe semantics. Every invocation is bounded by a
//! timeout; a stage that hangs or dies yields a missing score, never a failed
//! run.

use optsweep_core::Score;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Configuration shared by every pipeline invocation of a run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Optimizer stage program.
    pub opt_program: PathBuf,
    /// Cost-analysis stage program.
    pub cost_program: PathBuf,
    /// Score-evaluation stage program.
    pub score_program: PathBuf,
    /// Cost model CSV handed to the cost analyzer.
    pub cost_model: PathBuf,
    /// Target architecture for cost analysis.
    pub arch: String,
    /// Inline threshold for cost analysis.
    pub inline_threshold: u32,
    /// Bounds file handed to the score evaluator.
    pub bounds_file: PathBuf,
    /// Upper bound on one whole invocation; on expiry all stages are killed
    /// and the measurement is recorded as missing.
    pub timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            opt_program: PathBuf::from("opt"),
            cost_program: PathBuf::from("gpscat-cost"),
            score_program: PathBuf::from("gpscat-score"),
            cost_model: PathBuf::from("costModel.csv"),
            arch: "wasm32".to_string(),
            inline_threshold: 1000,
            bounds_file: PathBuf::from("bounds"),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Errors that abort the run, as opposed to per-measurement failures which
/// surface as [`Score::Missing`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage binary could not be started. Every later measurement would
    /// fail identically, so this is fatal rather than a missing score.
    #[error("failed to start {stage} stage `{program}`: {source}")]
    Spawn {
        stage: &'static str,
        program: String,
        #[source]
        source: io::Error,
    },

    /// An intermediate output channel could not be handed to the next stage.
    #[error("failed to chain {stage} stage output: {source}")]
    Wire {
        stage: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Executes the optimize → cost-analyze → evaluate pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Measures one (module, flag-list) pair.
    ///
    /// Returns `Ok(Score::Missing)` whenever the evaluator's final output is
    /// not a finite number, including stage crashes and timeouts; only
    /// environment-level problems (a stage binary that cannot be spawned)
    /// propagate as errors.
    pub async fn measure(&self, module: &Path, flags: &[&str]) -> Result<Score, PipelineError> {
        debug!("measuring {} with {} flag(s)", module.display(), flags.len());

        let mut optimizer = Command::new(&self.config.opt_program)
            .arg(module)
            .args(flags)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_error("optimize", &self.config.opt_program, source))?;

        let optimizer_out = take_stdout(&mut optimizer, "optimize")?;
        let optimizer_errors = drain_stderr("optimize", &mut optimizer);

        let mut analyzer = Command::new(&self.config.cost_program)
            .arg(&self.config.cost_model)
            .arg(format!("-arch={}", self.config.arch))
            .arg("-replace-nat")
            .arg(format!("-inline={}", self.config.inline_threshold))
            .stdin(chain(optimizer_out, "optimize")?)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_error("cost analysis", &self.config.cost_program, source))?;

        let analyzer_out = take_stdout(&mut analyzer, "cost analysis")?;
        let analyzer_errors = drain_stderr("cost analysis", &mut analyzer);

        let evaluator = Command::new(&self.config.score_program)
            .arg(format!("-bounds-file={}", self.config.bounds_file.display()))
            .stdin(chain(analyzer_out, "cost analysis")?)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_error("score evaluation", &self.config.score_program, source))?;

        let score = match timeout(self.config.timeout, collect_score(optimizer, analyzer, evaluator)).await {
            Ok(score) => score,
            // Dropping the collect future drops the children, and
            // kill_on_drop reaps all three stages.
            Err(_) => {
                warn!(
                    "pipeline timed out after {:?} for {}; recording a missing score",
                    self.config.timeout,
                    module.display()
                );
                Score::Missing
            }
        };

        let _ = optimizer_errors.await;
        let _ = analyzer_errors.await;

        Ok(score)
    }

    fn spawn_error(&self, stage: &'static str, program: &Path, source: io::Error) -> PipelineError {
        PipelineError::Spawn {
            stage,
            program: program.display().to_string(),
            source,
        }
    }
}

/// Waits for the evaluator and parses its final output token.
///
/// Upstream stages are reaped afterwards; once the evaluator is gone their
/// output pipes are closed and they exit on their own.
async fn collect_score(mut optimizer: Child, mut analyzer: Child, evaluator: Child) -> Score {
    let output = match evaluator.wait_with_output().await {
        Ok(output) => output,
        Err(err) => {
            debug!("score evaluation stage failed: {err}");
            return Score::Missing;
        }
    };

    let _ = optimizer.wait().await;
    let _ = analyzer.wait().await;

    if !output.stderr.is_empty() {
        debug!(
            "score evaluation stderr: {}",
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    Score::parse(&String::from_utf8_lossy(&output.stdout))
}

fn take_stdout(child: &mut Child, stage: &'static str) -> Result<ChildStdout, PipelineError> {
    child.stdout.take().ok_or_else(|| PipelineError::Wire {
        stage,
        source: io::Error::other("stdout was not captured"),
    })
}

/// Hands a stage's output channel to the next stage's stdin.
///
/// The conversion moves the only parent-side handle into the spawned
/// consumer; without this the parent's duplicate would keep the pipe open and
/// the consumer would never see EOF.
fn chain(stdout: ChildStdout, stage: &'static str) -> Result<Stdio, PipelineError> {
    stdout.try_into().map_err(|source| PipelineError::Wire { stage, source })
}

/// Drains a stage's stderr so the process can always make progress; pipe
/// buffers are small and an unread stderr can wedge the whole chain.
fn drain_stderr(stage: &'static str, child: &mut Child) -> JoinHandle<()> {
    let stderr = child.stderr.take();
    tokio::spawn(async move {
        let Some(mut stderr) = stderr else { return };
        let mut buf = Vec::new();
        if stderr.read_to_end(&mut buf).await.is_ok() && !buf.is_empty() {
            debug!("{stage} stderr: {}", String::from_utf8_lossy(&buf).trim_end());
        }
    })
}
