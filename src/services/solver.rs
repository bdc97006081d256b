use crate::models::SolverSettings;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Captured result of one solver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutput {
    /// Process exit code; `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl SolverOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors that keep the solver from producing an exit status
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Failed to start solver {program}: {source}")]
    Spawn {
        program: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for solver: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// Anything that turns a puzzle file into captured solver output.
///
/// The batch runner only talks to this trait, so it can be driven without
/// a real solver binary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(&self, puzzle: &Utf8Path) -> Result<SolverOutput, SolverError>;
}

/// Solver backed by the external `kamiSolver` executable
///
/// Runs `<executable> <args...> <puzzle>` with stdin closed and both output
/// streams captured. The child is killed if the future is dropped, which is
/// how both the timeout and Ctrl-C tear it down.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    executable: Utf8PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessSolver {
    pub fn new(executable: impl Into<Utf8PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
            timeout: None,
        }
    }

    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self::new(settings.executable.clone(), settings.args.clone())
            .with_timeout(settings.timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full argument vector for a puzzle, program first
    pub fn command_line(&self, puzzle: &Utf8Path) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args.len() + 2);
        line.push(self.executable.to_string());
        line.extend(self.args.iter().cloned());
        line.push(puzzle.to_string());
        line
    }

    fn build_command(&self, puzzle: &Utf8Path) -> Command {
        let mut cmd = Command::new(self.executable.as_std_path());
        cmd.args(&self.args)
            .arg(puzzle.as_std_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Solver for ProcessSolver {
    async fn solve(&self, puzzle: &Utf8Path) -> Result<SolverOutput, SolverError> {
        tracing::debug!("Executing: {}", self.command_line(puzzle).join(" "));

        let start = Instant::now();

        let child = self
            .build_command(puzzle)
            .spawn()
            .map_err(|source| SolverError::Spawn {
                program: self.executable.clone(),
                source,
            })?;

        let output = match self.timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    tracing::warn!("Solver timed out after {:?} on {}", limit, puzzle);
                    SolverError::Timeout(limit)
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(SolverError::Wait)?;

        let exit_code = output.status.code().unwrap_or(-1);

        tracing::info!(
            "Solver finished {} in {:.2}s with exit code {}",
            puzzle,
            start.elapsed().as_secs_f32(),
            exit_code
        );

        Ok(SolverOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
