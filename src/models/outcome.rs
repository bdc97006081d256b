use camino::Utf8PathBuf;
use std::fmt;
use std::time::Duration;

/// A puzzle whose solution was written to the destination folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedPuzzle {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
    pub duration: Duration,
}

/// A puzzle the solver could not solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPuzzle {
    pub input: Utf8PathBuf,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Solver exited non-zero; both captured streams are kept for diagnosis
    ExitCode {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Solver was killed after exceeding the configured timeout
    TimedOut(Duration),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ExitCode { code, .. } => write!(f, "exit code {}", code),
            FailureReason::TimedOut(limit) => write!(f, "timed out after {:?}", limit),
        }
    }
}

/// Result of a complete pass over the source folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub solved: Vec<SolvedPuzzle>,
    pub failed: Vec<FailedPuzzle>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.solved.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
