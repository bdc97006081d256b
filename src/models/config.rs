use crate::console::ColorMode;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch configuration from kami-batch.yaml
///
/// Every field has a default, so a partial file (or no file at all) is valid.
/// The defaults reproduce the fixed layout the tool was built around:
/// `3ds_levels/*.txt` solved into `3ds_solutions/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub source_dir: Utf8PathBuf,
    pub dest_dir: Utf8PathBuf,

    /// Puzzle file extension, without the leading dot
    pub extension: String,

    pub failure_policy: FailurePolicy,
    pub color: ColorMode,
    pub solver: SolverSettings,
    pub logging: LoggingSettings,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_dir: Utf8PathBuf::from("3ds_levels"),
            dest_dir: Utf8PathBuf::from("3ds_solutions"),
            extension: "txt".to_string(),
            failure_policy: FailurePolicy::default(),
            color: ColorMode::default(),
            solver: SolverSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// What the runner does after a puzzle fails to solve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole batch on the first failure
    #[default]
    Halt,
    /// Report the failure and move on to the next puzzle
    Continue,
}

/// How to invoke the external solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub executable: Utf8PathBuf,

    /// Arguments placed before the puzzle path
    pub args: Vec<String>,

    /// Per-puzzle limit; `None` waits for the solver indefinitely
    pub timeout_secs: Option<u64>,
}

impl SolverSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            executable: Utf8PathBuf::from("./kamiSolver"),
            args: vec!["-c0".to_string(), "-borders".to_string()],
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_dir: Utf8PathBuf,
    pub log_prefix: String,
    pub debug: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: Utf8PathBuf::from("logs"),
            log_prefix: "kami-batch".to_string(),
            debug: false,
        }
    }
}
