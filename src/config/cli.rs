use crate::config::DEFAULT_CONFIG_FILE;
use crate::console::ColorMode;
use crate::models::{BatchConfig, FailurePolicy};
use camino::Utf8PathBuf;
use clap::Parser;

/// Command-line options. Every option is an override of the config file,
/// so running with no arguments performs the default batch.
#[derive(Debug, Clone, Parser)]
#[command(name = "kami-batch", version)]
#[command(about = "Solve every puzzle in a folder with kamiSolver and store the solutions")]
pub struct Cli {
    /// YAML config file (optional)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: Utf8PathBuf,

    /// Folder containing the puzzle files
    #[arg(short, long)]
    pub source: Option<Utf8PathBuf>,

    /// Folder receiving the solutions
    #[arg(short, long)]
    pub dest: Option<Utf8PathBuf>,

    /// Solver executable
    #[arg(long)]
    pub solver: Option<Utf8PathBuf>,

    /// Puzzle file extension, without the dot
    #[arg(long)]
    pub extension: Option<String>,

    /// Kill the solver after this many seconds per puzzle
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep solving after a failure instead of stopping the batch
    #[arg(long)]
    pub keep_going: bool,

    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Debug logging, mirrored to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Cli {
    /// Apply the command-line overrides on top of a loaded config
    pub fn apply(&self, config: &mut BatchConfig) {
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(dest) = &self.dest {
            config.dest_dir = dest.clone();
        }
        if let Some(solver) = &self.solver {
            config.solver.executable = solver.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(timeout) = self.timeout {
            config.solver.timeout_secs = Some(timeout);
        }
        if self.keep_going {
            config.failure_policy = FailurePolicy::Continue;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if self.verbose {
            config.logging.debug = true;
        }
    }
}
