// kami-batch - batch runner for the kamiSolver puzzle solver
//
// This is the library crate containing the batch logic and data structures.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod console;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use console::{ColorMode, Console};
pub use models::{BatchConfig, BatchSummary, FailurePolicy};
pub use services::{BatchError, BatchRunner, BatchSettings, ProcessSolver, Solver};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
