//! Data models for kami-batch.
//!
//! - [`BatchConfig`]: settings loaded from `kami-batch.yaml` (paths, solver invocation,
//!   failure policy, logging)
//! - [`BatchSummary`]: what a finished batch solved, and what failed under
//!   [`FailurePolicy::Continue`]
//! - [`FailedPuzzle`] / [`FailureReason`]: why a single puzzle did not produce a solution

pub mod config;
pub mod outcome;

pub use config::{BatchConfig, FailurePolicy, LoggingSettings, SolverSettings};
pub use outcome::{BatchSummary, FailedPuzzle, FailureReason, SolvedPuzzle};
