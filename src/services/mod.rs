//! Services module - the batch logic behind the `kami-batch` binary.
//!
//! # Components
//!
//! - [`BatchRunner`]: walks the source folder and solves one puzzle at a time:
//!   - Checks that the source and destination folders exist before doing anything
//!   - Invokes the solver per puzzle and stores its stdout under the same file name
//!   - Applies the [`FailurePolicy`](crate::models::FailurePolicy) when a solve fails
//!
//! - [`discover_puzzles`]: flat, extension-filtered listing of the source folder
//!
//! - [`Solver`]: the seam between the runner and the external solver. [`ProcessSolver`]
//!   runs the real `kamiSolver` binary as `<exe> -c0 -borders <puzzle>`; tests substitute
//!   their own implementation.
//!
//! # Usage Example
//!
//! ```ignore
//! use kami_batch::console::{ColorMode, Console};
//! use kami_batch::services::{BatchRunner, BatchSettings, ProcessSolver};
//!
//! let solver = ProcessSolver::new("./kamiSolver", vec!["-c0".into(), "-borders".into()]);
//! let settings = BatchSettings::new("3ds_levels", "3ds_solutions");
//! let mut runner = BatchRunner::new(solver, settings, Console::stdout(ColorMode::Auto));
//!
//! let summary = runner.run().await?;
//! ```

pub mod batch;
pub mod discovery;
pub mod solver;

pub use batch::{BatchError, BatchRunner, BatchSettings};
pub use discovery::{Discovery, discover_puzzles, matches_extension};
pub use solver::{ProcessSolver, Solver, SolverError, SolverOutput};
