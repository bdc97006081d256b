use crate::console::{Color, Console};
use crate::metrics::Metrics;
use crate::models::{
    BatchConfig, BatchSummary, FailedPuzzle, FailurePolicy, FailureReason, SolvedPuzzle,
};
use crate::services::discovery::discover_puzzles;
use crate::services::solver::{Solver, SolverError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use thiserror::Error;

/// Errors that end a batch run
///
/// Each variant corresponds to one way the run can stop. The expected
/// outcomes (missing folders, solver failures) have already been printed
/// when they are returned; the faults have not.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Source folder not found: {0}")]
    SourceNotFound(Utf8PathBuf),

    #[error("Destination folder not found: {0}")]
    DestinationNotFound(Utf8PathBuf),

    #[error("Failed to solve {} ({})", .0.input, .0.reason)]
    SolverFailed(Box<FailedPuzzle>),

    #[error("{} of {} puzzles failed to solve", .0.failed.len(), .0.total())]
    Incomplete(Box<BatchSummary>),

    #[error("Failed to read source folder {path}: {source}")]
    ReadSource {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Solver error on {puzzle}: {source}")]
    Solver {
        puzzle: Utf8PathBuf,
        #[source]
        source: SolverError,
    },

    #[error("Failed to write solution {path}: {source}")]
    WriteSolution {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to console: {0}")]
    Console(#[from] io::Error),
}

impl BatchError {
    /// Whether the console already described this error to the user
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            BatchError::SourceNotFound(_)
                | BatchError::DestinationNotFound(_)
                | BatchError::SolverFailed(_)
                | BatchError::Incomplete(_)
        )
    }
}

/// Where to read puzzles, where to store solutions, and what to do on failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub source_dir: Utf8PathBuf,
    pub dest_dir: Utf8PathBuf,
    pub extension: String,
    pub failure_policy: FailurePolicy,
}

impl BatchSettings {
    /// Settings for `*.txt` puzzles with the halt-on-first-failure policy
    pub fn new(source_dir: impl Into<Utf8PathBuf>, dest_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            extension: "txt".to_string(),
            failure_policy: FailurePolicy::Halt,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            dest_dir: config.dest_dir.clone(),
            extension: config.extension.clone(),
            failure_policy: config.failure_policy,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

enum PuzzleOutcome {
    Solved(SolvedPuzzle),
    Failed(FailedPuzzle),
}

/// Runs the solver over every puzzle in the source folder
///
/// Puzzles are solved one at a time, in file name order. Each successful
/// solve writes the solver's stdout verbatim to a file of the same name in
/// the destination folder, overwriting any previous solution. Under
/// [`FailurePolicy::Halt`] the first failure stops the batch; solutions
/// written before it are kept.
pub struct BatchRunner<S: Solver, W: Write> {
    solver: S,
    settings: BatchSettings,
    console: Console<W>,
    metrics: Metrics,
}

impl<S: Solver, W: Write> BatchRunner<S, W> {
    pub fn new(solver: S, settings: BatchSettings, console: Console<W>) -> Self {
        Self {
            solver,
            settings,
            console,
            metrics: Metrics::new(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }

    /// Solve the whole batch.
    ///
    /// # Errors
    ///
    /// - [`BatchError::SourceNotFound`] / [`BatchError::DestinationNotFound`]
    ///   before any solver is started
    /// - [`BatchError::SolverFailed`] on the first failure under `Halt`
    /// - [`BatchError::Incomplete`] after a `Continue` run with failures
    /// - I/O and spawn faults as their own variants
    pub async fn run(&mut self) -> Result<BatchSummary, BatchError> {
        let start = Instant::now();
        let source_dir = self.settings.source_dir.clone();
        let dest_dir = self.settings.dest_dir.clone();

        if !source_dir.is_dir() {
            tracing::error!("Source folder not found: {}", source_dir);
            self.console.line("Source folder not found.")?;
            return Err(BatchError::SourceNotFound(source_dir));
        }
        if !dest_dir.is_dir() {
            tracing::error!("Destination folder not found: {}", dest_dir);
            self.console.line("Destination folder not found.")?;
            return Err(BatchError::DestinationNotFound(dest_dir));
        }

        let discovery = discover_puzzles(&source_dir, &self.settings.extension).map_err(
            |source| BatchError::ReadSource {
                path: source_dir.clone(),
                source,
            },
        )?;
        self.metrics.record_skipped(discovery.skipped.len());

        tracing::info!(
            "Solving {} puzzles from {} into {} (policy: {:?})",
            discovery.puzzles.len(),
            source_dir,
            dest_dir,
            self.settings.failure_policy
        );

        let mut summary = BatchSummary::default();

        for puzzle in &discovery.puzzles {
            match self.solve_puzzle(puzzle).await? {
                PuzzleOutcome::Solved(solved) => summary.solved.push(solved),
                PuzzleOutcome::Failed(failed) => match self.settings.failure_policy {
                    FailurePolicy::Halt => {
                        tracing::error!("Halting batch after failure on {}", failed.input);
                        self.metrics.log_summary();
                        return Err(BatchError::SolverFailed(Box::new(failed)));
                    }
                    FailurePolicy::Continue => summary.failed.push(failed),
                },
            }
        }

        summary.elapsed = start.elapsed();
        self.metrics.log_summary();

        if summary.is_complete() {
            let done = self.console.paint(Color::Green, "Done.");
            self.console.line(done)?;
            Ok(summary)
        } else {
            let finished = self.console.paint(
                Color::Red,
                format!("Finished with {} failure(s).", summary.failed.len()),
            );
            self.console.line(finished)?;
            Err(BatchError::Incomplete(Box::new(summary)))
        }
    }

    async fn solve_puzzle(&mut self, puzzle: &Utf8Path) -> Result<PuzzleOutcome, BatchError> {
        let label = format!("{}: ", self.console.quote(puzzle));
        self.console.write(label)?;

        let start = Instant::now();
        let result = self.solver.solve(puzzle).await;
        let duration = start.elapsed();

        let output = match result {
            Ok(output) => output,
            Err(SolverError::Timeout(limit)) => {
                let message = self
                    .console
                    .paint(Color::Red, format!("Timed out after {:?}", limit));
                self.console.line(message)?;
                self.metrics.record_failed(duration);
                return Ok(PuzzleOutcome::Failed(FailedPuzzle {
                    input: puzzle.to_path_buf(),
                    reason: FailureReason::TimedOut(limit),
                }));
            }
            Err(source) => {
                let message = self.console.paint(Color::Red, "Failed to run solver");
                self.console.line(message)?;
                tracing::error!("Solver error on {}: {}", puzzle, source);
                return Err(BatchError::Solver {
                    puzzle: puzzle.to_path_buf(),
                    source,
                });
            }
        };

        if !output.success() {
            tracing::error!(
                "Solver failed on {} with exit code {}",
                puzzle,
                output.exit_code
            );
            let headline = format!(
                "{}{}{}",
                self.console.paint(Color::Red, "Failed to solve with exit code "),
                self.console.quote(output.exit_code.to_string()),
                self.console.paint(Color::Red, ":")
            );
            self.console.line(headline)?;
            self.console.line(&output.stdout)?;
            let stderr = self.console.paint(Color::Red, &output.stderr);
            self.console.line(stderr)?;

            self.metrics.record_failed(duration);
            return Ok(PuzzleOutcome::Failed(FailedPuzzle {
                input: puzzle.to_path_buf(),
                reason: FailureReason::ExitCode {
                    code: output.exit_code,
                    stdout: output.stdout,
                    stderr: output.stderr,
                },
            }));
        }

        let solved = format!("{} -> ", self.console.paint(Color::Green, "Solved"));
        self.console.write(solved)?;

        let output_path = self
            .settings
            .dest_dir
            .join(puzzle.file_name().unwrap_or_default());
        fs::write(&output_path, &output.stdout).map_err(|source| BatchError::WriteSolution {
            path: output_path.clone(),
            source,
        })?;

        let stored = format!("Stored to {}", self.console.quote(&output_path));
        self.console.line(stored)?;

        tracing::info!("Solved {} -> {}", puzzle, output_path);
        self.metrics.record_solved(duration);

        Ok(PuzzleOutcome::Solved(SolvedPuzzle {
            input: puzzle.to_path_buf(),
            output: output_path,
            duration,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::solver::{MockSolver, SolverOutput};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Folders {
        _temp_dir: TempDir,
        source: Utf8PathBuf,
        dest: Utf8PathBuf,
    }

    fn folders(puzzles: &[&str]) -> Folders {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let source = root.join("levels");
        let dest = root.join("solutions");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&dest).unwrap();
        for name in puzzles {
            fs::write(source.join(name), "12\n34\n").unwrap();
        }
        Folders {
            _temp_dir: temp_dir,
            source,
            dest,
        }
    }

    fn solution_for(puzzle: &Utf8Path) -> String {
        format!("solution for {}\n", puzzle.file_name().unwrap())
    }

    fn ok_output(puzzle: &Utf8Path) -> SolverOutput {
        SolverOutput {
            exit_code: 0,
            stdout: solution_for(puzzle),
            stderr: String::new(),
        }
    }

    fn failing_on(
        name: &'static str,
    ) -> impl Fn(&Utf8Path) -> Result<SolverOutput, SolverError> + Send + 'static {
        move |puzzle| {
            if puzzle.file_name() == Some(name) {
                Ok(SolverOutput {
                    exit_code: 2,
                    stdout: "partial\n".to_string(),
                    stderr: "Bad input: non-int character given as input!\n".to_string(),
                })
            } else {
                Ok(ok_output(puzzle))
            }
        }
    }

    fn runner(
        solver: MockSolver,
        settings: BatchSettings,
    ) -> BatchRunner<MockSolver, Vec<u8>> {
        BatchRunner::new(solver, settings, Console::new(Vec::new(), false))
    }

    fn transcript(runner: BatchRunner<MockSolver, Vec<u8>>) -> String {
        String::from_utf8(runner.into_console().into_inner()).unwrap()
    }

    fn stored(dest: &Utf8Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_missing_source_spawns_nothing() {
        let f = folders(&[]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(0);

        let mut runner = runner(solver, BatchSettings::new(f.source.join("nope"), &f.dest));
        let err = runner.run().await.unwrap_err();

        assert!(matches!(err, BatchError::SourceNotFound(_)));
        assert_eq!(transcript(runner), "Source folder not found.\n");
        assert!(stored(&f.dest).is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_spawns_nothing() {
        let f = folders(&["a.txt"]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(0);

        let mut runner = runner(solver, BatchSettings::new(&f.source, f.dest.join("nope")));
        let err = runner.run().await.unwrap_err();

        assert!(matches!(err, BatchError::DestinationNotFound(_)));
        assert_eq!(transcript(runner), "Destination folder not found.\n");
    }

    #[tokio::test]
    async fn test_source_that_is_a_file_is_not_found() {
        let f = folders(&["a.txt"]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(0);

        let mut runner = runner(solver, BatchSettings::new(f.source.join("a.txt"), &f.dest));
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, BatchError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_all_solved_writes_each_solution() {
        let f = folders(&["a.txt", "b.txt", "readme.md"]);
        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .times(2)
            .returning(|puzzle| Ok(ok_output(puzzle)));

        let mut runner = runner(solver, BatchSettings::new(&f.source, &f.dest));
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.solved.len(), 2);
        assert!(summary.is_complete());
        assert_eq!(stored(&f.dest), vec!["a.txt", "b.txt"]);
        assert_eq!(
            fs::read_to_string(f.dest.join("a.txt")).unwrap(),
            "solution for a.txt\n"
        );
        assert_eq!(runner.metrics().puzzles_solved.load(Ordering::Relaxed), 2);
        assert!(transcript(runner).ends_with("Done.\n"));
    }

    #[tokio::test]
    async fn test_success_transcript() {
        let f = folders(&["a.txt"]);
        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .times(1)
            .returning(|puzzle| Ok(ok_output(puzzle)));

        let mut runner = runner(solver, BatchSettings::new(&f.source, &f.dest));
        runner.run().await.unwrap();

        let expected = format!(
            "\"{}\": Solved -> Stored to \"{}\"\nDone.\n",
            f.source.join("a.txt"),
            f.dest.join("a.txt")
        );
        assert_eq!(transcript(runner), expected);
    }

    #[tokio::test]
    async fn test_halts_on_first_failure() {
        let f = folders(&["a.txt", "b.txt", "c.txt"]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(2).returning(failing_on("b.txt"));

        let mut runner = runner(solver, BatchSettings::new(&f.source, &f.dest));
        let err = runner.run().await.unwrap_err();

        match err {
            BatchError::SolverFailed(failed) => {
                assert_eq!(failed.input, f.source.join("b.txt"));
                assert!(matches!(failed.reason, FailureReason::ExitCode { code: 2, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stored(&f.dest), vec!["a.txt"]);

        let text = transcript(runner);
        assert!(text.contains("Failed to solve with exit code \"2\":\npartial\n\n"));
        assert!(text.contains("Bad input: non-int character given as input!\n"));
        assert!(!text.contains("Done."));
    }

    #[tokio::test]
    async fn test_colored_failure_transcript() {
        let f = folders(&["b.txt"]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(1).returning(failing_on("b.txt"));

        let console = Console::new(Vec::new(), true);
        let mut runner = BatchRunner::new(solver, BatchSettings::new(&f.source, &f.dest), console);
        runner.run().await.unwrap_err();

        let expected = format!(
            concat!(
                "\x1b[33m\"{}\"\x1b[0m: ",
                "\x1b[31mFailed to solve with exit code \x1b[0m",
                "\x1b[33m\"2\"\x1b[0m",
                "\x1b[31m:\x1b[0m\n",
                "partial\n\n",
                "\x1b[31mBad input: non-int character given as input!\n\x1b[0m\n",
            ),
            f.source.join("b.txt")
        );
        assert_eq!(transcript(runner), expected);
    }

    #[tokio::test]
    async fn test_colored_success_transcript() {
        let f = folders(&["a.txt"]);
        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .times(1)
            .returning(|puzzle| Ok(ok_output(puzzle)));

        let console = Console::new(Vec::new(), true);
        let mut runner = BatchRunner::new(solver, BatchSettings::new(&f.source, &f.dest), console);
        runner.run().await.unwrap();

        let expected = format!(
            "\x1b[33m\"{}\"\x1b[0m: \x1b[32mSolved\x1b[0m -> Stored to \x1b[33m\"{}\"\x1b[0m\n\x1b[32mDone.\x1b[0m\n",
            f.source.join("a.txt"),
            f.dest.join("a.txt")
        );
        assert_eq!(transcript(runner), expected);
    }

    #[tokio::test]
    async fn test_continue_policy_attempts_every_puzzle() {
        let f = folders(&["a.txt", "b.txt", "c.txt"]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(3).returning(failing_on("b.txt"));

        let settings =
            BatchSettings::new(&f.source, &f.dest).with_failure_policy(FailurePolicy::Continue);
        let mut runner = runner(solver, settings);
        let err = runner.run().await.unwrap_err();

        match err {
            BatchError::Incomplete(summary) => {
                assert_eq!(summary.solved.len(), 2);
                assert_eq!(summary.failed.len(), 1);
                assert_eq!(summary.failed[0].input, f.source.join("b.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stored(&f.dest), vec!["a.txt", "c.txt"]);
        assert!(transcript(runner).ends_with("Finished with 1 failure(s).\n"));
    }

    #[tokio::test]
    async fn test_timeout_is_a_solver_failure() {
        let f = folders(&["a.txt", "b.txt"]);
        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .times(1)
            .returning(|_| Err(SolverError::Timeout(Duration::from_secs(1))));

        let mut runner = runner(solver, BatchSettings::new(&f.source, &f.dest));
        let err = runner.run().await.unwrap_err();

        match err {
            BatchError::SolverFailed(failed) => {
                assert_eq!(failed.reason, FailureReason::TimedOut(Duration::from_secs(1)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(stored(&f.dest).is_empty());
    }

    #[tokio::test]
    async fn test_spawn_error_is_fatal_under_continue() {
        let f = folders(&["a.txt", "b.txt"]);
        let mut solver = MockSolver::new();
        solver.expect_solve().times(1).returning(|_| {
            Err(SolverError::Spawn {
                program: Utf8PathBuf::from("./kamiSolver"),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            })
        });

        let settings =
            BatchSettings::new(&f.source, &f.dest).with_failure_policy(FailurePolicy::Continue);
        let mut runner = runner(solver, settings);
        let err = runner.run().await.unwrap_err();

        assert!(matches!(err, BatchError::Solver { .. }));
    }

    #[tokio::test]
    async fn test_directory_named_like_a_puzzle_is_skipped() {
        let f = folders(&["a.txt"]);
        fs::create_dir(f.source.join("foo.txt")).unwrap();

        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .withf(|puzzle| puzzle.file_name() == Some("a.txt"))
            .times(1)
            .returning(|puzzle| Ok(ok_output(puzzle)));

        let mut runner = runner(solver, BatchSettings::new(&f.source, &f.dest));
        runner.run().await.unwrap();

        assert_eq!(stored(&f.dest), vec!["a.txt"]);
        assert_eq!(runner.metrics().entries_skipped.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_existing_solution_is_overwritten() {
        let f = folders(&["a.txt"]);
        fs::write(f.dest.join("a.txt"), "stale").unwrap();

        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .times(1)
            .returning(|puzzle| Ok(ok_output(puzzle)));

        let mut runner = runner(solver, BatchSettings::new(&f.source, &f.dest));
        runner.run().await.unwrap();

        assert_eq!(
            fs::read_to_string(f.dest.join("a.txt")).unwrap(),
            "solution for a.txt\n"
        );
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = BatchConfig::default();
        config.extension = "kami".to_string();
        config.failure_policy = FailurePolicy::Continue;

        let settings = BatchSettings::from_config(&config);
        assert_eq!(settings.source_dir, "3ds_levels");
        assert_eq!(settings.dest_dir, "3ds_solutions");
        assert_eq!(settings.extension, "kami");
        assert_eq!(settings.failure_policy, FailurePolicy::Continue);
    }
}
