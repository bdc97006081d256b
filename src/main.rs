//! kami-batch - solve every puzzle in a folder with kamiSolver
//!
//! Main entry point for the command-line tool.
//!
//! # Execution Flow
//!
//! 1. Parse command-line overrides ([`Cli`])
//! 2. Load `kami-batch.yaml` if present, otherwise use defaults
//! 3. Initialize logging → logs/kami-batch.<date>, then log where the config came from
//! 4. Build a current-thread tokio runtime (one solver runs at a time)
//! 5. Run the batch, racing it against Ctrl-C
//!
//! With no arguments and no config file this solves `3ds_levels/*.txt` with
//! `./kamiSolver -c0 -borders <file>` into `3ds_solutions/`.
//!
//! # Exit status
//!
//! `0` when every puzzle was solved, `1` otherwise.

use anyhow::Result;
use clap::Parser;
use kami_batch::config::Cli;
use kami_batch::{
    APP_NAME, BatchRunner, BatchSettings, ConfigManager, Console, ProcessSolver, VERSION,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("Fatal error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config);
    let (mut config, origin) = config_manager.load_config()?;
    cli.apply(&mut config);

    // The log directory is part of the config, so logging starts after loading
    let _guard = kami_batch::logging::setup_logging(&config.logging, cli.verbose)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    config_manager.log_origin(origin);

    if cli.write_config {
        config_manager.save_config(&config)?;
        println!("Wrote {}", config_manager.config_path());
        return Ok(true);
    }
    tracing::debug!("Effective config: {:?}", config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let solver = ProcessSolver::from_settings(&config.solver);
    let settings = BatchSettings::from_config(&config);
    let mut runner = BatchRunner::new(solver, settings, Console::stdout(config.color));

    let solved = runtime.block_on(async {
        tokio::select! {
            result = runner.run() => match result {
                Ok(summary) => {
                    tracing::info!(
                        "Batch complete: {} puzzles solved in {:.2}s",
                        summary.solved.len(),
                        summary.elapsed.as_secs_f64()
                    );
                    true
                }
                Err(e) => {
                    tracing::error!("Batch failed: {}", e);
                    if !e.is_reported() {
                        eprintln!();
                        eprintln!("Error: {}", e);
                    }
                    false
                }
            },
            _ = tokio::signal::ctrl_c() => {
                // Dropping the batch future kills the running solver
                tracing::warn!("Interrupted, stopping batch");
                eprintln!();
                eprintln!("Interrupted.");
                false
            }
        }
    });

    tracing::info!("Shutdown complete");
    Ok(solved)
}
