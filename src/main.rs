//! Ghnotes CLI entrypoint for managing notes linked to pull requests.

use std::io::{self, Write};
use std::process::ExitCode;

use ghnotes::{GhNotesConfig, NoteError, OperationMode};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), NoteError> {
    let config = load_config()?;

    match config.operation_mode()? {
        OperationMode::MigrateDatabase => cli::migrations::run(&config),
        OperationMode::CreateNote => cli::notes::create(&config).await,
        OperationMode::UpdateNote => cli::notes::update(&config).await,
        OperationMode::DeleteNote => cli::notes::delete(&config),
        OperationMode::ShowNote => cli::notes::show(&config),
        OperationMode::ListNotes => cli::notes::list(&config),
        OperationMode::UpdateProfile => cli::profile::run(&config),
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<GhNotesConfig, NoteError> {
    GhNotesConfig::load().map_err(|error| NoteError::Configuration {
        message: error.to_string(),
    })
}

/// Sends diagnostics to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
