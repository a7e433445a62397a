//! Database migration operations.

use ghnotes::persistence::migrate_database;
use ghnotes::telemetry::StderrJsonlTelemetrySink;
use ghnotes::{GhNotesConfig, NoteError};

/// Runs database migrations.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] if the database URL is missing or blank.
/// Returns [`NoteError::Storage`] for connection or migration failures.
pub fn run(config: &GhNotesConfig) -> Result<(), NoteError> {
    let database_url = config.require_database_url()?;

    let telemetry = StderrJsonlTelemetrySink;
    let version = migrate_database(database_url, &telemetry)
        .map_err(|error| NoteError::from_persistence(&error))?;
    tracing::info!("database schema is at version {}", version.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use ghnotes::{GhNotesConfig, NoteError};
    use rstest::rstest;
    use tempfile::TempDir;

    use super::run;

    #[rstest]
    #[case::missing_database_url(None, "database URL is required")]
    #[case::blank_database_url(Some("   ".to_owned()), "database URL must not be blank")]
    fn migrate_db_rejects_invalid_database_url(
        #[case] database_url: Option<String>,
        #[case] expected_message_prefix: &str,
    ) {
        let config = GhNotesConfig {
            database_url,
            migrate_db: true,
            ..Default::default()
        };

        let result = run(&config);

        match result {
            Err(NoteError::Configuration { message }) => {
                assert!(
                    message.starts_with(expected_message_prefix),
                    "expected message starting with {expected_message_prefix:?}, got {message:?}"
                );
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[rstest]
    fn migrate_db_creates_the_schema() {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let database_path = temp_dir.path().join("ghnotes.sqlite");
        let config = GhNotesConfig {
            database_url: Some(database_path.display().to_string()),
            migrate_db: true,
            ..Default::default()
        };

        run(&config).expect("migrations should apply");
        run(&config).expect("re-running migrations should be a no-op");

        assert!(database_path.exists(), "database file should exist");
    }
}
