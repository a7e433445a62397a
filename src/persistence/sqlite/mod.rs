//! `SQLite` implementation of the note, pull request and credential stores.
//!
//! Each operation opens its own connection with foreign keys enabled and a
//! busy timeout, so the store is cheap to clone and concurrent callers wait
//! for each other's locks instead of failing. Timestamps are
//! stored as RFC 3339 text with microsecond precision and identifiers as
//! hyphenated UUID text.

mod notes;
mod pull_requests;
mod users;


use chrono::{DateTime, SecondsFormat, Utc};
use diesel::Connection;
use diesel::OptionalExtension;
use diesel::connection::SimpleConnection;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;

use super::PersistenceError;
use super::records::{NoteId, PullRequestId};

/// Store backed by a local `SQLite` database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database_url: String,
}

impl SqliteStore {
    /// Create a store targeting the configured `database_url`.
    ///
    /// The database must already be migrated; operations against an
    /// unmigrated file fail with [`PersistenceError::SchemaNotInitialised`].
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BlankDatabaseUrl`] when the URL is blank.
    pub fn new(database_url: impl Into<String>) -> Result<Self, PersistenceError> {
        let database_url_string = database_url.into();
        let trimmed = database_url_string.trim();
        if trimmed.is_empty() {
            return Err(PersistenceError::BlankDatabaseUrl);
        }
        Ok(Self {
            database_url: trimmed.to_owned(),
        })
    }

    /// The database URL this store connects to.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    fn establish_connection(&self) -> Result<SqliteConnection, PersistenceError> {
        let mut connection = SqliteConnection::establish(&self.database_url).map_err(|error| {
            PersistenceError::ConnectionFailed {
                message: error.to_string(),
            }
        })?;

        configure_connection(&mut connection)?;
        Ok(connection)
    }
}

/// How long a connection waits on another connection's lock before
/// reporting `SQLITE_BUSY`.
pub(crate) const BUSY_TIMEOUT_MILLIS: u32 = 5_000;

/// Name of the SQL function that lowercases text with Unicode rules.
const FOLD_CASE_FUNCTION: &str = "fold_case";

/// Applies the per-connection settings: a busy timeout, the `fold_case`
/// function used by note search, then foreign key enforcement.
pub(crate) fn configure_connection(
    connection: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    connection
        .batch_execute(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MILLIS};"))
        .map_err(|error| PersistenceError::ConnectionFailed {
            message: format!("setting busy timeout failed: {error}"),
        })?;
    register_fold_case(connection)?;
    enable_foreign_keys(connection)
}

fn register_fold_case(connection: &mut SqliteConnection) -> Result<(), PersistenceError> {
    connection
        .register_sql_function::<(Text,), Text, _, _, _>(
            FOLD_CASE_FUNCTION,
            true,
            |(text,): (String,)| text.to_lowercase(),
        )
        .map_err(|error| PersistenceError::ConnectionFailed {
            message: format!("registering {FOLD_CASE_FUNCTION} failed: {error}"),
        })
}

/// Switches the database file to write-ahead logging. The mode is stored in
/// the file, so this only needs to run once per database.
pub(crate) fn enable_write_ahead_log(
    connection: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    connection
        .batch_execute("PRAGMA journal_mode = WAL;")
        .map_err(|error| PersistenceError::ConnectionFailed {
            message: format!("enabling write-ahead logging failed: {error}"),
        })
}

/// Turns on foreign key enforcement for `connection`.
pub(crate) fn enable_foreign_keys(
    connection: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    sql_query("PRAGMA foreign_keys = ON;")
        .execute(connection)
        .map(drop)
        .map_err(|error| PersistenceError::ForeignKeysEnableFailed {
            message: error.to_string(),
        })
}

fn table_exists(connection: &mut SqliteConnection, table: &str) -> Result<bool, DieselError> {
    #[derive(Debug, QueryableByName)]
    struct Row {
        #[diesel(sql_type = BigInt)]
        one: i64,
    }

    let exists: Option<Row> =
        sql_query("SELECT 1 AS one FROM sqlite_master WHERE type = 'table' AND name = ? LIMIT 1;")
            .bind::<Text, _>(table)
            .get_result(connection)
            .optional()?;

    Ok(exists.is_some_and(|row| row.one == 1))
}

fn map_error_with_schema_check<F>(
    connection: &mut SqliteConnection,
    table: &str,
    error: &DieselError,
    create_error: F,
) -> PersistenceError
where
    F: Fn(String) -> PersistenceError,
{
    match table_exists(connection, table) {
        Ok(false) => PersistenceError::SchemaNotInitialised,
        Ok(true) => create_error(error.to_string()),
        Err(check_error) => create_error(format!(
            "schema presence check failed: {check_error}; original error: {error}"
        )),
    }
}

fn map_query_error(
    connection: &mut SqliteConnection,
    table: &str,
    error: &DieselError,
) -> PersistenceError {
    map_error_with_schema_check(connection, table, error, |message| {
        PersistenceError::QueryFailed { message }
    })
}

fn map_write_error(
    connection: &mut SqliteConnection,
    table: &str,
    error: &DieselError,
) -> PersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = error {
        return PersistenceError::UniqueViolation {
            message: info.message().to_owned(),
        };
    }
    map_error_with_schema_check(connection, table, error, |message| {
        PersistenceError::WriteFailed { message }
    })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| PersistenceError::CorruptRow {
            message: format!("{column}: {error}"),
        })
}

fn parse_note_id(value: &str) -> Result<NoteId, PersistenceError> {
    NoteId::parse(value).map_err(|error| PersistenceError::CorruptRow {
        message: format!("notes.id: {error}"),
    })
}

fn parse_pull_request_id(value: &str) -> Result<PullRequestId, PersistenceError> {
    PullRequestId::parse(value).map_err(|error| PersistenceError::CorruptRow {
        message: format!("pull_requests.id: {error}"),
    })
}

fn number_to_i64(number: u64) -> i64 {
    i64::try_from(number).unwrap_or(i64::MAX)
}

fn number_from_i64(column: &str, value: i64) -> Result<u64, PersistenceError> {
    u64::try_from(value).map_err(|_| PersistenceError::CorruptRow {
        message: format!("{column}: negative value {value}"),
    })
}
