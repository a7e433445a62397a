//! Note lifecycle operations.
//!
//! Each handler opens the configured store, runs one controller operation
//! for the configured user and writes the result to stdout as JSON.

use ghnotes::telemetry::StderrJsonlTelemetrySink;
use ghnotes::{GhNotesConfig, Note, NoteController, NoteError, NotePage};
use serde_json::json;

use super::output::write_json;
use super::{build_gateway, open_store};

/// Creates a note from the configured title, content and pull request
/// reference.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] if the user or database URL is
/// missing, plus any failure reported by the controller.
pub async fn create(config: &GhNotesConfig) -> Result<(), NoteError> {
    let note = create_note(config).await?;
    write_json(&note)
}

/// Overwrites the note named by `--note-id`.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] if the user, note ID or database URL
/// is missing, plus any failure reported by the controller.
pub async fn update(config: &GhNotesConfig) -> Result<(), NoteError> {
    let note = update_note(config).await?;
    write_json(&note)
}

/// Deletes the note named by `--note-id`.
///
/// # Errors
///
/// Returns [`NoteError::NotFound`] when the note does not exist for the user.
pub fn delete(config: &GhNotesConfig) -> Result<(), NoteError> {
    let note_id = config.require_note_id()?;
    delete_note(config)?;
    write_json(&json!({ "deleted": note_id }))
}

/// Shows the note named by `--note-id` with its linked pull requests.
///
/// # Errors
///
/// Returns [`NoteError::NotFound`] when the note does not exist for the user.
pub fn show(config: &GhNotesConfig) -> Result<(), NoteError> {
    let note = show_note(config)?;
    write_json(&note)
}

/// Lists the user's notes, applying the configured filters and page.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] if the user or database URL is
/// missing, or a storage failure.
pub fn list(config: &GhNotesConfig) -> Result<(), NoteError> {
    let page = list_notes(config)?;
    write_json(&page)
}

async fn create_note(config: &GhNotesConfig) -> Result<Note, NoteError> {
    let user = config.require_user()?;
    let request = config.note_request();
    let store = open_store(config)?;
    let gateway = build_gateway(config)?;
    let telemetry = StderrJsonlTelemetrySink;

    NoteController::new(&store, &gateway, &telemetry)
        .create(&user, &request)
        .await
}

async fn update_note(config: &GhNotesConfig) -> Result<Note, NoteError> {
    let user = config.require_user()?;
    let note_id = config.require_note_id()?;
    let request = config.note_request();
    let store = open_store(config)?;
    let gateway = build_gateway(config)?;
    let telemetry = StderrJsonlTelemetrySink;

    NoteController::new(&store, &gateway, &telemetry)
        .update(&user, note_id, &request)
        .await
}

fn delete_note(config: &GhNotesConfig) -> Result<(), NoteError> {
    let user = config.require_user()?;
    let note_id = config.require_note_id()?;
    let store = open_store(config)?;
    let gateway = build_gateway(config)?;
    let telemetry = StderrJsonlTelemetrySink;

    NoteController::new(&store, &gateway, &telemetry).delete(&user, note_id)
}

fn show_note(config: &GhNotesConfig) -> Result<Note, NoteError> {
    let user = config.require_user()?;
    let note_id = config.require_note_id()?;
    let store = open_store(config)?;
    let gateway = build_gateway(config)?;
    let telemetry = StderrJsonlTelemetrySink;

    NoteController::new(&store, &gateway, &telemetry).get(&user, note_id)
}

fn list_notes(config: &GhNotesConfig) -> Result<NotePage, NoteError> {
    let user = config.require_user()?;
    let store = open_store(config)?;
    let gateway = build_gateway(config)?;
    let telemetry = StderrJsonlTelemetrySink;

    NoteController::new(&store, &gateway, &telemetry).list(
        &user,
        &config.note_filter(),
        config.page_request(),
    )
}
