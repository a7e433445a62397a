//! Create, update, delete and read operations on notes.

use crate::github::PullRequestGateway;
use crate::persistence::{
    CredentialStore, NoteFilter, NoteId, NoteRecord, NoteStore, PageRequest, PullRequestStore,
    UserId, now,
};
use crate::telemetry::TelemetrySink;

use super::associations::AssociationManager;
use super::error::map_persistence_error;
use super::model::{Note, NotePage, NoteRequest};
use super::NoteError;

/// Orchestrates the note lifecycle for an already-authenticated user.
///
/// Every operation is scoped to the acting user: notes owned by someone else
/// are reported as [`NoteError::NotFound`].
pub struct NoteController<'a, S: ?Sized, G: ?Sized> {
    store: &'a S,
    associations: AssociationManager<'a, S, G>,
}

impl<'a, S, G> NoteController<'a, S, G>
where
    S: PullRequestStore + NoteStore + CredentialStore + ?Sized,
    G: PullRequestGateway + ?Sized,
{
    /// Creates a controller over `store`, fetching pull requests through
    /// `gateway`.
    #[must_use]
    pub const fn new(store: &'a S, gateway: &'a G, telemetry: &'a dyn TelemetrySink) -> Self {
        Self {
            store,
            associations: AssociationManager::new(store, gateway, telemetry),
        }
    }

    /// Creates a note, linking it to the referenced pull request if any.
    ///
    /// The pull request is resolved before the note row is written, so a
    /// failed resolution leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::InvalidArgument`] for an invalid title or partial
    /// reference, [`NoteError::PreconditionFailed`] when a reference is given
    /// but the user has no stored token, and resolver or storage failures.
    pub async fn create(&self, user_id: &UserId, request: &NoteRequest) -> Result<Note, NoteError> {
        let title = request.validated_title()?;
        let reference = request.pull_request_ref()?;
        let target = self
            .associations
            .prepare(user_id, reference.as_ref())
            .await?;

        let created_at = now();
        let record = NoteRecord {
            id: NoteId::generate(),
            user_id: user_id.clone(),
            title,
            content: request.content.clone(),
            pull_request_ref: reference,
            created_at,
            updated_at: created_at,
        };
        self.store
            .insert_note(&record)
            .map_err(|error| map_persistence_error("create note", &error))?;

        let pull_requests = match self.associations.apply(record.id, target.as_ref()) {
            Ok(linked) => linked,
            Err(error) => {
                self.discard(user_id, record.id);
                return Err(error);
            }
        };

        tracing::info!("created note {} for user {user_id}", record.id);
        Ok(Note::from_record(record, pull_requests))
    }

    /// Overwrites a note's fields and re-links it to the referenced pull
    /// request, or unlinks it when no reference is given.
    ///
    /// The association set is rewritten even when the reference is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NotFound`] when the note does not exist for
    /// `user_id`, plus the failures listed for [`Self::create`]. When
    /// resolution fails the stored note and its links are unchanged.
    pub async fn update(
        &self,
        user_id: &UserId,
        note_id: NoteId,
        request: &NoteRequest,
    ) -> Result<Note, NoteError> {
        let title = request.validated_title()?;
        let reference = request.pull_request_ref()?;
        let mut record = self.load(user_id, note_id)?;

        record.title = title;
        record.content.clone_from(&request.content);
        record.pull_request_ref = reference;
        record.updated_at = now();

        let pull_requests = self
            .associations
            .reconcile(user_id, note_id, record.pull_request_ref.as_ref())
            .await?;
        self.store
            .update_note(&record)
            .map_err(|error| map_persistence_error("update note", &error))?;

        tracing::info!("updated note {note_id} for user {user_id}");
        Ok(Note::from_record(record, pull_requests))
    }

    /// Deletes a note and its links. Linked pull request records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NotFound`] when the note does not exist for
    /// `user_id`, or a storage failure; the note stays visible if its row
    /// could not be removed.
    pub fn delete(&self, user_id: &UserId, note_id: NoteId) -> Result<(), NoteError> {
        self.load(user_id, note_id)?;
        self.associations.apply(note_id, None)?;

        let deleted = self
            .store
            .delete_note(user_id, note_id)
            .map_err(|error| map_persistence_error("delete note", &error))?;
        if !deleted {
            return Err(NoteError::not_found(format!("note {note_id}")));
        }

        tracing::info!("deleted note {note_id} for user {user_id}");
        Ok(())
    }

    /// Loads a note with its linked pull requests.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NotFound`] when the note does not exist for
    /// `user_id`, or a storage failure.
    pub fn get(&self, user_id: &UserId, note_id: NoteId) -> Result<Note, NoteError> {
        let record = self.load(user_id, note_id)?;
        self.with_associations(record)
    }

    /// Lists the user's notes matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage failure.
    pub fn list(
        &self,
        user_id: &UserId,
        filter: &NoteFilter,
        page: PageRequest,
    ) -> Result<NotePage, NoteError> {
        let (records, total) = self
            .store
            .query_notes(user_id, filter, page)
            .map_err(|error| map_persistence_error("list notes", &error))?;
        let notes = records
            .into_iter()
            .map(|record| self.with_associations(record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NotePage {
            notes,
            total,
            page: page.page(),
            limit: page.limit(),
        })
    }

    fn load(&self, user_id: &UserId, note_id: NoteId) -> Result<NoteRecord, NoteError> {
        self.store
            .find_note(user_id, note_id)
            .map_err(|error| map_persistence_error("load note", &error))?
            .ok_or_else(|| NoteError::not_found(format!("note {note_id}")))
    }

    fn with_associations(&self, record: NoteRecord) -> Result<Note, NoteError> {
        let pull_requests = self
            .store
            .list_associations(record.id)
            .map_err(|error| map_persistence_error("load note associations", &error))?;
        Ok(Note::from_record(record, pull_requests))
    }

    fn discard(&self, user_id: &UserId, note_id: NoteId) {
        match self.store.delete_note(user_id, note_id) {
            Ok(_) => tracing::warn!("rolled back note {note_id} after its links failed to save"),
            Err(error) => {
                tracing::warn!("failed to roll back note {note_id} after its links failed: {error}");
            }
        }
    }
}
