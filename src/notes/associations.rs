//! Keeps a note's linked pull requests in step with its requested reference.

use crate::github::PullRequestGateway;
use crate::persistence::{
    CredentialStore, NoteId, NoteStore, PullRequest, PullRequestRef, PullRequestStore, UserId,
};
use crate::telemetry::TelemetrySink;

use super::NoteError;
use super::error::map_persistence_error;
use super::resolver::PullRequestResolver;

/// Replaces a note's association set with the pull request it references.
///
/// Reconciling is split in two steps so a caller can resolve the target
/// before the note row exists: [`Self::prepare`] performs every check and
/// remote call, and [`Self::apply`] only rewrites the link set.
pub struct AssociationManager<'a, S: ?Sized, G: ?Sized> {
    store: &'a S,
    resolver: PullRequestResolver<'a, S, G>,
}

impl<'a, S, G> AssociationManager<'a, S, G>
where
    S: PullRequestStore + NoteStore + CredentialStore + ?Sized,
    G: PullRequestGateway + ?Sized,
{
    /// Creates a manager resolving pull requests through `gateway`.
    #[must_use]
    pub const fn new(store: &'a S, gateway: &'a G, telemetry: &'a dyn TelemetrySink) -> Self {
        Self {
            store,
            resolver: PullRequestResolver::new(store, gateway, telemetry),
        }
    }

    /// Resolves the desired pull request without touching any note.
    ///
    /// Returns `None` when no pull request is desired.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::PreconditionFailed`] when `user_id` has no stored
    /// GitHub token, [`NoteError::InvalidArgument`] for a zero number, and
    /// any resolver failure unchanged.
    pub async fn prepare(
        &self,
        user_id: &UserId,
        desired: Option<&PullRequestRef>,
    ) -> Result<Option<PullRequest>, NoteError> {
        let Some(reference) = desired else {
            return Ok(None);
        };

        let token = self.credential(user_id)?;
        if reference.number == 0 {
            return Err(NoteError::invalid_argument(
                "pull request number must be a positive integer",
            ));
        }

        self.resolver.resolve(reference, &token).await.map(Some)
    }

    /// Makes `target` the note's only association, or clears the set when
    /// `target` is `None`. Returns the resulting set.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] when the replacement fails; the
    /// previous set is then kept.
    pub fn apply(
        &self,
        note_id: NoteId,
        target: Option<&PullRequest>,
    ) -> Result<Vec<PullRequest>, NoteError> {
        let pull_request_ids: Vec<_> = target.iter().map(|pull_request| pull_request.id).collect();
        self.store
            .replace_associations(note_id, &pull_request_ids)
            .map_err(|error| map_persistence_error("replace note associations", &error))?;
        Ok(target.into_iter().cloned().collect())
    }

    /// Resolves `desired` and rewrites the note's association set to match.
    ///
    /// When resolution fails the existing associations are left untouched.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare`] and [`Self::apply`].
    pub async fn reconcile(
        &self,
        user_id: &UserId,
        note_id: NoteId,
        desired: Option<&PullRequestRef>,
    ) -> Result<Vec<PullRequest>, NoteError> {
        let target = self.prepare(user_id, desired).await?;
        self.apply(note_id, target.as_ref())
    }

    fn credential(&self, user_id: &UserId) -> Result<String, NoteError> {
        let profile = self
            .store
            .github_profile(user_id)
            .map_err(|error| map_persistence_error("load GitHub credential", &error))?;

        profile
            .and_then(|stored| stored.github_token)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| NoteError::PreconditionFailed {
                message: "remote credential required".to_owned(),
            })
    }
}
