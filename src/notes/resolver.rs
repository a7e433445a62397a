//! Resolves a pull request reference to a locally stored record.
//!
//! The local store is consulted first and never expires entries. On a miss
//! the pull request is fetched from GitHub once and inserted; if another
//! writer inserted the same key in the meantime, the existing row is re-read
//! and returned instead.

use crate::github::{PersonalAccessToken, PullRequestGateway, PullRequestLocator};
use crate::persistence::{
    PersistenceError, PullRequest, PullRequestRef, PullRequestStore, now,
};
use crate::telemetry::{ResolutionSource, TelemetryEvent, TelemetrySink};

use super::NoteError;
use super::error::{map_github_error, map_persistence_error};

/// Finds or fetches pull requests by (owner, repository, number).
pub struct PullRequestResolver<'a, S: ?Sized, G: ?Sized> {
    store: &'a S,
    gateway: &'a G,
    telemetry: &'a dyn TelemetrySink,
}

impl<'a, S, G> PullRequestResolver<'a, S, G>
where
    S: PullRequestStore + ?Sized,
    G: PullRequestGateway + ?Sized,
{
    /// Creates a resolver over the given store and gateway.
    #[must_use]
    pub const fn new(store: &'a S, gateway: &'a G, telemetry: &'a dyn TelemetrySink) -> Self {
        Self {
            store,
            gateway,
            telemetry,
        }
    }

    /// Returns the stored pull request for `reference`, fetching it with
    /// `token` when it is not yet known locally.
    ///
    /// No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::InvalidArgument`] for a blank owner, repository or
    /// token or a zero number, before any I/O. Remote failures map to
    /// [`NoteError::NotFound`], [`NoteError::Unauthorized`],
    /// [`NoteError::Forbidden`], [`NoteError::RateLimited`] or
    /// [`NoteError::Upstream`]; store failures map to
    /// [`NoteError::Storage`].
    pub async fn resolve(
        &self,
        reference: &PullRequestRef,
        token: &str,
    ) -> Result<PullRequest, NoteError> {
        let locator = PullRequestLocator::new(
            &reference.repo_owner,
            &reference.repo_name,
            reference.number,
        )
        .map_err(|error| NoteError::invalid_argument(error.to_string()))?;
        let credential = PersonalAccessToken::new(token)
            .map_err(|error| NoteError::invalid_argument(error.to_string()))?;

        if let Some(existing) = self.find(&locator)? {
            tracing::debug!("pull request {locator} served from the local store");
            self.record(&locator, ResolutionSource::Cache);
            return Ok(existing);
        }

        tracing::debug!("fetching pull request {locator} from GitHub");
        let data = self
            .gateway
            .pull_request(&locator, &credential)
            .await
            .map_err(|error| map_github_error(&locator, error))?;
        let fetched = PullRequest::from_remote(&locator, data, now());

        let stored = match self.store.insert_pull_request(&fetched) {
            Ok(()) => fetched,
            Err(PersistenceError::UniqueViolation { message }) => {
                tracing::warn!(
                    "pull request {locator} was stored concurrently ({message}); re-reading"
                );
                self.find(&locator)?.ok_or_else(|| NoteError::Storage {
                    message: format!(
                        "pull request {locator} missing after a unique-key conflict"
                    ),
                })?
            }
            Err(error) => return Err(map_persistence_error("store pull request", &error)),
        };

        self.record(&locator, ResolutionSource::Remote);
        Ok(stored)
    }

    fn find(&self, locator: &PullRequestLocator) -> Result<Option<PullRequest>, NoteError> {
        self.store
            .find_pull_request(locator)
            .map_err(|error| map_persistence_error("look up pull request", &error))
    }

    fn record(&self, locator: &PullRequestLocator, source: ResolutionSource) {
        self.telemetry.record(TelemetryEvent::PullRequestResolved {
            owner: locator.owner().as_str().to_owned(),
            repo: locator.repository().as_str().to_owned(),
            number: locator.number().get(),
            source,
        });
    }
}
