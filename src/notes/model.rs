//! Request and response types for note operations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::NoteError;
use crate::persistence::{NoteId, NoteRecord, PullRequest, PullRequestRef, UserId};

/// Longest accepted note title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Fields supplied when creating or updating a note.
///
/// The pull request reference is given as three optional parts; they must be
/// supplied together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRequest {
    /// Note title.
    pub title: String,
    /// Note body.
    pub content: String,
    /// Repository owner of the referenced pull request.
    pub repo_owner: Option<String>,
    /// Repository name of the referenced pull request.
    pub repo_name: Option<String>,
    /// Number of the referenced pull request.
    pub pr_number: Option<u64>,
}

impl NoteRequest {
    /// A request with no pull request reference.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the pull request reference.
    #[must_use]
    pub fn with_pull_request(
        mut self,
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        pr_number: u64,
    ) -> Self {
        self.repo_owner = Some(repo_owner.into());
        self.repo_name = Some(repo_name.into());
        self.pr_number = Some(pr_number);
        self
    }

    /// Validates the title and returns it trimmed.
    pub(crate) fn validated_title(&self) -> Result<String, NoteError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteError::invalid_argument("title is required"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(NoteError::invalid_argument(format!(
                "title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }
        Ok(title.to_owned())
    }

    /// Collapses the three reference parts into an optional triple.
    ///
    /// Blank owner or repository names count as absent.
    pub(crate) fn pull_request_ref(&self) -> Result<Option<PullRequestRef>, NoteError> {
        let owner = non_blank(self.repo_owner.as_deref());
        let name = non_blank(self.repo_name.as_deref());
        match (owner, name, self.pr_number) {
            (None, None, None) => Ok(None),
            (Some(repo_owner), Some(repo_name), Some(number)) => {
                Ok(Some(PullRequestRef::new(repo_owner, repo_name, number)))
            }
            _ => Err(NoteError::invalid_argument(
                "repository owner, repository name and pull request number must be given together",
            )),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// A note together with the pull requests currently linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// Note identifier.
    pub id: NoteId,
    /// Owning user.
    pub user_id: UserId,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Pull request reference from the last create or update request.
    pub pull_request_ref: Option<PullRequestRef>,
    /// Linked pull requests.
    pub pull_requests: Vec<PullRequest>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub(crate) fn from_record(record: NoteRecord, pull_requests: Vec<PullRequest>) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            content: record.content,
            pull_request_ref: record.pull_request_ref,
            pull_requests,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// One page of a note listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotePage {
    /// Notes on this page, newest first.
    pub notes: Vec<Note>,
    /// Matching notes across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{MAX_TITLE_LENGTH, NoteRequest};
    use crate::notes::NoteError;
    use crate::persistence::PullRequestRef;

    #[rstest]
    #[case::blank("   ".to_owned())]
    #[case::too_long("x".repeat(MAX_TITLE_LENGTH + 1))]
    fn invalid_titles_are_rejected(#[case] title: String) {
        let result = NoteRequest::new(title, "").validated_title();

        assert!(
            matches!(result, Err(NoteError::InvalidArgument { .. })),
            "expected InvalidArgument, got {result:?}"
        );
    }

    #[rstest]
    fn title_at_limit_is_accepted_and_trimmed() {
        let title = "é".repeat(MAX_TITLE_LENGTH);
        let request = NoteRequest::new(format!(" {title} "), "");

        assert_eq!(request.validated_title(), Ok(title));
    }

    #[rstest]
    fn complete_reference_is_collapsed() {
        let request = NoteRequest::new("t", "").with_pull_request(" acme ", "widgets", 42);

        assert_eq!(
            request.pull_request_ref(),
            Ok(Some(PullRequestRef::new("acme", "widgets", 42)))
        );
    }

    #[rstest]
    fn blank_reference_parts_count_as_absent() {
        let request = NoteRequest {
            repo_owner: Some(" ".to_owned()),
            repo_name: Some(String::new()),
            ..NoteRequest::new("t", "")
        };

        assert_eq!(request.pull_request_ref(), Ok(None));
    }

    #[rstest]
    #[case::owner_only(Some("acme"), None, None)]
    #[case::missing_number(Some("acme"), Some("widgets"), None)]
    #[case::number_only(None, None, Some(3))]
    fn partial_reference_is_rejected(
        #[case] owner: Option<&str>,
        #[case] name: Option<&str>,
        #[case] number: Option<u64>,
    ) {
        let request = NoteRequest {
            repo_owner: owner.map(str::to_owned),
            repo_name: name.map(str::to_owned),
            pr_number: number,
            ..NoteRequest::new("t", "")
        };

        assert!(matches!(
            request.pull_request_ref(),
            Err(NoteError::InvalidArgument { .. })
        ));
    }
}
