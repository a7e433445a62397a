//! Pull request mirror rows.

use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};

use super::{
    SqliteStore, format_timestamp, map_query_error, map_write_error, number_from_i64,
    number_to_i64, parse_pull_request_id, parse_timestamp,
};
use crate::github::PullRequestLocator;
use crate::persistence::PersistenceError;
use crate::persistence::records::PullRequest;
use crate::persistence::store::PullRequestStore;

const PULL_REQUESTS_TABLE: &str = "pull_requests";

/// Columns selected for a [`PullRequest`], qualified with the `p` alias.
pub(super) const PULL_REQUEST_COLUMNS: &str = "p.id, p.repo_owner, p.repo_name, p.number, \
     p.title, p.body, p.author, p.state, p.url, p.created_at, p.updated_at";

#[derive(Debug, QueryableByName)]
pub(super) struct PullRequestRow {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = Text)]
    repo_owner: String,
    #[diesel(sql_type = Text)]
    repo_name: String,
    #[diesel(sql_type = BigInt)]
    number: i64,
    #[diesel(sql_type = Text)]
    title: String,
    #[diesel(sql_type = Text)]
    body: String,
    #[diesel(sql_type = Text)]
    author: String,
    #[diesel(sql_type = Text)]
    state: String,
    #[diesel(sql_type = Text)]
    url: String,
    #[diesel(sql_type = Text)]
    created_at: String,
    #[diesel(sql_type = Text)]
    updated_at: String,
}

impl TryFrom<PullRequestRow> for PullRequest {
    type Error = PersistenceError;

    fn try_from(row: PullRequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_pull_request_id(&row.id)?,
            repo_owner: row.repo_owner,
            repo_name: row.repo_name,
            number: number_from_i64("pull_requests.number", row.number)?,
            title: row.title,
            body: row.body,
            author: row.author,
            state: row.state,
            url: row.url,
            created_at: parse_timestamp("pull_requests.created_at", &row.created_at)?,
            updated_at: parse_timestamp("pull_requests.updated_at", &row.updated_at)?,
        })
    }
}

impl PullRequestStore for SqliteStore {
    fn find_pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Option<PullRequest>, PersistenceError> {
        let mut connection = self.establish_connection()?;

        let row: Option<PullRequestRow> = sql_query(format!(
            "SELECT {PULL_REQUEST_COLUMNS} FROM pull_requests p \
             WHERE p.repo_owner = ? AND p.repo_name = ? AND p.number = ? \
             LIMIT 1;"
        ))
        .bind::<Text, _>(locator.owner().as_str())
        .bind::<Text, _>(locator.repository().as_str())
        .bind::<BigInt, _>(number_to_i64(locator.number().get()))
        .get_result(&mut connection)
        .optional()
        .map_err(|error| map_query_error(&mut connection, PULL_REQUESTS_TABLE, &error))?;

        row.map(PullRequest::try_from).transpose()
    }

    fn insert_pull_request(&self, pull_request: &PullRequest) -> Result<(), PersistenceError> {
        let mut connection = self.establish_connection()?;

        sql_query(
            "INSERT INTO pull_requests \
             (id, repo_owner, repo_name, number, title, body, author, state, url, \
              created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);",
        )
        .bind::<Text, _>(pull_request.id.to_string())
        .bind::<Text, _>(&pull_request.repo_owner)
        .bind::<Text, _>(&pull_request.repo_name)
        .bind::<BigInt, _>(number_to_i64(pull_request.number))
        .bind::<Text, _>(&pull_request.title)
        .bind::<Text, _>(&pull_request.body)
        .bind::<Text, _>(&pull_request.author)
        .bind::<Text, _>(&pull_request.state)
        .bind::<Text, _>(&pull_request.url)
        .bind::<Text, _>(format_timestamp(pull_request.created_at))
        .bind::<Text, _>(format_timestamp(pull_request.updated_at))
        .execute(&mut connection)
        .map(drop)
        .map_err(|error| map_write_error(&mut connection, PULL_REQUESTS_TABLE, &error))
    }
}
