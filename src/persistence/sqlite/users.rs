//! Per-user GitHub credential rows.

use chrono::Utc;
use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sql_types::{Nullable, Text};

use super::{SqliteStore, format_timestamp, map_query_error, map_write_error};
use crate::persistence::PersistenceError;
use crate::persistence::records::{GitHubProfile, UserId};
use crate::persistence::store::CredentialStore;

const USERS_TABLE: &str = "users";

#[derive(QueryableByName)]
struct ProfileRow {
    #[diesel(sql_type = Nullable<Text>)]
    github_username: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    github_token: Option<String>,
}

impl CredentialStore for SqliteStore {
    fn github_profile(&self, user_id: &UserId) -> Result<Option<GitHubProfile>, PersistenceError> {
        let mut connection = self.establish_connection()?;

        let row: Option<ProfileRow> =
            sql_query("SELECT github_username, github_token FROM users WHERE id = ? LIMIT 1;")
                .bind::<Text, _>(user_id.as_str())
                .get_result(&mut connection)
                .optional()
                .map_err(|error| map_query_error(&mut connection, USERS_TABLE, &error))?;

        Ok(row.map(|profile| GitHubProfile {
            github_username: profile.github_username,
            github_token: profile.github_token,
        }))
    }

    fn save_github_profile(
        &self,
        user_id: &UserId,
        profile: &GitHubProfile,
    ) -> Result<GitHubProfile, PersistenceError> {
        let mut connection = self.establish_connection()?;
        let now = format_timestamp(Utc::now());

        sql_query(
            "INSERT INTO users (id, github_username, github_token, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
               github_username = COALESCE(excluded.github_username, users.github_username), \
               github_token = COALESCE(excluded.github_token, users.github_token), \
               updated_at = excluded.updated_at;",
        )
        .bind::<Text, _>(user_id.as_str())
        .bind::<Nullable<Text>, _>(non_blank(profile.github_username.as_deref()))
        .bind::<Nullable<Text>, _>(non_blank(profile.github_token.as_deref()))
        .bind::<Text, _>(&now)
        .bind::<Text, _>(&now)
        .execute(&mut connection)
        .map_err(|error| map_write_error(&mut connection, USERS_TABLE, &error))?;

        tracing::debug!("saved GitHub profile for user {user_id}");

        self.github_profile(user_id)?
            .ok_or_else(|| PersistenceError::WriteFailed {
                message: format!("profile for user {user_id} was not stored"),
            })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}
