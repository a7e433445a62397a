//! Note rows, association rows and note listings.

use std::collections::BTreeSet;

use diesel::Connection;
use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::result::Error as DieselError;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel::sqlite::Sqlite;

use super::pull_requests::{PULL_REQUEST_COLUMNS, PullRequestRow};
use super::{
    SqliteStore, format_timestamp, map_query_error, map_write_error, number_from_i64,
    number_to_i64, parse_note_id, parse_timestamp,
};
use crate::persistence::PersistenceError;
use crate::persistence::query::{NoteFilter, PageRequest};
use crate::persistence::records::{
    NoteId, NoteRecord, PullRequest, PullRequestId, PullRequestRef, UserId,
};
use crate::persistence::store::NoteStore;

const NOTES_TABLE: &str = "notes";
const ASSOCIATIONS_TABLE: &str = "note_pull_requests";

const NOTE_COLUMNS: &str = "n.id, n.user_id, n.title, n.content, n.repo_owner, n.repo_name, \
     n.pr_number, n.created_at, n.updated_at";

/// Shared `WHERE` clause for listings. Every criterion is paired with an
/// `IS NULL` guard so absent filters bind `NULL` and match everything.
///
/// Text search compares case-folded columns against a case-folded pattern,
/// since `SQLite`'s own `LIKE` only folds ASCII letters.
const NOTE_FILTER_CLAUSE: &str = "n.user_id = ? \
     AND (? IS NULL \
         OR fold_case(n.title) LIKE ? ESCAPE '\\' \
         OR fold_case(n.content) LIKE ? ESCAPE '\\') \
     AND (? IS NULL OR n.pr_number = ?) \
     AND (? IS NULL OR EXISTS ( \
         SELECT 1 FROM note_pull_requests l \
         JOIN pull_requests p ON p.id = l.pull_request_id \
         WHERE l.note_id = n.id AND p.state = ?))";

#[derive(Debug, QueryableByName)]
struct NoteRow {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = Text)]
    user_id: String,
    #[diesel(sql_type = Text)]
    title: String,
    #[diesel(sql_type = Text)]
    content: String,
    #[diesel(sql_type = Nullable<Text>)]
    repo_owner: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    repo_name: Option<String>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pr_number: Option<i64>,
    #[diesel(sql_type = Text)]
    created_at: String,
    #[diesel(sql_type = Text)]
    updated_at: String,
}

impl TryFrom<NoteRow> for NoteRecord {
    type Error = PersistenceError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(&row.user_id).ok_or_else(|| PersistenceError::CorruptRow {
            message: "notes.user_id: blank".to_owned(),
        })?;
        let pull_request_ref = match (row.repo_owner, row.repo_name, row.pr_number) {
            (Some(owner), Some(name), Some(number)) => Some(PullRequestRef::new(
                owner,
                name,
                number_from_i64("notes.pr_number", number)?,
            )),
            _ => None,
        };

        Ok(Self {
            id: parse_note_id(&row.id)?,
            user_id,
            title: row.title,
            content: row.content,
            pull_request_ref,
            created_at: parse_timestamp("notes.created_at", &row.created_at)?,
            updated_at: parse_timestamp("notes.updated_at", &row.updated_at)?,
        })
    }
}

#[derive(Debug, QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

/// Owned bind values for [`NOTE_FILTER_CLAUSE`].
struct FilterBinds {
    user_id: String,
    search_pattern: Option<String>,
    pr_number: Option<i64>,
    pr_state: Option<String>,
}

impl FilterBinds {
    fn new(user_id: &UserId, filter: &NoteFilter) -> Self {
        let normalised = filter.clone().normalised();
        Self {
            user_id: user_id.as_str().to_owned(),
            search_pattern: normalised
                .search
                .as_deref()
                .map(|search| format!("%{}%", escape_like(&search.to_lowercase()))),
            pr_number: normalised.pr_number.map(number_to_i64),
            pr_state: normalised.pr_state,
        }
    }

    fn bind_to(&self, query: SqlQuery) -> BoxedSqlQuery<'static, Sqlite, SqlQuery> {
        query
            .into_boxed()
            .bind::<Text, _>(self.user_id.clone())
            .bind::<Nullable<Text>, _>(self.search_pattern.clone())
            .bind::<Nullable<Text>, _>(self.search_pattern.clone())
            .bind::<Nullable<Text>, _>(self.search_pattern.clone())
            .bind::<Nullable<BigInt>, _>(self.pr_number)
            .bind::<Nullable<BigInt>, _>(self.pr_number)
            .bind::<Nullable<Text>, _>(self.pr_state.clone())
            .bind::<Nullable<Text>, _>(self.pr_state.clone())
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

impl NoteStore for SqliteStore {
    fn find_note(
        &self,
        user_id: &UserId,
        note_id: NoteId,
    ) -> Result<Option<NoteRecord>, PersistenceError> {
        let mut connection = self.establish_connection()?;

        let row: Option<NoteRow> = sql_query(format!(
            "SELECT {NOTE_COLUMNS} FROM notes n WHERE n.id = ? AND n.user_id = ? LIMIT 1;"
        ))
        .bind::<Text, _>(note_id.to_string())
        .bind::<Text, _>(user_id.as_str())
        .get_result(&mut connection)
        .optional()
        .map_err(|error| map_query_error(&mut connection, NOTES_TABLE, &error))?;

        row.map(NoteRecord::try_from).transpose()
    }

    fn insert_note(&self, note: &NoteRecord) -> Result<(), PersistenceError> {
        let mut connection = self.establish_connection()?;
        let reference = note.pull_request_ref.as_ref();

        sql_query(
            "INSERT INTO notes \
             (id, user_id, title, content, repo_owner, repo_name, pr_number, \
              created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?);",
        )
        .bind::<Text, _>(note.id.to_string())
        .bind::<Text, _>(note.user_id.as_str())
        .bind::<Text, _>(&note.title)
        .bind::<Text, _>(&note.content)
        .bind::<Nullable<Text>, _>(reference.map(|pr| pr.repo_owner.as_str()))
        .bind::<Nullable<Text>, _>(reference.map(|pr| pr.repo_name.as_str()))
        .bind::<Nullable<BigInt>, _>(reference.map(|pr| number_to_i64(pr.number)))
        .bind::<Text, _>(format_timestamp(note.created_at))
        .bind::<Text, _>(format_timestamp(note.updated_at))
        .execute(&mut connection)
        .map(drop)
        .map_err(|error| map_write_error(&mut connection, NOTES_TABLE, &error))
    }

    fn update_note(&self, note: &NoteRecord) -> Result<(), PersistenceError> {
        let mut connection = self.establish_connection()?;
        let reference = note.pull_request_ref.as_ref();

        let affected = sql_query(
            "UPDATE notes \
             SET title = ?, content = ?, repo_owner = ?, repo_name = ?, pr_number = ?, \
                 updated_at = ? \
             WHERE id = ? AND user_id = ?;",
        )
        .bind::<Text, _>(&note.title)
        .bind::<Text, _>(&note.content)
        .bind::<Nullable<Text>, _>(reference.map(|pr| pr.repo_owner.as_str()))
        .bind::<Nullable<Text>, _>(reference.map(|pr| pr.repo_name.as_str()))
        .bind::<Nullable<BigInt>, _>(reference.map(|pr| number_to_i64(pr.number)))
        .bind::<Text, _>(format_timestamp(note.updated_at))
        .bind::<Text, _>(note.id.to_string())
        .bind::<Text, _>(note.user_id.as_str())
        .execute(&mut connection)
        .map_err(|error| map_write_error(&mut connection, NOTES_TABLE, &error))?;

        if affected == 0 {
            return Err(PersistenceError::WriteFailed {
                message: format!("note {} no longer exists", note.id),
            });
        }
        Ok(())
    }

    fn delete_note(&self, user_id: &UserId, note_id: NoteId) -> Result<bool, PersistenceError> {
        let mut connection = self.establish_connection()?;

        let affected = sql_query("DELETE FROM notes WHERE id = ? AND user_id = ?;")
            .bind::<Text, _>(note_id.to_string())
            .bind::<Text, _>(user_id.as_str())
            .execute(&mut connection)
            .map_err(|error| map_write_error(&mut connection, NOTES_TABLE, &error))?;

        Ok(affected > 0)
    }

    fn list_associations(&self, note_id: NoteId) -> Result<Vec<PullRequest>, PersistenceError> {
        let mut connection = self.establish_connection()?;

        let rows: Vec<PullRequestRow> = sql_query(format!(
            "SELECT {PULL_REQUEST_COLUMNS} FROM note_pull_requests l \
             JOIN pull_requests p ON p.id = l.pull_request_id \
             WHERE l.note_id = ? \
             ORDER BY p.repo_owner, p.repo_name, p.number;"
        ))
        .bind::<Text, _>(note_id.to_string())
        .load(&mut connection)
        .map_err(|error| map_query_error(&mut connection, ASSOCIATIONS_TABLE, &error))?;

        rows.into_iter().map(PullRequest::try_from).collect()
    }

    fn replace_associations(
        &self,
        note_id: NoteId,
        pull_request_ids: &[PullRequestId],
    ) -> Result<(), PersistenceError> {
        let mut connection = self.establish_connection()?;
        let note_key = note_id.to_string();
        let unique_ids: BTreeSet<PullRequestId> = pull_request_ids.iter().copied().collect();

        connection
            .transaction::<_, DieselError, _>(|transaction| {
                sql_query("DELETE FROM note_pull_requests WHERE note_id = ?;")
                    .bind::<Text, _>(&note_key)
                    .execute(transaction)?;
                for pull_request_id in &unique_ids {
                    sql_query(
                        "INSERT INTO note_pull_requests (note_id, pull_request_id) \
                         VALUES (?, ?);",
                    )
                    .bind::<Text, _>(&note_key)
                    .bind::<Text, _>(pull_request_id.to_string())
                    .execute(transaction)?;
                }
                Ok(())
            })
            .map_err(|error| map_write_error(&mut connection, ASSOCIATIONS_TABLE, &error))?;

        tracing::debug!(
            "replaced associations for note {note_id}: {} pull request(s)",
            unique_ids.len()
        );
        Ok(())
    }

    fn query_notes(
        &self,
        user_id: &UserId,
        filter: &NoteFilter,
        page: PageRequest,
    ) -> Result<(Vec<NoteRecord>, u64), PersistenceError> {
        let mut connection = self.establish_connection()?;
        let binds = FilterBinds::new(user_id, filter);

        let count: CountRow = binds
            .bind_to(sql_query(format!(
                "SELECT COUNT(*) AS total FROM notes n WHERE {NOTE_FILTER_CLAUSE};"
            )))
            .get_result(&mut connection)
            .map_err(|error| map_query_error(&mut connection, NOTES_TABLE, &error))?;

        let rows: Vec<NoteRow> = binds
            .bind_to(sql_query(format!(
                "SELECT {NOTE_COLUMNS} FROM notes n WHERE {NOTE_FILTER_CLAUSE} \
                 ORDER BY n.created_at DESC, n.id \
                 LIMIT ? OFFSET ?;"
            )))
            .bind::<BigInt, _>(i64::from(page.limit()))
            .bind::<BigInt, _>(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .load(&mut connection)
            .map_err(|error| map_query_error(&mut connection, NOTES_TABLE, &error))?;

        let notes = rows
            .into_iter()
            .map(NoteRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = number_from_i64("notes.count", count.total)?;
        Ok((notes, total))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::escape_like;

    #[rstest]
    #[case::plain("release", "release")]
    #[case::percent("100%", "100\\%")]
    #[case::underscore("snake_case", "snake\\_case")]
    #[case::backslash("a\\b", "a\\\\b")]
    fn escape_like_escapes_wildcards(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_like(input), expected);
    }
}
