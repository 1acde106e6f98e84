//! Profile document reads and field-scoped writes.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use serde_json::{Map, Value};

use super::StoredDocument;
use crate::error::{DatabaseResultExt, Result};

const SELECT_DOCUMENT_SQL: &str = "SELECT document, revision FROM profiles WHERE user_id = ?1";
const SELECT_REVISION_SQL: &str = "SELECT revision FROM profiles WHERE user_id = ?1";
const UPSERT_DOCUMENT_SQL: &str = "INSERT INTO profiles (user_id, document, revision, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) ON CONFLICT(user_id) DO UPDATE SET document = excluded.document, revision = excluded.revision, updated_at = excluded.updated_at";
const UPDATE_DOCUMENT_SQL: &str =
    "UPDATE profiles SET document = ?1, revision = ?2, updated_at = ?3 WHERE user_id = ?4";

impl super::Database {
    /// Reads the profile document of `user_id`, if one exists.
    pub fn get_document(&self, user_id: &str) -> Result<Option<StoredDocument>> {
        let row: Option<(String, i64)> = self
            .connection
            .query_row(SELECT_DOCUMENT_SQL, params![user_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to query profile document")?;

        row.map(|(document, revision)| Self::decode_document(&document, revision))
            .transpose()
    }

    /// Committed revision of the user's document, without decoding it.
    pub fn get_revision(&self, user_id: &str) -> Result<Option<u64>> {
        let revision: Option<i64> = self
            .connection
            .query_row(SELECT_REVISION_SQL, params![user_id], |row| row.get(0))
            .optional()
            .db_context("Failed to query profile revision")?;
        Ok(revision.map(|revision| revision.max(0) as u64))
    }

    /// Merges `fields` into the top level of the user's document, creating
    /// the document when absent. Fields not named in `fields` are untouched.
    pub fn merge_fields(
        &mut self,
        user_id: &str,
        fields: Map<String, Value>,
    ) -> Result<StoredDocument> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let current: Option<(String, i64)> = tx
            .query_row(SELECT_DOCUMENT_SQL, params![user_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to read profile document")?;

        let mut stored = match current {
            Some((document, revision)) => Self::decode_document(&document, revision)?,
            None => StoredDocument {
                fields: Map::new(),
                revision: 0,
            },
        };
        stored.fields.extend(fields);
        stored.revision += 1;

        let now = Timestamp::now().to_string();
        tx.execute(
            UPSERT_DOCUMENT_SQL,
            params![
                user_id,
                serde_json::to_string(&stored.fields)?,
                stored.revision as i64,
                &now
            ],
        )
        .db_context("Failed to write profile document")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(stored)
    }

    /// Removes a top-level field from the user's document.
    ///
    /// Returns `None` when the user has no document; removing a field that is
    /// already absent still counts as a write and bumps the revision.
    pub fn delete_field(&mut self, user_id: &str, field: &str) -> Result<Option<StoredDocument>> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let current: Option<(String, i64)> = tx
            .query_row(SELECT_DOCUMENT_SQL, params![user_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to read profile document")?;

        let Some((document, revision)) = current else {
            return Ok(None);
        };

        let mut stored = Self::decode_document(&document, revision)?;
        stored.fields.remove(field);
        stored.revision += 1;

        tx.execute(
            UPDATE_DOCUMENT_SQL,
            params![
                serde_json::to_string(&stored.fields)?,
                stored.revision as i64,
                Timestamp::now().to_string(),
                user_id
            ],
        )
        .db_context("Failed to write profile document")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(Some(stored))
    }

    fn decode_document(document: &str, revision: i64) -> Result<StoredDocument> {
        let fields: Map<String, Value> = serde_json::from_str(document)?;
        Ok(StoredDocument {
            fields,
            revision: revision.max(0) as u64,
        })
    }
}
