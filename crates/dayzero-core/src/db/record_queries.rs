//! Append-only record collections.

use jiff::Timestamp;
use rusqlite::params;
use serde_json::Value;

use crate::{
    error::{DatabaseResultExt, Result},
    store::SortDirection,
};

const UPSERT_RECORD_SQL: &str = "INSERT INTO records (user_id, collection, record_id, body, written_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(user_id, collection, record_id) DO UPDATE SET body = excluded.body, written_at = excluded.written_at";

impl super::Database {
    /// Writes a record under `(user_id, collection, record_id)`. Writing the
    /// same key again replaces the earlier body, so retries never duplicate.
    pub fn put_record(
        &mut self,
        user_id: &str,
        collection: &str,
        record_id: &str,
        body: &Value,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            UPSERT_RECORD_SQL,
            params![
                user_id,
                collection,
                record_id,
                serde_json::to_string(body)?,
                Timestamp::now().to_string()
            ],
        )
        .db_context("Failed to write record")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Returns every record of a collection ordered by the JSON field
    /// `order_by`. Records lacking the field sort first in ascending order.
    pub fn query_records(
        &self,
        user_id: &str,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Value>> {
        let query = format!(
            "SELECT body FROM records WHERE user_id = ?1 AND collection = ?2 ORDER BY json_extract(body, ?3) {}, record_id {}",
            direction.as_sql(),
            direction.as_sql()
        );

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let bodies = stmt
            .query_map(params![user_id, collection, format!("$.{order_by}")], |row| {
                row.get::<_, String>(0)
            })
            .db_context("Failed to query records")?
            .collect::<rusqlite::Result<Vec<String>>>()
            .db_context("Failed to read records")?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(Into::into))
            .collect()
    }
}
