//! Document store contract.
//!
//! The planner never talks to a database directly. Everything it persists
//! goes through [`DocumentStore`]: a live read of one profile document per
//! user, field-scoped merge writes against that document, and append-only
//! record collections for history.
//!
//! Live reads are [`tokio::sync::watch`] receivers. A receiver always holds
//! the most recently delivered [`Snapshot`]; intermediate snapshots may be
//! skipped, which is exactly what consumers want since every decision is
//! taken against the latest state.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::{error::Result, models::UserId};

mod sqlite;

pub use sqlite::SqliteStore;

/// Immutable view of a profile document at one revision.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Whether the document exists at all
    pub exists: bool,
    /// Top-level fields of the document
    pub fields: Map<String, Value>,
    /// Store-assigned, strictly increasing per document
    pub revision: u64,
}

impl Snapshot {
    /// Snapshot of a document that does not exist yet.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Ordering of records returned by [`DocumentStore::query_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Operations the core requires from the backing store.
///
/// Every write resolves only once the store has confirmed or rejected it. A
/// rejected write must not be reflected in any snapshot.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Live read of the user's profile document. The receiver starts at the
    /// current state and is updated after every committed write.
    async fn subscribe(&self, user_id: &UserId) -> Result<watch::Receiver<Snapshot>>;

    /// Sets the given top-level fields, leaving all others untouched.
    async fn merge_write(&self, user_id: &UserId, fields: Map<String, Value>) -> Result<()>;

    /// Removes a top-level field entirely.
    async fn delete_field(&self, user_id: &UserId, field: &str) -> Result<()>;

    /// Writes a record into an append-only collection. Rewriting an existing
    /// `record_id` replaces it.
    async fn write_record(
        &self,
        user_id: &UserId,
        collection: &str,
        record_id: &str,
        record: Value,
    ) -> Result<()>;

    /// Reads a whole collection ordered by a top-level record field.
    async fn query_ordered(
        &self,
        user_id: &UserId,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Value>>;
}
