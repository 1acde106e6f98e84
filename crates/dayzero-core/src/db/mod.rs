//! Database operations and SQLite management for profile documents and
//! history records.
//!
//! This module provides the low-level, blocking half of
//! [`crate::store::SqliteStore`]. Profiles are kept as JSON documents, one per
//! user, and every write happens inside an immediate transaction so that
//! concurrent merges into disjoint fields never overwrite each other.

use std::{path::Path, time::Duration};

use rusqlite::Connection;
use serde_json::{Map, Value};

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod profile_queries;
pub mod record_queries;

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A profile document as committed to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub fields: Map<String, Value>,
    /// Incremented on every committed write
    pub revision: u64,
}

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
