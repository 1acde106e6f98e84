//! SQLite-backed [`DocumentStore`].

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::{
    sync::watch,
    task,
    time::{self, MissedTickBehavior},
};

use super::{DocumentStore, Snapshot, SortDirection};
use crate::{
    db::{Database, StoredDocument},
    error::{DayZeroError, Result},
    models::UserId,
};

/// How often a live read checks the file for writes made elsewhere.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

type Channels = Mutex<HashMap<UserId, watch::Sender<Snapshot>>>;

/// Document store persisting into a single SQLite file.
///
/// Each operation opens its own connection on the blocking pool. Live reads
/// are served from one watch channel per user. Writes through this store are
/// published as soon as they commit; writes by other connections to the same
/// file are picked up by a watcher task polling the document's revision, and
/// by every new subscribe, which rereads the document.
pub struct SqliteStore {
    db_path: PathBuf,
    channels: Arc<Channels>,
    poll_interval: Duration,
}

impl SqliteStore {
    /// Opens (and if needed creates) the database at `path`.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let store = Self {
            db_path,
            channels: Arc::new(Mutex::new(HashMap::new())),
            poll_interval: DEFAULT_POLL_INTERVAL,
        };
        store.with_database(|_db| Ok(())).await?;
        Ok(store)
    }

    /// Sets how often live reads poll for writes made by other connections.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_database<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(self.db_path.clone(), operation).await
    }

    fn publish(&self, user_id: &UserId, stored: StoredDocument) {
        publish(&self.channels, user_id, stored);
    }

    /// Follows the user's document until the store is dropped or nobody
    /// holds a receiver any more.
    fn spawn_watcher(&self, user_id: UserId) {
        let channels = Arc::downgrade(&self.channels);
        let db_path = self.db_path.clone();
        let period = self.poll_interval;
        tokio::spawn(watch_document(channels, db_path, user_id, period));
    }
}

async fn run_blocking<T, F>(db_path: PathBuf, operation: F) -> Result<T>
where
    F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(move || {
        let mut db = Database::new(&db_path)?;
        operation(&mut db)
    })
    .await
    .map_err(|e| DayZeroError::StoreUnavailable {
        message: format!("Task join error: {e}"),
    })?
}

/// Pushes a committed document to live readers. Snapshots older than the one
/// a reader already holds are dropped.
fn publish(channels: &Channels, user_id: &UserId, stored: StoredDocument) {
    let channels = channels.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(sender) = channels.get(user_id) else {
        return;
    };

    let revision = stored.revision;
    let delivered = sender.send_if_modified(move |current| {
        if current.exists && current.revision >= stored.revision {
            return false;
        }
        *current = Snapshot {
            exists: true,
            fields: stored.fields,
            revision: stored.revision,
        };
        true
    });
    debug!("publish: user={user_id} revision={revision} delivered={delivered}");
}

async fn watch_document(
    channels: Weak<Channels>,
    db_path: PathBuf,
    user_id: UserId,
    period: Duration,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(channels) = channels.upgrade() else {
            break;
        };

        let known = {
            let mut senders = channels.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(sender) = senders.get(&user_id) else {
                break;
            };
            if sender.receiver_count() == 0 {
                senders.remove(&user_id);
                break;
            }
            let revision = sender.borrow().revision;
            revision
        };

        let key = user_id.as_str().to_string();
        let polled = run_blocking(db_path.clone(), move |db| match db.get_revision(&key)? {
            Some(revision) if revision > known => db.get_document(&key),
            _ => Ok(None),
        })
        .await;

        match polled {
            Ok(Some(stored)) => {
                debug!(
                    "watch: user={user_id} observed revision {} written elsewhere",
                    stored.revision
                );
                publish(&channels, &user_id, stored);
            }
            Ok(None) => {}
            Err(e) => warn!("watch: user={user_id} poll failed: {e}"),
        }
    }
    debug!("watch: stopped for user={user_id}");
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn subscribe(&self, user_id: &UserId) -> Result<watch::Receiver<Snapshot>> {
        // Register before reading so a write committing in between is
        // published into this channel rather than dropped.
        let (mut receiver, created) = {
            let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
            match channels.get(user_id) {
                Some(sender) => (sender.subscribe(), false),
                None => {
                    let (sender, receiver) = watch::channel(Snapshot::absent());
                    channels.insert(user_id.clone(), sender);
                    (receiver, true)
                }
            }
        };
        if created {
            self.spawn_watcher(user_id.clone());
        }

        let key = user_id.as_str().to_string();
        if let Some(stored) = self.with_database(move |db| db.get_document(&key)).await? {
            self.publish(user_id, stored);
        }
        receiver.mark_unchanged();
        Ok(receiver)
    }

    async fn merge_write(&self, user_id: &UserId, fields: Map<String, Value>) -> Result<()> {
        let key = user_id.as_str().to_string();
        let names: Vec<String> = fields.keys().cloned().collect();
        let stored = self
            .with_database(move |db| db.merge_fields(&key, fields))
            .await?;
        debug!(
            "merge_write: user={user_id} fields={names:?} revision={}",
            stored.revision
        );
        self.publish(user_id, stored);
        Ok(())
    }

    async fn delete_field(&self, user_id: &UserId, field: &str) -> Result<()> {
        let key = user_id.as_str().to_string();
        let name = field.to_string();
        let stored = self
            .with_database(move |db| db.delete_field(&key, &name))
            .await?;
        if let Some(stored) = stored {
            debug!("delete_field: user={user_id} field={field} revision={}", stored.revision);
            self.publish(user_id, stored);
        }
        Ok(())
    }

    async fn write_record(
        &self,
        user_id: &UserId,
        collection: &str,
        record_id: &str,
        record: Value,
    ) -> Result<()> {
        let key = user_id.as_str().to_string();
        let collection = collection.to_string();
        let record_id = record_id.to_string();
        self.with_database(move |db| db.put_record(&key, &collection, &record_id, &record))
            .await
    }

    async fn query_ordered(
        &self,
        user_id: &UserId,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Value>> {
        let key = user_id.as_str().to_string();
        let collection = collection.to_string();
        let order_by = order_by.to_string();
        self.with_database(move |db| db.query_records(&key, &collection, &order_by, direction))
            .await
    }
}
