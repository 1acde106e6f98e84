//! Typed profile operations over a [`DocumentStore`].
//!
//! [`ProfileStore`] binds a store to one user and speaks in domain types:
//! goal lists, sessions and history entries instead of raw JSON maps. Every
//! write names exactly the top-level fields it owns, so writers touching
//! different parts of the profile never clobber each other.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::{
    error::{DayZeroError, Result},
    models::{fields, ActiveSession, Goal, HistoryEntry, UserId, UserProfile, HISTORY_COLLECTION},
    store::{DocumentStore, Snapshot, SortDirection},
};

/// Field of history records used for chronological listing.
const HISTORY_ORDER_FIELD: &str = "completedAt";

/// A store bound to a single user.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn DocumentStore>,
    user_id: UserId,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn DocumentStore>, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Live read of the user's profile document.
    pub async fn subscribe(&self) -> Result<ProfileFeed> {
        let rx = self.store.subscribe(&self.user_id).await?;
        Ok(ProfileFeed { rx })
    }

    /// Replaces the goal collection.
    pub async fn write_goals(&self, goals: &[Goal]) -> Result<()> {
        self.merge(fields::GOALS, goals).await
    }

    /// Replaces the active session as a whole.
    pub async fn write_active_session(&self, session: &ActiveSession) -> Result<()> {
        self.merge(fields::ACTIVE_SESSION, session).await
    }

    /// Removes the active session field.
    pub async fn clear_active_session(&self) -> Result<()> {
        self.store
            .delete_field(&self.user_id, fields::ACTIVE_SESSION)
            .await
    }

    /// Writes the onboarding fields of `profile`. The active session is never
    /// part of this write.
    pub async fn write_onboarding(&self, profile: &UserProfile) -> Result<()> {
        let mut document = Map::new();
        document.insert(fields::GOALS.into(), serde_json::to_value(&profile.goals)?);
        document.insert(
            fields::DAILY_BANDWIDTH.into(),
            serde_json::to_value(profile.daily_bandwidth)?,
        );
        if let Some(proficiency) = &profile.proficiency {
            document.insert(fields::PROFICIENCY.into(), Value::String(proficiency.clone()));
        }
        document.insert(
            fields::ONBOARDING_COMPLETED.into(),
            Value::Bool(profile.onboarding_completed),
        );
        if let Some(created_at) = &profile.created_at {
            document.insert(fields::CREATED_AT.into(), serde_json::to_value(created_at)?);
        }
        self.store.merge_write(&self.user_id, document).await
    }

    /// Writes (or overwrites) the history record for the entry's date.
    pub async fn write_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.store
            .write_record(
                &self.user_id,
                HISTORY_COLLECTION,
                &entry.id,
                serde_json::to_value(entry)?,
            )
            .await
    }

    /// All archived sessions ordered by archival time.
    pub async fn list_history(&self, direction: SortDirection) -> Result<Vec<HistoryEntry>> {
        let records = self
            .store
            .query_ordered(&self.user_id, HISTORY_COLLECTION, HISTORY_ORDER_FIELD, direction)
            .await?;

        records
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(DayZeroError::from))
            .collect()
    }

    async fn merge<T: Serialize + ?Sized>(&self, field: &str, value: &T) -> Result<()> {
        let mut document = Map::new();
        document.insert(field.to_string(), serde_json::to_value(value)?);
        self.store.merge_write(&self.user_id, document).await
    }
}

/// Subscription handle yielding immutable profile snapshots.
#[derive(Clone)]
pub struct ProfileFeed {
    rx: watch::Receiver<Snapshot>,
}

impl ProfileFeed {
    /// The most recently delivered snapshot.
    pub fn latest(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Takes the latest snapshot and marks it as seen, so that [`changed`]
    /// waits for the next one.
    ///
    /// [`changed`]: ProfileFeed::changed
    pub fn take(&mut self) -> Snapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Waits until a snapshot newer than the last one taken is delivered.
    pub async fn changed(&mut self) -> Result<Snapshot> {
        self.rx
            .changed()
            .await
            .map_err(|_| DayZeroError::StoreUnavailable {
                message: "profile subscription closed".to_string(),
            })?;
        Ok(self.take())
    }
}
