//! One-time rewrite of legacy profile documents.
//!
//! Profiles written before goals became a collection carry a single `goal`
//! text and a `timeline`. The first time such a document is observed, a
//! single goal is synthesized from it and written as `goals`. The snapshot
//! that triggered the rewrite is never handed out: callers get
//! [`Normalized::Pending`] and act on the snapshot the store re-delivers.
//!
//! Two processes observing the same legacy snapshot may both write. Each
//! write sets `goals` to a one-element list, so whichever lands last leaves a
//! valid profile; the losing goal id simply disappears.

use jiff::Timestamp;
use log::{debug, info};

use crate::{
    clock::Clock,
    error::Result,
    models::{Goal, LegacyGoal, Priority, ProfileShape, UserProfile},
    profile::ProfileStore,
    store::Snapshot,
};

/// Outcome of normalizing one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The user has no profile document
    Absent,
    /// A migration write was issued; wait for the next snapshot
    Pending,
    /// Authoritative, migrated profile
    Ready(UserProfile),
}

/// Builds the goal that replaces a legacy `goal`/`timeline` pair.
pub fn synthesize_goal(legacy: &LegacyGoal, now: Timestamp) -> Goal {
    Goal::new(
        legacy.goal.clone(),
        Priority::High,
        None,
        legacy.timeline.clone(),
        now,
    )
}

/// Resolves raw snapshots into migrated profiles.
#[derive(Clone)]
pub struct MigrationEngine {
    profiles: ProfileStore,
    clock: Clock,
}

impl MigrationEngine {
    pub fn new(profiles: ProfileStore, clock: Clock) -> Self {
        Self { profiles, clock }
    }

    /// Normalizes `snapshot`, rewriting it first when it is in legacy shape.
    ///
    /// Applying this to an already migrated snapshot performs no write.
    pub async fn normalize(&self, snapshot: &Snapshot) -> Result<Normalized> {
        if !snapshot.exists {
            return Ok(Normalized::Absent);
        }

        match ProfileShape::classify(&snapshot.fields)? {
            ProfileShape::Migrated(profile) => Ok(Normalized::Ready(profile)),
            ProfileShape::Legacy { legacy, .. } => {
                let goal = synthesize_goal(&legacy, self.clock.now());
                debug!(
                    "normalize: user={} revision={} legacy goal={:?}",
                    self.profiles.user_id(),
                    snapshot.revision,
                    legacy.goal
                );
                self.profiles.write_goals(std::slice::from_ref(&goal)).await?;
                info!(
                    "Migrated legacy profile of user {} to goal {}",
                    self.profiles.user_id(),
                    goal.id
                );
                Ok(Normalized::Pending)
            }
        }
    }
}
