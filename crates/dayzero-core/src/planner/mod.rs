//! High-level planner API for goals, today's session and history.
//!
//! This module provides the main [`DayPlanner`] interface. A planner is
//! constructed once per signed-in user and passed by reference to whatever
//! drives it (the CLI, the synchronization loop, tests). It coordinates the
//! profile store, the migration engine, the session state machine and the
//! generation service.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │  ProfileStore   │
//! │  (handlers)     │───▶│ (goal_ops,      │───▶│ (DocumentStore) │
//! │                 │    │  session_ops)   │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!    Display wrappers      Business logic          Persistence
//!                                 ▲
//!                                 │ effects
//!                          ┌─────────────────┐
//!                          │   sync loop     │◀── live snapshots
//!                          └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`DayPlanner`] instances
//! - [`goal_ops`]: Goal creation, update and deletion
//! - [`session_ops`]: Onboarding, plan generation, task toggling, archival
//! - [`handlers`]: Operations returning display wrappers for front ends
//! - [`sync`]: The long-running synchronization loop
//!
//! Every operation first reads the latest authoritative profile, so that no
//! decision is taken on data captured before an earlier write landed. Writes
//! go through field-scoped merges; the planner never holds the profile
//! locked.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use dayzero_core::{
//!     models::{EnergyLevel, Priority},
//!     params::{AddGoal, GeneratePlan},
//!     DayPlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = DayPlannerBuilder::new("user-123")
//!     .with_generation_url("https://planner.example.com/api/generate-plan")
//!     .build()
//!     .await?;
//!
//! planner
//!     .add_goal(&AddGoal {
//!         title: "Ship the beta".to_string(),
//!         priority: Priority::High,
//!         category: Some("Work".to_string()),
//!         deadline: None,
//!     })
//!     .await?;
//!
//! let outcome = planner.generate_plan(&GeneratePlan::user(EnergyLevel::Medium)).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use log::debug;
use tokio::time::timeout;

pub mod builder;
pub mod goal_ops;
pub mod handlers;
pub mod session_ops;
pub mod sync;

#[cfg(test)]
mod tests;

pub use builder::DayPlannerBuilder;
pub use session_ops::GenerationOutcome;
pub use sync::SyncEvent;

use crate::{
    clock::Clock,
    error::{DayZeroError, Result},
    generation::PlanGenerator,
    migration::{MigrationEngine, Normalized},
    models::{UserId, UserProfile},
    profile::ProfileStore,
    session::{InFlight, StaleSessionPolicy},
};

/// Main planner interface, bound to one user.
pub struct DayPlanner {
    pub(crate) profiles: ProfileStore,
    pub(crate) migration: MigrationEngine,
    pub(crate) generator: Option<Arc<dyn PlanGenerator>>,
    pub(crate) clock: Clock,
    pub(crate) stale_policy: StaleSessionPolicy,
    pub(crate) default_hours: f64,
    pub(crate) settle_timeout: Duration,
    pub(crate) generating: InFlight,
    pub(crate) archiving: InFlight,
}

impl DayPlanner {
    pub fn user_id(&self) -> &UserId {
        self.profiles.user_id()
    }

    pub fn stale_policy(&self) -> StaleSessionPolicy {
        self.stale_policy
    }

    /// Whether a generation request is currently in flight.
    pub fn is_generating(&self) -> bool {
        self.generating.is_active()
    }

    /// Latest authoritative profile, or `None` when the user has none yet.
    ///
    /// A legacy profile is migrated first and the migrated snapshot awaited.
    pub(crate) async fn current_profile(&self) -> Result<Option<UserProfile>> {
        let mut feed = self.profiles.subscribe().await?;
        let mut snapshot = feed.take();

        loop {
            match self.migration.normalize(&snapshot).await? {
                Normalized::Absent => return Ok(None),
                Normalized::Ready(profile) => return Ok(Some(profile)),
                Normalized::Pending => {
                    debug!(
                        "current_profile: waiting for migrated snapshot after revision {}",
                        snapshot.revision
                    );
                    snapshot = timeout(self.settle_timeout, feed.changed())
                        .await
                        .map_err(|_| DayZeroError::MigrationPending {
                            user_id: self.user_id().to_string(),
                        })??;
                }
            }
        }
    }

    /// Like [`current_profile`](Self::current_profile), failing when the
    /// user has no profile.
    pub(crate) async fn require_profile(&self) -> Result<UserProfile> {
        self.current_profile()
            .await?
            .ok_or_else(|| DayZeroError::ProfileNotFound {
                user_id: self.user_id().to_string(),
            })
    }
}
