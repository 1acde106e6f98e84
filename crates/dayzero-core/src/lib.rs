//! Core library for the DayZero daily planner.
//!
//! This crate owns the per-user data model (goals, today's session and
//! archived history) and keeps it consistent with a document store that many
//! readers and writers share. It migrates legacy profiles, decides when a
//! session must be regenerated, validates what the generation service returns
//! and archives finished days.
//!
//! # Data Flow
//!
//! ```text
//!  DocumentStore ──snapshots──▶ MigrationEngine ──profiles──▶ session::reduce
//!       ▲                                                          │
//!       └───────────── field-scoped merge writes ◀── DayPlanner ◀──┘ effects
//! ```
//!
//! - [`store`]: the store contract and the SQLite implementation
//! - [`profile`]: typed reads and writes for one user
//! - [`migration`]: one-time rewrite of legacy profiles
//! - [`session`]: state machine, regeneration trigger, archival, stale policy
//! - [`generation`]: requests to and responses from the generation service
//! - [`planner`]: the [`DayPlanner`] facade tying everything together
//! - [`display`]: Markdown formatting for front ends
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dayzero_core::{params::CompleteOnboarding, DayPlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = DayPlannerBuilder::new("user-123")
//!     .with_database_path(Some("dayzero.db"))
//!     .build()
//!     .await?;
//!
//! let profile = planner
//!     .complete_onboarding(&CompleteOnboarding {
//!         goal: "Learn React Native".to_string(),
//!         timeline: Some("3 Months".to_string()),
//!         daily_bandwidth: 2.0,
//!         proficiency: Some("Novice".to_string()),
//!     })
//!     .await?;
//! println!("{profile}");
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod db;
pub mod display;
pub mod error;
pub mod generation;
pub mod migration;
pub mod models;
pub mod params;
pub mod planner;
pub mod profile;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use clock::Clock;
pub use display::{
    CreateResult, DeleteResult, Goals, HistoryEntries, LocalDateTime, OperationStatus,
    UpdateResult,
};
pub use error::{DayZeroError, ErrorKind, Result};
pub use generation::{GeneratedPlan, GenerationRequest, HttpPlanGenerator, PlanGenerator};
pub use models::{
    ActiveSession, EnergyLevel, Goal, GoalStatus, HistoryEntry, Priority, Task, TaskKind, UserId,
    UserProfile,
};
pub use planner::{DayPlanner, DayPlannerBuilder, GenerationOutcome, SyncEvent};
pub use session::StaleSessionPolicy;
pub use store::{DocumentStore, Snapshot, SortDirection, SqliteStore};
