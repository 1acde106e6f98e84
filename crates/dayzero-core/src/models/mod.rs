//! Data models for goals, tasks, sessions and profiles.
//!
//! This module contains the core domain models of the DayZero planner.
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures and presentation stay
//! apart.
//!
//! # Ownership
//!
//! The [`UserProfile`] is the only unit of persistence exchanged with the
//! profile document. [`Goal`]s and the [`ActiveSession`] are embedded values
//! of that document and are not addressable on their own. [`HistoryEntry`]
//! records live in a separate append-only collection keyed by session date.
//!
//! # Wire format
//!
//! All models serialize to the camelCase JSON the document store holds, with
//! the exception of [`Task`], which keeps the generation service's field
//! names (`task`, `type`, `related_goal_name`).
//!
//! ```rust
//! use dayzero_core::models::{Task, TaskKind};
//!
//! let task: Task = serde_json::from_str(
//!     r#"{"time": "09:00", "task": "Read chapter 3", "type": "boss_fight"}"#,
//! )
//! .unwrap();
//! assert_eq!(task.kind, TaskKind::BossFight);
//! assert!(!task.completed);
//! ```

pub mod goal;
pub mod profile;
pub mod session;
pub mod status;
pub mod task;


pub use goal::Goal;
pub use profile::{fields, LegacyGoal, ProfileShape, UserId, UserProfile, HISTORY_COLLECTION};
pub use session::{ActiveSession, HistoryEntry};
pub use status::{EnergyLevel, GoalStatus, Priority, TaskKind};
pub use task::Task;
