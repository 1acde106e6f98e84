//! Active session and history entry models.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{EnergyLevel, Task};
use crate::error::{DayZeroError, Result};

/// The single in-progress daily plan of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Calendar day the session was generated for
    pub date: Date,

    /// Ordered task list
    pub tasks: Vec<Task>,

    pub energy_level: EnergyLevel,

    /// Set once every task is complete
    #[serde(default)]
    pub completed: bool,

    /// Number of goals present when the session was generated. Sessions
    /// written before this field existed carry no count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_goal_count: Option<usize>,

    /// Headline the generation service gave the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl ActiveSession {
    /// Number of tasks marked complete.
    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Completion score in percent, rounded; 0 for an empty session.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dayzero_core::models::{ActiveSession, EnergyLevel, Task, TaskKind};
    /// # let task = |completed| Task {
    /// #     time: "09:00".to_string(),
    /// #     description: "Focus".to_string(),
    /// #     kind: TaskKind::Work,
    /// #     completed,
    /// #     related_goal: None,
    /// # };
    /// let session = ActiveSession {
    ///     date: jiff::civil::date(2026, 1, 5),
    ///     tasks: vec![task(true), task(true), task(true), task(false), task(false)],
    ///     energy_level: EnergyLevel::High,
    ///     completed: false,
    ///     generated_goal_count: Some(1),
    ///     theme: None,
    /// };
    /// assert_eq!(session.score(), 60);
    /// ```
    pub fn score(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let ratio = self.completed_tasks() as f64 / self.tasks.len() as f64;
        (ratio * 100.0).round() as u8
    }

    /// Flips the completion flag of the task at `index` and refreshes the
    /// session-level completed flag.
    pub fn toggle_task(&mut self, index: usize) -> Result<&Task> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(DayZeroError::TaskNotFound { index, len })?;
        task.completed = !task.completed;
        self.completed = self.tasks.iter().all(|task| task.completed);
        Ok(&self.tasks[index])
    }

    /// Whether the session was generated for a day before `today`.
    pub fn is_stale(&self, today: Date) -> bool {
        self.date < today
    }
}

/// Immutable archival record of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The session date in `YYYY-MM-DD` form; also the record key
    pub id: String,

    #[serde(flatten)]
    pub session: ActiveSession,

    /// Completion score, 0-100
    pub score: u8,

    /// Timestamp when the session was archived (UTC)
    pub completed_at: Timestamp,
}

impl HistoryEntry {
    /// Builds the archival record for `session`.
    pub fn archive(session: ActiveSession, completed_at: Timestamp) -> Self {
        Self {
            id: session.date.to_string(),
            score: session.score(),
            session,
            completed_at,
        }
    }
}
