//! Goal model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GoalStatus, Priority};
use crate::error::{DayZeroError, Result};

/// A user objective that generated sessions work towards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier (UUID v4 text)
    pub id: String,

    /// Title of the goal, never empty
    pub title: String,

    pub priority: Priority,

    /// Free-form category tag ("Development", "Health", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Free-text deadline ("3 Months", "2026-12-31")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    #[serde(default)]
    pub status: GoalStatus,

    /// Timestamp when the goal was created (UTC)
    pub created_at: Timestamp,
}

impl Goal {
    /// Creates an active goal with a fresh id.
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        category: Option<String>,
        deadline: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            priority,
            category,
            deadline,
            status: GoalStatus::Active,
            created_at,
        }
    }

    /// Trims a proposed title and rejects it when nothing is left.
    pub fn validate_title(title: &str) -> Result<String> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DayZeroError::invalid_input("title").with_reason("Goal title must not be empty"));
        }
        Ok(trimmed.to_string())
    }
}
