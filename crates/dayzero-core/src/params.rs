//! Parameter structures for DayZero operations
//!
//! These structures are shared by every interface that drives the planner
//! (the CLI today, other front ends later) and carry no framework-specific
//! derives beyond serde. Interface layers define their own argument types and
//! convert into these with `From` implementations:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │   DayPlanner    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Validation that depends on business rules (non-empty titles, bandwidth
//! range, the goal floor) happens in the planner, not here.

use serde::{Deserialize, Serialize};

use crate::models::{EnergyLevel, GoalStatus, Priority};

/// Parameters for operations addressing a single goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalId {
    /// The goal's identifier
    pub id: String,
}

/// Parameters for creating a goal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddGoal {
    /// Title of the goal (required, non-empty)
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    /// Optional category tag
    pub category: Option<String>,
    /// Optional free-text deadline
    pub deadline: Option<String>,
}

/// Parameters for updating a goal in place. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoal {
    pub id: String,
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<GoalStatus>,
}

impl UpdateGoal {
    /// Whether the update would change anything at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.deadline.is_none()
            && self.status.is_none()
    }
}

/// Parameters for requesting a new plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePlan {
    /// Energy level to plan for; defaults to the current session's level,
    /// then to High
    pub energy_level: Option<EnergyLevel>,
    /// Hours available today; defaults to the profile's daily bandwidth
    pub available_hours: Option<f64>,
    /// Whether a person asked for this run. Automatic runs never surface
    /// failures to the caller.
    #[serde(default)]
    pub user_initiated: bool,
}

impl GeneratePlan {
    /// A user-initiated request with the given energy level.
    pub fn user(energy_level: EnergyLevel) -> Self {
        Self {
            energy_level: Some(energy_level),
            available_hours: None,
            user_initiated: true,
        }
    }
}

/// Parameters for toggling a task's completion flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleTask {
    /// 0-based position of the task in today's session
    pub index: usize,
}

/// Parameters for the first write of a new profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteOnboarding {
    /// The first objective
    pub goal: String,
    /// Free-text timeline ("1 Month", "3 Months", ...), kept as the goal's
    /// deadline
    pub timeline: Option<String>,
    /// Hours per day, 1-12
    pub daily_bandwidth: f64,
    /// Novice, Adept or Elite
    pub proficiency: Option<String>,
}

/// Parameters for listing archived sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListHistory {
    /// Most recently archived first (default)
    #[serde(default = "default_true")]
    pub newest_first: bool,
    /// Maximum number of entries to return
    pub limit: Option<usize>,
}

impl Default for ListHistory {
    fn default() -> Self {
        Self {
            newest_first: true,
            limit: None,
        }
    }
}

fn default_true() -> bool {
    true
}
