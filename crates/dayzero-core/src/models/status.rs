//! Enumerations shared by goals, tasks and sessions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Priority of a goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    High,
    Medium,
    Low,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    /// Stored representation, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Lifecycle status of a goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GoalStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "paused" => Ok(GoalStatus::Paused),
            "completed" | "done" => Ok(GoalStatus::Completed),
            _ => Err(format!("Invalid goal status: {s}")),
        }
    }
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "Active",
            GoalStatus::Paused => "Paused",
            GoalStatus::Completed => "Completed",
        }
    }
}

/// Energy level a session was generated for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EnergyLevel {
    #[default]
    High,
    Medium,
    Low,
}

impl FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(EnergyLevel::High),
            "medium" => Ok(EnergyLevel::Medium),
            "low" => Ok(EnergyLevel::Low),
            _ => Err(format!("Invalid energy level: {s}")),
        }
    }
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::High => "High",
            EnergyLevel::Medium => "Medium",
            EnergyLevel::Low => "Low",
        }
    }
}

/// Kind of a scheduled task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Work,
    Break,
    BossFight,
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(TaskKind::Work),
            "break" => Ok(TaskKind::Break),
            "boss_fight" | "bossfight" => Ok(TaskKind::BossFight),
            _ => Err(format!("Invalid task type: {s}")),
        }
    }
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Work => "work",
            TaskKind::Break => "break",
            TaskKind::BossFight => "boss_fight",
        }
    }

    /// Get the kind with a consistent icon for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dayzero_core::models::TaskKind;
    ///
    /// assert_eq!(TaskKind::Work.with_icon(), "▸ work");
    /// assert_eq!(TaskKind::BossFight.with_icon(), "⚔ boss fight");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskKind::Work => "▸ work",
            TaskKind::Break => "☕ break",
            TaskKind::BossFight => "⚔ boss fight",
        }
    }
}
