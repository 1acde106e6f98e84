//! Validation of generation service payloads.

use jiff::civil::Date;
use serde::Deserialize;

use crate::{
    error::{DayZeroError, Result},
    models::{ActiveSession, EnergyLevel, Task, TaskKind},
};

/// A validated task list ready to become a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub theme: Option<String>,
    /// Tasks with every completion flag cleared
    pub tasks: Vec<Task>,
}

impl GeneratedPlan {
    /// Builds today's session from the plan.
    ///
    /// `goal_count` is the number of goals the request carried and becomes
    /// the baseline for automatic regeneration.
    pub fn into_session(self, date: Date, energy_level: EnergyLevel, goal_count: usize) -> ActiveSession {
        ActiveSession {
            date,
            tasks: self.tasks,
            energy_level,
            completed: false,
            generated_goal_count: Some(goal_count),
            theme: self.theme,
        }
    }
}

#[derive(Deserialize)]
struct RawPlan {
    #[serde(default)]
    theme: Option<String>,
    tasks: Vec<RawTask>,
}

#[derive(Deserialize)]
struct RawTask {
    time: String,
    task: String,
    #[serde(rename = "type")]
    kind: TaskKind,
    #[serde(default)]
    related_goal_name: Option<String>,
}

/// Removes Markdown code fences (```` ```json ... ``` ````) around a payload.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string ("json") along with the opening fence line
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Parses and validates a raw service answer.
///
/// Fails on anything that is not a complete, non-empty task list. Whatever
/// completion state the service reports is discarded.
pub fn parse_plan(text: &str) -> Result<GeneratedPlan> {
    let payload = strip_code_fences(text);
    if payload.is_empty() {
        return Err(DayZeroError::invalid_response("empty payload"));
    }

    let raw: RawPlan = serde_json::from_str(payload)
        .map_err(|e| DayZeroError::invalid_response(format!("malformed task list: {e}")))?;

    if raw.tasks.is_empty() {
        return Err(DayZeroError::invalid_response("task list is empty"));
    }

    let tasks = raw
        .tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| validate_task(index, task))
        .collect::<Result<Vec<_>>>()?;

    let theme = raw
        .theme
        .map(|theme| theme.trim().to_string())
        .filter(|theme| !theme.is_empty());

    Ok(GeneratedPlan { theme, tasks })
}

fn validate_task(index: usize, raw: RawTask) -> Result<Task> {
    let time = raw.time.trim();
    if time.is_empty() {
        return Err(DayZeroError::invalid_response(format!("task {index} has no time")));
    }
    let description = raw.task.trim();
    if description.is_empty() {
        return Err(DayZeroError::invalid_response(format!("task {index} has no description")));
    }

    Ok(Task {
        time: time.to_string(),
        description: description.to_string(),
        kind: raw.kind,
        completed: false,
        related_goal: raw
            .related_goal_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
    })
}
