//! Task model definition.

use serde::{Deserialize, Serialize};

use super::TaskKind;

/// One scheduled unit inside a session.
///
/// Field names on the wire follow the generation service's vocabulary
/// (`task`, `type`, `related_goal_name`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Time label ("09:00 - 10:30")
    pub time: String,

    /// What to do
    #[serde(rename = "task")]
    pub description: String,

    #[serde(rename = "type")]
    pub kind: TaskKind,

    #[serde(default)]
    pub completed: bool,

    /// Title of the goal this task serves, if any
    #[serde(
        rename = "related_goal_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub related_goal: Option<String>,
}
