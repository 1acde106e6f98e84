//! User profile aggregate and its legacy shape.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{ActiveSession, Goal};
use crate::error::Result;

/// Top-level field names of the profile document.
pub mod fields {
    pub const GOALS: &str = "goals";
    pub const ACTIVE_SESSION: &str = "activeSession";
    pub const LEGACY_GOAL: &str = "goal";
    pub const LEGACY_TIMELINE: &str = "timeline";
    pub const DAILY_BANDWIDTH: &str = "dailyBandwidth";
    pub const PROFICIENCY: &str = "proficiency";
    pub const ONBOARDING_COMPLETED: &str = "onboardingCompleted";
    pub const CREATED_AT: &str = "createdAt";
}

/// Name of the append-only collection holding archived sessions.
pub const HISTORY_COLLECTION: &str = "history";

/// Opaque identifier of the signed-in user, issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The per-user aggregate in its current (migrated) shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// An explicit `null` reads as no goals
    #[serde(default, deserialize_with = "null_as_empty")]
    pub goals: Vec<Goal>,

    /// Today's plan, if one has been generated and not yet archived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_session: Option<ActiveSession>,

    /// Hours per day the user can invest
    #[serde(default)]
    pub daily_bandwidth: f64,

    /// Self-assessed level (Novice, Adept, Elite)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<String>,

    #[serde(default)]
    pub onboarding_completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl UserProfile {
    /// Number of goals, as compared against a session's generation count.
    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }

    pub fn find_goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }
}

/// The single free-text objective carried by profiles written before goals
/// became a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyGoal {
    pub goal: String,
    pub timeline: Option<String>,
}

/// A profile document classified once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileShape {
    /// `goals` absent, `goal` text present. `profile` holds every other
    /// field, with an empty goal list.
    Legacy {
        legacy: LegacyGoal,
        profile: UserProfile,
    },
    Migrated(UserProfile),
}

impl ProfileShape {
    /// Classifies raw document fields.
    ///
    /// The presence of a `goals` field alone decides: a document that has
    /// one is migrated even when a stale `goal` text is still around.
    ///
    /// A `goals` field holding `null` counts as absent.
    pub fn classify(document: &Map<String, Value>) -> Result<Self> {
        let has_goals = document
            .get(fields::GOALS)
            .is_some_and(|value| !value.is_null());
        let profile: UserProfile = serde_json::from_value(Value::Object(document.clone()))?;
        if has_goals {
            return Ok(Self::Migrated(profile));
        }

        let legacy_goal = document
            .get(fields::LEGACY_GOAL)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|goal| !goal.is_empty());

        match legacy_goal {
            Some(goal) => Ok(Self::Legacy {
                legacy: LegacyGoal {
                    goal: goal.to_string(),
                    timeline: document
                        .get(fields::LEGACY_TIMELINE)
                        .and_then(Value::as_str)
                        .map(String::from),
                },
                profile,
            }),
            None => Ok(Self::Migrated(profile)),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy { .. })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Goal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Goal>>::deserialize(deserializer)?.unwrap_or_default())
}
