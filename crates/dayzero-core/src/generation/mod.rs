//! Boundary to the external plan generation service.
//!
//! The service turns goals and constraints into a time-boxed task list. This
//! module builds its requests ([`GenerationRequest`]), validates its answers
//! ([`GeneratedPlan`]) and defines the [`PlanGenerator`] seam the planner
//! calls through. [`HttpPlanGenerator`] is the shipped client.
//!
//! Nothing the service returns reaches the data model unvalidated: a payload
//! that is not a complete task list is rejected as a whole.

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    error::Result,
    models::{EnergyLevel, Goal, Priority, UserProfile},
};

mod http;
mod response;

pub use http::HttpPlanGenerator;
pub use response::{parse_plan, strip_code_fences, GeneratedPlan};

/// One goal as the generation service sees it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestedGoal {
    pub title: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Goal> for RequestedGoal {
    fn from(goal: &Goal) -> Self {
        Self {
            title: goal.title.clone(),
            priority: goal.priority,
            category: goal.category.clone(),
        }
    }
}

/// Body sent to the generation service.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub goals: Vec<RequestedGoal>,
    pub energy_level: EnergyLevel,
    pub available_time_hours: f64,
    pub day_sequence: u32,
}

impl GenerationRequest {
    /// Request covering every goal of a migrated profile.
    ///
    /// All goals are sent regardless of status so that the count recorded on
    /// the resulting session equals the profile's goal count. Profiles are
    /// migrated before they get here, so a legacy profile is sent as its one
    /// synthesized goal.
    pub fn for_profile(
        profile: &UserProfile,
        energy_level: EnergyLevel,
        available_time_hours: f64,
        day_sequence: u32,
    ) -> Self {
        Self {
            goals: profile.goals.iter().map(RequestedGoal::from).collect(),
            energy_level,
            available_time_hours,
            day_sequence,
        }
    }

    /// Goal count the resulting session is stamped with.
    pub fn goal_count(&self) -> usize {
        self.goals.len()
    }
}

/// Client of the plan generation service.
///
/// Implementations report transport failures, non-success answers and
/// malformed payloads alike as errors; they never retry on their own.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedPlan>;
}
