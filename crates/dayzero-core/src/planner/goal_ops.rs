//! Goal operations for the DayPlanner.

use log::info;

use super::DayPlanner;
use crate::{
    error::{DayZeroError, Result},
    models::Goal,
    params::{AddGoal, GoalId, UpdateGoal},
};

impl DayPlanner {
    /// All goals of the user in creation order.
    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.require_profile().await?.goals)
    }

    /// Retrieves a goal by its ID.
    pub async fn get_goal(&self, params: &GoalId) -> Result<Option<Goal>> {
        let profile = self.require_profile().await?;
        Ok(profile.find_goal(&params.id).cloned())
    }

    /// Creates a new active goal and returns it as stored.
    ///
    /// Only the `goals` field is written, so a concurrent task toggle on the
    /// active session is never lost.
    pub async fn add_goal(&self, params: &AddGoal) -> Result<Goal> {
        let title = Goal::validate_title(&params.title)?;
        let mut goals = self.require_profile().await?.goals;

        let goal = Goal::new(
            title,
            params.priority,
            non_blank(params.category.as_deref()),
            non_blank(params.deadline.as_deref()),
            self.clock.now(),
        );
        let id = goal.id.clone();
        goals.push(goal);
        self.profiles.write_goals(&goals).await?;
        info!("Added goal {id} for user {}", self.user_id());

        self.stored_goal(&id).await
    }

    /// Updates a goal in place. Fields left `None` keep their value; an
    /// empty category or deadline clears it.
    pub async fn update_goal(&self, params: &UpdateGoal) -> Result<Goal> {
        if params.is_empty() {
            return Err(DayZeroError::invalid_input("update").with_reason("No changes given"));
        }
        let title = params.title.as_deref().map(Goal::validate_title).transpose()?;

        let mut goals = self.require_profile().await?.goals;
        let goal = goals
            .iter_mut()
            .find(|goal| goal.id == params.id)
            .ok_or_else(|| DayZeroError::GoalNotFound {
                id: params.id.clone(),
            })?;

        if let Some(title) = title {
            goal.title = title;
        }
        if let Some(priority) = params.priority {
            goal.priority = priority;
        }
        if let Some(category) = &params.category {
            goal.category = non_blank(Some(category.as_str()));
        }
        if let Some(deadline) = &params.deadline {
            goal.deadline = non_blank(Some(deadline.as_str()));
        }
        if let Some(status) = params.status {
            goal.status = status;
        }

        self.profiles.write_goals(&goals).await?;
        info!("Updated goal {} for user {}", params.id, self.user_id());

        self.stored_goal(&params.id).await
    }

    /// Deletes a goal, returning what was removed.
    ///
    /// # Errors
    ///
    /// `DayZeroError::LastGoal` when the goal is the only one left; nothing
    /// is written in that case.
    pub async fn delete_goal(&self, params: &GoalId) -> Result<Goal> {
        let mut goals = self.require_profile().await?.goals;
        let position = goals
            .iter()
            .position(|goal| goal.id == params.id)
            .ok_or_else(|| DayZeroError::GoalNotFound {
                id: params.id.clone(),
            })?;

        if goals.len() <= 1 {
            return Err(DayZeroError::LastGoal {
                id: params.id.clone(),
            });
        }

        let removed = goals.remove(position);
        self.profiles.write_goals(&goals).await?;
        info!("Deleted goal {} for user {}", removed.id, self.user_id());
        Ok(removed)
    }

    /// Reads a goal back from the latest snapshot.
    async fn stored_goal(&self, id: &str) -> Result<Goal> {
        self.get_goal(&GoalId { id: id.to_string() })
            .await?
            .ok_or_else(|| DayZeroError::GoalNotFound { id: id.to_string() })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}
