//! Planner operations that return display wrapper types.
//!
//! Front ends call these instead of the raw operations when they only need
//! to print the outcome.

use super::DayPlanner;
use crate::{
    display::{CreateResult, DeleteResult, Goals, HistoryEntries, UpdateResult},
    error::Result,
    models::{ActiveSession, Goal, HistoryEntry},
    params::{AddGoal, GoalId, ListHistory, ToggleTask, UpdateGoal},
};

impl DayPlanner {
    /// Handle listing goals.
    pub async fn list_goals_result(&self) -> Result<Goals> {
        Ok(Goals(self.list_goals().await?))
    }

    /// Handle creating a goal.
    pub async fn add_goal_result(&self, params: &AddGoal) -> Result<CreateResult<Goal>> {
        Ok(CreateResult::new(self.add_goal(params).await?))
    }

    /// Handle updating a goal, listing which fields were changed.
    pub async fn update_goal_result(&self, params: &UpdateGoal) -> Result<UpdateResult<Goal>> {
        let goal = self.update_goal(params).await?;

        let mut changes = Vec::new();
        if params.title.is_some() {
            changes.push(format!("Title: {}", goal.title));
        }
        if params.priority.is_some() {
            changes.push(format!("Priority: {}", goal.priority));
        }
        if params.category.is_some() {
            changes.push(format!(
                "Category: {}",
                goal.category.as_deref().unwrap_or("(none)")
            ));
        }
        if params.deadline.is_some() {
            changes.push(format!(
                "Deadline: {}",
                goal.deadline.as_deref().unwrap_or("(none)")
            ));
        }
        if params.status.is_some() {
            changes.push(format!("Status: {}", goal.status));
        }

        Ok(UpdateResult::with_changes(goal, changes))
    }

    /// Handle deleting a goal.
    pub async fn delete_goal_result(&self, params: &GoalId) -> Result<DeleteResult<Goal>> {
        Ok(DeleteResult::new(self.delete_goal(params).await?))
    }

    /// Handle toggling a task.
    pub async fn toggle_task_result(&self, params: &ToggleTask) -> Result<UpdateResult<ActiveSession>> {
        let session = self.toggle_task(params).await?;
        let change = session
            .tasks
            .get(params.index)
            .map(|task| {
                format!(
                    "Task {} marked {}",
                    params.index + 1,
                    if task.completed { "done" } else { "not done" }
                )
            })
            .into_iter()
            .collect();
        Ok(UpdateResult::with_changes(session, change))
    }

    /// Handle archiving today's session.
    pub async fn archive_today_result(&self) -> Result<CreateResult<HistoryEntry>> {
        Ok(CreateResult::new(self.archive_today().await?))
    }

    /// Handle listing history.
    pub async fn list_history_result(&self, params: &ListHistory) -> Result<HistoryEntries> {
        Ok(HistoryEntries(self.list_history(params).await?))
    }
}
