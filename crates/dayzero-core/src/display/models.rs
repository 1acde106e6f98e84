//! Display implementations for domain models.
//!
//! All output is Markdown so that the CLI can render it with rich terminal
//! formatting while staying readable as plain text.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    ActiveSession, EnergyLevel, Goal, GoalStatus, HistoryEntry, Priority, Task, TaskKind,
    UserProfile,
};

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.priority)?;
        writeln!(f)?;
        writeln!(f, "- **ID**: {}", self.id)?;
        writeln!(f, "- **Status**: {}", self.status)?;
        if let Some(category) = &self.category {
            writeln!(f, "- **Category**: {category}")?;
        }
        if let Some(deadline) = &self.deadline {
            writeln!(f, "- **Deadline**: {deadline}")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.completed { "x" } else { " " };
        write!(
            f,
            "[{check}] `{}` {} ({})",
            self.time,
            self.description,
            self.kind.with_icon()
        )?;
        if let Some(goal) = &self.related_goal {
            write!(f, " *{goal}*")?;
        }
        Ok(())
    }
}

/// Header, metadata and numbered task list shared by sessions and history.
fn fmt_session(session: &ActiveSession, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
        f,
        "- **Progress**: {}/{} tasks ({}%)",
        session.completed_tasks(),
        session.tasks.len(),
        session.score()
    )?;
    writeln!(f, "- **Energy**: {}", session.energy_level)?;
    if let Some(count) = session.generated_goal_count {
        writeln!(f, "- **Goals planned**: {count}")?;
    }
    writeln!(f)?;

    if session.tasks.is_empty() {
        writeln!(f, "No tasks in this session.")?;
    } else {
        for (index, task) in session.tasks.iter().enumerate() {
            writeln!(f, "{}. {task}", index + 1)?;
        }
    }
    Ok(())
}

impl fmt::Display for ActiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.theme {
            Some(theme) => writeln!(f, "# {} · {theme}", self.date)?,
            None => writeln!(f, "# {}", self.date)?,
        }
        writeln!(f)?;
        if self.completed {
            writeln!(f, "All tasks complete.")?;
            writeln!(f)?;
        }
        fmt_session(self, f)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let theme = self
            .session
            .theme
            .as_deref()
            .map(|theme| format!(" · {theme}"))
            .unwrap_or_default();
        writeln!(f, "## {}{theme} (score {})", self.id, self.score)?;
        writeln!(f)?;
        writeln!(f, "- **Archived**: {}", LocalDateTime(&self.completed_at))?;
        fmt_session(&self.session, f)?;
        writeln!(f)
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Profile")?;
        writeln!(f)?;
        writeln!(f, "- **Daily bandwidth**: {} hours", self.daily_bandwidth)?;
        if let Some(proficiency) = &self.proficiency {
            writeln!(f, "- **Proficiency**: {proficiency}")?;
        }
        writeln!(
            f,
            "- **Onboarding**: {}",
            if self.onboarding_completed {
                "completed"
            } else {
                "pending"
            }
        )?;
        if let Some(created_at) = &self.created_at {
            writeln!(f, "- **Member since**: {}", LocalDateTime(created_at))?;
        }
        writeln!(f, "- **Goals**: {}", self.goals.len())?;
        match &self.active_session {
            Some(session) => writeln!(
                f,
                "- **Today**: {} ({}/{} tasks done)",
                session.date,
                session.completed_tasks(),
                session.tasks.len()
            ),
            None => writeln!(f, "- **Today**: no plan yet"),
        }
    }
}
