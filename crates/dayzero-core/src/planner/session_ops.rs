//! Session operations for the DayPlanner.

use jiff::civil::Date;
use log::{debug, info, warn};

use super::DayPlanner;
use crate::{
    error::{DayZeroError, Result},
    generation::GenerationRequest,
    models::{ActiveSession, Goal, HistoryEntry, Priority, UserProfile},
    params::{CompleteOnboarding, GeneratePlan, ListHistory, ToggleTask},
    session::{archive_session, StaleResolution},
    store::SortDirection,
};

/// Accepted self-assessed proficiency levels.
const PROFICIENCY_LEVELS: [&str; 3] = ["Novice", "Adept", "Elite"];

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// A new session replaced the previous one
    Generated(ActiveSession),
    /// Another generation was already in flight; nothing was done
    Suppressed,
}

impl GenerationOutcome {
    pub fn session(&self) -> Option<&ActiveSession> {
        match self {
            GenerationOutcome::Generated(session) => Some(session),
            GenerationOutcome::Suppressed => None,
        }
    }
}

impl DayPlanner {
    /// The user's profile in migrated shape.
    pub async fn get_profile(&self) -> Result<UserProfile> {
        self.require_profile().await
    }

    /// Writes the first profile of a new user.
    ///
    /// The onboarding goal becomes the first entry of `goals` and the
    /// timeline its deadline, so new profiles never take the legacy shape.
    pub async fn complete_onboarding(&self, params: &CompleteOnboarding) -> Result<UserProfile> {
        let title = Goal::validate_title(&params.goal)?;

        if !(1.0..=12.0).contains(&params.daily_bandwidth) {
            return Err(DayZeroError::invalid_input("daily_bandwidth")
                .with_reason("Daily bandwidth must be between 1 and 12 hours"));
        }

        let proficiency = params
            .proficiency
            .as_deref()
            .map(|level| {
                PROFICIENCY_LEVELS
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(level.trim()))
                    .map(|known| (*known).to_string())
                    .ok_or_else(|| {
                        DayZeroError::invalid_input("proficiency").with_reason(format!(
                            "Expected one of {}",
                            PROFICIENCY_LEVELS.join(", ")
                        ))
                    })
            })
            .transpose()?;

        if let Some(existing) = self.current_profile().await? {
            if existing.onboarding_completed {
                return Err(DayZeroError::invalid_input("onboarding")
                    .with_reason("Onboarding has already been completed"));
            }
        }

        let now = self.clock.now();
        let timeline = params
            .timeline
            .as_deref()
            .map(str::trim)
            .filter(|timeline| !timeline.is_empty())
            .map(String::from);
        let profile = UserProfile {
            goals: vec![Goal::new(title, Priority::High, None, timeline, now)],
            active_session: None,
            daily_bandwidth: params.daily_bandwidth,
            proficiency,
            onboarding_completed: true,
            created_at: Some(now),
        };

        self.profiles.write_onboarding(&profile).await?;
        info!("Completed onboarding for user {}", self.user_id());
        self.require_profile().await
    }

    /// Today's session, if any.
    pub async fn active_session(&self) -> Result<Option<ActiveSession>> {
        Ok(self.require_profile().await?.active_session)
    }

    /// Generates a new plan for today and stores it as the active session.
    ///
    /// Only one generation runs at a time; a request arriving while another
    /// is in flight returns [`GenerationOutcome::Suppressed`]. On failure the
    /// previous session is left exactly as it was.
    pub async fn generate_plan(&self, params: &GeneratePlan) -> Result<GenerationOutcome> {
        let Some(_guard) = self.generating.try_begin() else {
            debug!(
                "generate_plan: suppressed for user {} (user_initiated={})",
                self.user_id(),
                params.user_initiated
            );
            return Ok(GenerationOutcome::Suppressed);
        };

        match self.run_generation(params).await {
            Ok(session) => Ok(GenerationOutcome::Generated(session)),
            Err(e) => {
                if !params.user_initiated {
                    warn!("Automatic plan generation for user {} failed: {e}", self.user_id());
                }
                Err(e)
            }
        }
    }

    async fn run_generation(&self, params: &GeneratePlan) -> Result<ActiveSession> {
        let generator = self.generator.clone().ok_or_else(|| DayZeroError::Configuration {
            message: "no generation service configured".to_string(),
        })?;

        let today = self.clock.today();
        let profile = self.settle_stale_session(today).await?;
        if profile.goals.is_empty() {
            return Err(DayZeroError::invalid_input("goals")
                .with_reason("Add a goal before generating a plan"));
        }

        let energy_level = params
            .energy_level
            .or_else(|| profile.active_session.as_ref().map(|s| s.energy_level))
            .unwrap_or_default();
        let hours = params
            .available_hours
            .or_else(|| Some(profile.daily_bandwidth).filter(|hours| *hours > 0.0))
            .unwrap_or(self.default_hours);
        if !(hours > 0.0 && hours <= 24.0) {
            return Err(DayZeroError::invalid_input("available_hours")
                .with_reason("Available hours must be between 0 and 24"));
        }

        let request = GenerationRequest::for_profile(
            &profile,
            energy_level,
            hours,
            self.clock.day_sequence(profile.created_at),
        );
        let plan = generator.generate(&request).await?;
        let session = plan.into_session(today, energy_level, request.goal_count());

        self.profiles.write_active_session(&session).await?;
        info!(
            "Generated {} tasks for user {} from {} goals",
            session.tasks.len(),
            self.user_id(),
            request.goal_count()
        );

        self.active_session()
            .await?
            .ok_or(DayZeroError::NoActiveSession)
    }

    /// Flips one task's completion flag and re-persists the session.
    pub async fn toggle_task(&self, params: &ToggleTask) -> Result<ActiveSession> {
        let profile = self.settle_stale_session(self.clock.today()).await?;
        let mut session = profile.active_session.ok_or(DayZeroError::NoActiveSession)?;

        let task = session.toggle_task(params.index)?;
        debug!(
            "toggle_task: user={} index={} completed={}",
            self.user_id(),
            params.index,
            task.completed
        );
        self.profiles.write_active_session(&session).await?;

        self.active_session()
            .await?
            .ok_or(DayZeroError::NoActiveSession)
    }

    /// Archives the active session into history and clears it.
    ///
    /// A stored session dated before today is archived under its own date,
    /// whatever the stale-session policy.
    pub async fn archive_today(&self) -> Result<HistoryEntry> {
        let _guard = self
            .archiving
            .try_begin()
            .ok_or(DayZeroError::OperationInFlight {
                operation: "archival",
            })?;

        let session = self
            .require_profile()
            .await?
            .active_session
            .ok_or(DayZeroError::NoActiveSession)?;
        archive_session(&self.profiles, session, self.clock.now()).await
    }

    /// Archived sessions ordered by archival time.
    pub async fn list_history(&self, params: &ListHistory) -> Result<Vec<HistoryEntry>> {
        let direction = if params.newest_first {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        let mut entries = self.profiles.list_history(direction).await?;
        if let Some(limit) = params.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Archives the session dated `session_date`. Returns `None` when another
    /// archival is running or the session changed in the meantime.
    pub(crate) async fn archive_stale(&self, session_date: Date) -> Result<Option<HistoryEntry>> {
        let Some(_guard) = self.archiving.try_begin() else {
            return Ok(None);
        };

        let profile = self.require_profile().await?;
        match profile.active_session {
            Some(session) if session.date == session_date => {
                info!(
                    "Archiving stale session {session_date} for user {}",
                    self.user_id()
                );
                archive_session(&self.profiles, session, self.clock.now())
                    .await
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Latest profile with the stale-session policy applied to its session.
    async fn settle_stale_session(&self, today: Date) -> Result<UserProfile> {
        let mut profile = self.require_profile().await?;

        match self
            .stale_policy
            .resolve(profile.active_session.as_ref(), today)
        {
            StaleResolution::Current => {}
            StaleResolution::Trusted { session_date } => {
                debug!("Trusting session dated {session_date} on {today}");
            }
            StaleResolution::Conflict { session_date, today } => {
                return Err(DayZeroError::StaleSession {
                    session_date,
                    today,
                });
            }
            StaleResolution::Archive { session_date } => {
                self.archive_stale(session_date).await?;
                profile = self.require_profile().await?;
            }
        }

        Ok(profile)
    }
}
