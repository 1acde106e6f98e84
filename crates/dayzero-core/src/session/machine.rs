//! Reducer over normalized profile snapshots.
//!
//! The synchronization loop feeds every authoritative snapshot through
//! [`reduce`] together with the state it returned last time. The reducer
//! never performs I/O; it names the [`Effect`]s the loop should carry out.

use jiff::civil::Date;

use super::{should_regenerate, StaleResolution, StaleSessionPolicy};
use crate::models::{EnergyLevel, UserProfile};

/// Where a user's session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Empty,
    Generating,
    Active,
    Archiving,
}

impl SessionPhase {
    /// Phase implied by a profile and the operations in flight.
    pub fn of(profile: &UserProfile, generating: bool, archiving: bool) -> Self {
        if generating {
            SessionPhase::Generating
        } else if archiving {
            SessionPhase::Archiving
        } else if profile.active_session.is_some() {
            SessionPhase::Active
        } else {
            SessionPhase::Empty
        }
    }
}

/// State carried between reducer invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub phase: SessionPhase,
    /// Revision of the last snapshot reduced
    pub revision: u64,
    /// Goal count of the last automatic run that failed. The same count is
    /// not retried automatically.
    pub failed_goal_count: Option<usize>,
    /// Stale session date already reported, so it is reported once
    pub reported_stale: Option<Date>,
}

impl SyncState {
    /// Records that the automatic run for `goal_count` goals failed.
    pub fn record_auto_failure(&mut self, goal_count: usize) {
        self.failed_goal_count = Some(goal_count);
    }
}

/// Work the reducer asks the synchronization loop to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start an automatic, non-user-initiated generation
    AutoRegenerate {
        energy_level: EnergyLevel,
        goal_count: usize,
    },
    /// Archive the stale session dated `session_date`
    ArchiveStale { session_date: Date },
    /// Tell the user a stale session needs attention
    ReportStale { session_date: Date, today: Date },
}

/// Everything the reducer looks at for one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub profile: &'a UserProfile,
    pub revision: u64,
    pub today: Date,
    pub generating: bool,
    pub archiving: bool,
    pub policy: StaleSessionPolicy,
}

/// Computes the next state and the effects for one snapshot.
///
/// Snapshots older than the last one reduced produce no effects.
pub fn reduce(prev: &SyncState, observed: Observation<'_>) -> (SyncState, Vec<Effect>) {
    let mut next = prev.clone();
    if observed.revision < prev.revision {
        return (next, Vec::new());
    }

    let profile = observed.profile;
    next.revision = observed.revision;
    next.phase = SessionPhase::of(profile, observed.generating, observed.archiving);

    let baseline = profile
        .active_session
        .as_ref()
        .and_then(|session| session.generated_goal_count);
    // A fresh generation moved the baseline past the failed count
    if baseline.is_some_and(|count| Some(count) >= prev.failed_goal_count) {
        next.failed_goal_count = None;
    }
    // Falling below the failed count means reaching it again is a new change
    if next
        .failed_goal_count
        .is_some_and(|failed| profile.goal_count() < failed)
    {
        next.failed_goal_count = None;
    }

    if next.phase != SessionPhase::Active {
        return (next, Vec::new());
    }

    let mut effects = Vec::new();
    match observed
        .policy
        .resolve(profile.active_session.as_ref(), observed.today)
    {
        StaleResolution::Archive { session_date } => {
            effects.push(Effect::ArchiveStale { session_date });
            return (next, effects);
        }
        StaleResolution::Conflict { session_date, today } => {
            if prev.reported_stale != Some(session_date) {
                effects.push(Effect::ReportStale { session_date, today });
            }
            next.reported_stale = Some(session_date);
            return (next, effects);
        }
        StaleResolution::Current | StaleResolution::Trusted { .. } => {
            next.reported_stale = None;
        }
    }

    let goal_count = profile.goal_count();
    if should_regenerate(profile, observed.generating)
        && next.failed_goal_count != Some(goal_count)
    {
        if let Some(session) = &profile.active_session {
            effects.push(Effect::AutoRegenerate {
                energy_level: session.energy_level,
                goal_count,
            });
        }
    }

    (next, effects)
}
