//! What to do with a session generated for an earlier day.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::ActiveSession;

/// Treatment of an active session whose date lies before today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaleSessionPolicy {
    /// Keep using the stored session as today's plan
    #[default]
    Trust,
    /// Move the stale session into history and clear it
    ArchiveAndReset,
    /// Refuse session operations until the caller archives it
    Conflict,
}

/// Outcome of applying a [`StaleSessionPolicy`] to the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleResolution {
    /// No session, or one dated today
    Current,
    /// A stale session the policy says to keep using
    Trusted { session_date: Date },
    /// A stale session that must be archived before anything else
    Archive { session_date: Date },
    /// A stale session the caller has to resolve
    Conflict { session_date: Date, today: Date },
}

impl StaleSessionPolicy {
    pub fn resolve(&self, session: Option<&ActiveSession>, today: Date) -> StaleResolution {
        let Some(session) = session.filter(|session| session.is_stale(today)) else {
            return StaleResolution::Current;
        };

        let session_date = session.date;
        match self {
            StaleSessionPolicy::Trust => StaleResolution::Trusted { session_date },
            StaleSessionPolicy::ArchiveAndReset => StaleResolution::Archive { session_date },
            StaleSessionPolicy::Conflict => StaleResolution::Conflict { session_date, today },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StaleSessionPolicy::Trust => "trust",
            StaleSessionPolicy::ArchiveAndReset => "archive-and-reset",
            StaleSessionPolicy::Conflict => "conflict",
        }
    }
}

impl FromStr for StaleSessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "trust" => Ok(StaleSessionPolicy::Trust),
            "archive-and-reset" | "archive" => Ok(StaleSessionPolicy::ArchiveAndReset),
            "conflict" => Ok(StaleSessionPolicy::Conflict),
            _ => Err(format!("Invalid stale session policy: {s}")),
        }
    }
}

impl fmt::Display for StaleSessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
