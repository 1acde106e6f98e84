//! Long-running synchronization loop.

use std::future::Future;

use jiff::civil::Date;
use log::{debug, info, warn};

use super::{DayPlanner, GenerationOutcome};
use crate::{
    error::Result,
    migration::Normalized,
    models::{ActiveSession, HistoryEntry, UserProfile},
    params::GeneratePlan,
    session::{reduce, Effect, Observation, SyncState},
    store::Snapshot,
};

/// Notable things the loop observed or did.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A new authoritative profile arrived
    Profile(UserProfile),
    /// The goal set grew and a new plan was generated
    Regenerated(ActiveSession),
    /// An automatic generation failed; the previous session is unchanged
    RegenerationFailed { message: String },
    /// A stale session was moved into history
    StaleArchived(HistoryEntry),
    /// A stale session is waiting for the user to archive it
    StaleSession { session_date: Date, today: Date },
}

impl DayPlanner {
    /// Follows the live profile until `shutdown` resolves.
    ///
    /// Each snapshot is normalized, reduced against the previous state, and
    /// the resulting effects are carried out before the next snapshot is
    /// looked at. Snapshots delivered while an effect runs are coalesced;
    /// only the newest one is reduced afterwards. Failures of automatic work
    /// are reported through `observer` and never end the loop.
    pub async fn run_sync<S, O>(&self, shutdown: S, mut observer: O) -> Result<()>
    where
        S: Future<Output = ()>,
        O: FnMut(SyncEvent),
    {
        let mut feed = self.profiles.subscribe().await?;
        let mut state = SyncState::default();
        let mut snapshot = feed.take();
        tokio::pin!(shutdown);

        info!("Synchronizing profile of user {}", self.user_id());
        loop {
            state = self.sync_snapshot(&snapshot, state, &mut observer).await;

            tokio::select! {
                _ = &mut shutdown => break,
                next = feed.changed() => snapshot = next?,
            }
        }

        info!("Stopped synchronizing user {}", self.user_id());
        Ok(())
    }

    async fn sync_snapshot<O>(&self, snapshot: &Snapshot, state: SyncState, observer: &mut O) -> SyncState
    where
        O: FnMut(SyncEvent),
    {
        let profile = match self.migration.normalize(snapshot).await {
            Ok(Normalized::Ready(profile)) => profile,
            Ok(Normalized::Absent) | Ok(Normalized::Pending) => return state,
            Err(e) => {
                warn!("Could not normalize revision {}: {e}", snapshot.revision);
                return state;
            }
        };

        let (mut next, effects) = reduce(
            &state,
            Observation {
                profile: &profile,
                revision: snapshot.revision,
                today: self.clock.today(),
                generating: self.generating.is_active(),
                archiving: self.archiving.is_active(),
                policy: self.stale_policy,
            },
        );
        debug!(
            "sync: revision={} phase={:?} effects={}",
            snapshot.revision,
            next.phase,
            effects.len()
        );
        observer(SyncEvent::Profile(profile));

        for effect in effects {
            self.apply_effect(effect, &mut next, observer).await;
        }
        next
    }

    async fn apply_effect<O>(&self, effect: Effect, state: &mut SyncState, observer: &mut O)
    where
        O: FnMut(SyncEvent),
    {
        match effect {
            Effect::AutoRegenerate {
                energy_level,
                goal_count,
            } => {
                let params = GeneratePlan {
                    energy_level: Some(energy_level),
                    available_hours: None,
                    user_initiated: false,
                };
                match self.generate_plan(&params).await {
                    Ok(GenerationOutcome::Generated(session)) => {
                        observer(SyncEvent::Regenerated(session));
                    }
                    Ok(GenerationOutcome::Suppressed) => {}
                    Err(e) => {
                        state.record_auto_failure(goal_count);
                        observer(SyncEvent::RegenerationFailed {
                            message: e.to_string(),
                        });
                    }
                }
            }
            Effect::ArchiveStale { session_date } => match self.archive_stale(session_date).await {
                Ok(Some(entry)) => observer(SyncEvent::StaleArchived(entry)),
                Ok(None) => {}
                Err(e) => warn!("Could not archive stale session {session_date}: {e}"),
            },
            Effect::ReportStale {
                session_date,
                today,
            } => {
                warn!("Session dated {session_date} is stale on {today}");
                observer(SyncEvent::StaleSession {
                    session_date,
                    today,
                });
            }
        }
    }
}
