//! Moving a session into history.

use jiff::Timestamp;
use log::info;

use crate::{
    error::Result,
    models::{ActiveSession, HistoryEntry},
    profile::ProfileStore,
};

/// Archives `session` and clears it from the profile.
///
/// The history record is written first; the active session is only cleared
/// once that write is confirmed. A failure in between leaves both in place,
/// and archiving again rewrites the same dated record.
pub async fn archive_session(
    profiles: &ProfileStore,
    session: ActiveSession,
    completed_at: Timestamp,
) -> Result<HistoryEntry> {
    let entry = HistoryEntry::archive(session, completed_at);
    profiles.write_history(&entry).await?;
    profiles.clear_active_session().await?;

    info!(
        "Archived session {} for user {} with score {}",
        entry.id,
        profiles.user_id(),
        entry.score
    );
    Ok(entry)
}
