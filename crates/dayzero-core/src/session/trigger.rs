//! Automatic regeneration when the goal set grows.

use crate::models::UserProfile;

/// Whether `profile` calls for an automatic regeneration.
///
/// True only when a session exists, no generation is in flight and the
/// profile now holds strictly more goals than the session was generated
/// with. Sessions that never recorded a goal count do not trigger.
pub fn should_regenerate(profile: &UserProfile, generating: bool) -> bool {
    if generating {
        return false;
    }
    let Some(baseline) = profile
        .active_session
        .as_ref()
        .and_then(|session| session.generated_goal_count)
    else {
        return false;
    };
    profile.goal_count() > baseline
}
