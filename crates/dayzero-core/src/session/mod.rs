//! Session lifecycle: state machine, regeneration trigger, archival and the
//! stale-session policy.
//!
//! A user's session moves through four phases:
//!
//! ```text
//!            user request / trigger            validated response
//!   Empty ─────────────────────────▶ Generating ───────────────────▶ Active
//!     ▲                                   │ failure: previous state     │
//!     │                                   ▼ kept                        │ toggle
//!     └──────────── Archiving ◀───────────────────────── archive ◀──────┘
//! ```
//!
//! Everything here is free of I/O except [`archive_session`]. The decisions
//! ([`reduce`], [`should_regenerate`], [`StaleSessionPolicy::resolve`]) are
//! pure functions over the latest normalized profile; the planner performs
//! the effects they ask for.

mod archive;
mod machine;
mod policy;
mod trigger;

use std::sync::atomic::{AtomicBool, Ordering};

pub use archive::archive_session;
pub use machine::{reduce, Effect, Observation, SessionPhase, SyncState};
pub use policy::{StaleResolution, StaleSessionPolicy};
pub use trigger::should_regenerate;

/// Marks an operation of which at most one may run at a time.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    /// Claims the flag, or returns `None` when the operation is already
    /// running. The flag is released when the guard drops.
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases an [`InFlight`] flag on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
