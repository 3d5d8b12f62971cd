//! Session capability store.
//!
//! Plan capabilities are loaded once per session and cleared on logout. The
//! store exists so the app has one place to keep them; the resolver never
//! reads it. Callers snapshot the current capabilities into an explicit
//! [`trellis_core::ActionContext`] at each invocation.

use parking_lot::RwLock;
use tracing::info;
use trellis_core::PlanCapabilities;

/// Process-wide holder for the session's plan capabilities.
#[derive(Debug, Default)]
pub struct SessionCapabilityStore {
    current: RwLock<Option<PlanCapabilities>>,
}

impl SessionCapabilityStore {
    /// An empty store (no session loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load capabilities at login, replacing any previous session's.
    pub fn load(&self, caps: PlanCapabilities) {
        info!(tier = ?caps.tier, "session capabilities loaded");
        *self.current.write() = Some(caps);
    }

    /// Clear capabilities at logout.
    pub fn clear(&self) {
        info!("session capabilities cleared");
        *self.current.write() = None;
    }

    /// Snapshot the current capabilities for building an `ActionContext`.
    /// `None` means no session is loaded.
    pub fn snapshot(&self) -> Option<PlanCapabilities> {
        self.current.read().clone()
    }

    /// Returns `true` if a session is loaded.
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }
}
