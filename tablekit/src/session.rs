//! Session guard for unauthorized failures.
//!
//! Unauthorized fetch failures are never rendered as table errors; they are
//! escalated to a caller-supplied [`SessionGuard`], which typically
//! redirects to authentication. The engine latches the escalation so the
//! guard is notified at most once per unauthorized episode; the next
//! successful fetch closes the episode and re-arms the latch.

/// Receives unauthorized-failure escalations.
///
/// Injected into the engine at construction; there is no global registry.
pub trait SessionGuard: Send + Sync {
    /// Called at most once per unauthorized episode.
    fn notify_unauthorized(&self);
}

impl<F> SessionGuard for F
where
    F: Fn() + Send + Sync,
{
    fn notify_unauthorized(&self) {
        self()
    }
}

/// A guard that ignores unauthorized failures.
///
/// Used when no guard is configured; the failure is still excluded from
/// the table's error state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGuard;

impl SessionGuard for NullGuard {
    fn notify_unauthorized(&self) {}
}
