//! # Runtime events emitted by the bridge, supervisor, and shutdown path.
//!
//! [`EventKind`] classifies events across four categories:
//! - **Runtime events**: the shared runtime came up
//! - **Request events**: per-call lifecycle on the bridge path
//! - **Daemon events**: per-tick lifecycle of supervised background work
//! - **Shutdown events**: cancellation and drain outcome
//!
//! The [`Event`] struct carries metadata such as timestamps, task/operation
//! names, error messages, attempt counters, and schedule delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Runtime events ===
    /// The shared runtime was constructed and began accepting work.
    RuntimeStarted,

    // === Request events ===
    /// A request task started executing.
    ///
    /// Sets: `task` (operation name).
    RequestStarted,

    /// A request task completed with a success value.
    ///
    /// Sets: `task`.
    RequestCompleted,

    /// A request task completed with a typed failure.
    ///
    /// Sets: `task`, `error`.
    RequestFailed,

    /// A submission was rejected because the runtime is shutting down.
    ///
    /// Sets: `task`.
    RequestRejected,

    // === Daemon events ===
    /// A daemon was accepted by the supervisor and scheduled.
    ///
    /// Sets: `task`, `delay` (schedule period).
    DaemonScheduled,

    /// A daemon invocation started.
    ///
    /// Sets: `task`, `attempt` (1-based invocation counter).
    DaemonTickStarted,

    /// A daemon invocation completed successfully.
    ///
    /// Sets: `task`, `attempt`.
    DaemonTickCompleted,

    /// A daemon invocation failed. Per the default failure policy the
    /// schedule continues; with `FailurePolicy::Stop` the daemon stops.
    ///
    /// Sets: `task`, `attempt`, `error`.
    DaemonTickFailed,

    /// A daemon reached its terminal state: cancellation (or a stop policy)
    /// was observed and every in-flight invocation completed.
    ///
    /// Sets: `task`.
    DaemonStopped,

    /// A daemon submission was rejected because the runtime is shutting
    /// down.
    ///
    /// Sets: `task`.
    DaemonRejected,

    // === Shutdown events ===
    /// Shutdown intent observed; cancellation is being propagated.
    ShutdownRequested,

    /// Every tracked task unwound within the grace period.
    AllStoppedWithin,

    /// Grace period elapsed with tasks still active (degraded shutdown).
    GraceExceeded,
}

/// A single runtime event with metadata.
///
/// Constructed via [`Event::now`] plus the `with_*` builders; only the
/// fields relevant to the [`EventKind`] are populated.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,
    /// Globally monotonic sequence number.
    pub seq: u64,
    /// Wall-clock timestamp at construction.
    pub at: SystemTime,
    /// Task or operation name, when applicable.
    pub task: Option<String>,
    /// Error message, when applicable.
    pub error: Option<String>,
    /// Invocation counter, when applicable (1-based).
    pub attempt: Option<u64>,
    /// Schedule delay, when applicable.
    pub delay: Option<Duration>,
}

impl Event {
    /// Creates an event stamped with the current time and the next
    /// global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            task: None,
            error: None,
            attempt: None,
            delay: None,
        }
    }

    /// Attaches a task/operation name.
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches an error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attaches an invocation counter.
    pub fn with_attempt(mut self, attempt: u64) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Attaches a schedule delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::RequestStarted);
        let b = Event::now(EventKind::RequestCompleted);
        let c = Event::now(EventKind::RequestFailed);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_builders_populate_fields() {
        let ev = Event::now(EventKind::DaemonTickFailed)
            .with_task("poller")
            .with_error("boom")
            .with_attempt(3)
            .with_delay(Duration::from_millis(50));
        assert_eq!(ev.kind, EventKind::DaemonTickFailed);
        assert_eq!(ev.task.as_deref(), Some("poller"));
        assert_eq!(ev.error.as_deref(), Some("boom"));
        assert_eq!(ev.attempt, Some(3));
        assert_eq!(ev.delay, Some(Duration::from_millis(50)));
    }
}
