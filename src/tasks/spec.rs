//! # Daemon specification for supervised execution.
//!
//! [`DaemonSpec`] bundles a daemon with the policies that govern its
//! schedule: how often it is re-invoked ([`Schedule`]) and what a failed
//! invocation means ([`FailurePolicy`]). The spec is passed to
//! [`Supervisor::run_daemon`](crate::Supervisor::run_daemon).

use crate::policies::{FailurePolicy, Schedule};
use crate::tasks::daemon::DaemonRef;

/// Specification for running a daemon under supervision.
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use taskbridge::{DaemonFn, DaemonSpec, FailurePolicy, Schedule, TaskContext, TaskError};
///
/// let poller = DaemonFn::arc("poller", |_ctx: TaskContext| async move {
///     Ok::<_, TaskError>(())
/// });
/// let spec = DaemonSpec::new(poller, Schedule::every(Duration::from_secs(1)))
///     .with_failure_policy(FailurePolicy::Stop);
/// assert_eq!(spec.name(), "poller");
/// ```
#[derive(Clone)]
pub struct DaemonSpec {
    daemon: DaemonRef,
    schedule: Schedule,
    on_failure: FailurePolicy,
}

impl DaemonSpec {
    /// Creates a spec with the default failure policy
    /// ([`FailurePolicy::Continue`]).
    pub fn new(daemon: DaemonRef, schedule: Schedule) -> Self {
        Self {
            daemon,
            schedule,
            on_failure: FailurePolicy::default(),
        }
    }

    /// Returns a new spec with the given failure policy.
    pub fn with_failure_policy(mut self, on_failure: FailurePolicy) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Returns a reference to the daemon.
    pub fn daemon(&self) -> &DaemonRef {
        &self.daemon
    }

    /// Convenience: returns the daemon name.
    pub fn name(&self) -> &str {
        self.daemon.name()
    }

    /// Returns the schedule.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Returns the failure policy.
    pub fn on_failure(&self) -> FailurePolicy {
        self.on_failure
    }
}
