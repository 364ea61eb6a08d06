//! # Failure policy for daemon ticks.
//!
//! Daemons are meant to run indefinitely, so a single failed invocation is
//! reported on the event bus and the schedule continues — unless the spec
//! opts into [`FailurePolicy::Stop`].

/// What the supervisor does when one daemon invocation fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure and keep the schedule running (default).
    #[default]
    Continue,
    /// Stop the daemon after the first failed invocation.
    Stop,
}
