//! Error types used by the bridge runtime and its tasks.
//!
//! Two enums, split the same way the failures split at runtime:
//!
//! - [`RuntimeError`] — errors raised by the runtime lifecycle itself
//!   (double start, failed bootstrap, drain overrunning its grace period).
//! - [`TaskError`] — errors raised by individual units of work: request
//!   tasks and daemon ticks.
//!
//! Both provide `as_label` (short stable snake_case, for logs/metrics) and
//! `as_message` (human-readable detail).

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the runtime lifecycle.
///
/// These are orchestration failures, not task failures: a process that
/// tries to build the shared runtime twice, a runtime that cannot be
/// constructed, or a shutdown drain that exceeds its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// [`Runtime::start`](crate::Runtime::start) was called a second time
    /// in the same process. The first runtime remains usable.
    #[error("runtime already started in this process")]
    AlreadyStarted,

    /// The underlying scheduler could not be constructed.
    #[error("runtime initialization failed: {error}")]
    Init {
        /// Builder error message.
        error: String,
    },

    /// Shutdown grace period elapsed with tasks still active; the process
    /// proceeds with termination regardless (best-effort drain).
    #[error("shutdown grace {grace:?} exceeded; {active} task(s) still active")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of tasks still active when the grace period elapsed.
        active: usize,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::Init { .. } => "runtime_init_failed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::AlreadyStarted => "runtime already started".to_string(),
            RuntimeError::Init { error } => format!("init failed: {error}"),
            RuntimeError::GraceExceeded { grace, active } => {
                format!("grace exceeded after {grace:?}; active tasks={active}")
            }
        }
    }
}

/// Errors produced by individual units of work.
///
/// A request task surfaces these to the external caller as a structured
/// error; a daemon tick reports them on the event bus. None of them crash
/// the process.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Submission rejected: the runtime is shutting down.
    ///
    /// Distinct from every other variant so callers can tell "rejected
    /// before running" apart from "failed while running".
    #[error("runtime shutting down")]
    ShuttingDown,

    /// No request handler is registered under this operation name.
    #[error("no handler registered for operation {name:?}")]
    HandlerNotFound {
        /// Requested operation name.
        name: String,
    },

    /// No service is registered under this identifier.
    ///
    /// All valid identifiers are known at build time, so this is a
    /// programming error — fatal to the offending task, not the process.
    #[error("service {service:?} not registered")]
    ServiceNotFound {
        /// Requested service identifier.
        service: String,
    },

    /// Non-recoverable failure (panicked task, service type mismatch).
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The unit of work completed with a typed failure.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The unit of work was cancelled before reaching a result.
    #[error("cancelled")]
    Canceled,
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from any displayable error.
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::ShuttingDown => "shutting_down",
            TaskError::HandlerNotFound { .. } => "handler_not_found",
            TaskError::ServiceNotFound { .. } => "service_not_found",
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::ShuttingDown => "runtime shutting down".to_string(),
            TaskError::HandlerNotFound { name } => format!("handler not found: {name}"),
            TaskError::ServiceNotFound { service } => format!("service not found: {service}"),
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "cancelled".to_string(),
        }
    }

    /// True if the submission was rejected because of shutdown, as opposed
    /// to failing while running.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, TaskError::ShuttingDown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_labels_are_stable() {
        assert_eq!(TaskError::ShuttingDown.as_label(), "shutting_down");
        assert_eq!(
            TaskError::ServiceNotFound {
                service: "x".into()
            }
            .as_label(),
            "service_not_found"
        );
        assert_eq!(
            TaskError::HandlerNotFound { name: "x".into() }.as_label(),
            "handler_not_found"
        );
        assert_eq!(TaskError::fail("boom").as_label(), "task_failed");
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    }

    #[test]
    fn test_shutdown_is_distinguishable() {
        assert!(TaskError::ShuttingDown.is_shutdown());
        assert!(!TaskError::fail("boom").is_shutdown());
        assert!(!TaskError::Canceled.is_shutdown());
    }

    #[test]
    fn test_runtime_error_labels_are_stable() {
        assert_eq!(
            RuntimeError::AlreadyStarted.as_label(),
            "runtime_already_started"
        );
        let err = RuntimeError::GraceExceeded {
            grace: std::time::Duration::from_secs(5),
            active: 2,
        };
        assert_eq!(err.as_label(), "runtime_grace_exceeded");
        assert!(err.as_message().contains("active tasks=2"));
    }
}
