//! # Global runtime configuration.
//!
//! [`Config`] centralizes the settings the runtime is built with. It is read
//! once by [`Runtime::start`](crate::Runtime::start) and never consulted
//! again — the runtime is immutable after construction.
//!
//! ## Sentinel values
//! - `max_concurrent_requests = 0` → unlimited (no request semaphore created)
//! - `worker_threads = 0` → scheduler default (one per CPU core)

use std::time::Duration;

/// Global configuration for the bridge runtime.
///
/// ## Field semantics
/// - `grace`: maximum wait for in-flight work during shutdown (`0s` = no wait)
/// - `max_concurrent_requests`: request-task cap (`0` = unlimited)
/// - `worker_threads`: scheduler worker threads (`0` = default)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
///
/// All fields are public; prefer the helper accessors to avoid sprinkling
/// sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time [`ShutdownController`](crate::ShutdownController) waits
    /// for the active-task set to drain before giving up.
    ///
    /// When shutdown fires:
    /// - all tasks are cancelled via the shared `CancellationToken`
    /// - the controller waits up to `grace` for them to unwind
    /// - past the deadline it returns `RuntimeError::GraceExceeded`
    pub grace: Duration,

    /// Maximum number of request tasks executing at once.
    ///
    /// - `0` = unlimited (no semaphore)
    /// - `n > 0` = at most `n` requests run simultaneously; further
    ///   submissions queue on the semaphore inside the runtime
    ///
    /// Daemons are not counted against this cap.
    pub max_concurrent_requests: usize,

    /// Number of scheduler worker threads (`0` = tokio default).
    pub worker_threads: usize,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Subscribers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip the oldest items. Minimum value is 1 (clamped).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the request concurrency cap as an `Option`.
    ///
    /// - `None` → unlimited (no semaphore)
    /// - `Some(n)` → at most `n` concurrent request tasks
    #[inline]
    pub fn request_limit(&self) -> Option<usize> {
        if self.max_concurrent_requests == 0 {
            None
        } else {
            Some(self.max_concurrent_requests)
        }
    }

    /// Returns the worker-thread count as an `Option`.
    ///
    /// - `None` → scheduler default
    /// - `Some(n)` → exactly `n` worker threads
    #[inline]
    pub fn worker_threads(&self) -> Option<usize> {
        if self.worker_threads == 0 {
            None
        } else {
            Some(self.worker_threads)
        }
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 30s`
    /// - `max_concurrent_requests = 0` (unlimited)
    /// - `worker_threads = 0` (scheduler default)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            max_concurrent_requests: 0,
            worker_threads: 0,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_zero_means_unlimited() {
        let cfg = Config::default();
        assert_eq!(cfg.request_limit(), None);
        assert_eq!(cfg.worker_threads(), None);
    }

    #[test]
    fn test_explicit_limits_pass_through() {
        let cfg = Config {
            max_concurrent_requests: 8,
            worker_threads: 2,
            ..Config::default()
        };
        assert_eq!(cfg.request_limit(), Some(8));
        assert_eq!(cfg.worker_threads(), Some(2));
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
