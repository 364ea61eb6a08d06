//! # Repeat schedules for daemons.
//!
//! [`Schedule`] specifies how often a daemon is re-invoked: a fixed delay
//! `every`, measured per [`RepeatPolicy`] either from invocation start or
//! from invocation end.
//!
//! ## Choosing a policy
//! ```text
//! RepeatPolicy::FromStart   → next tick fires `every` after the previous
//!                             tick STARTED; a tick that outruns the period
//!                             overlaps the next one (reference behavior)
//! RepeatPolicy::FromEnd     → ticks run sequentially; the delay starts
//!                             once the previous tick COMPLETED
//! ```
//! The supervisor does not itself prevent overlap under `FromStart`; a
//! daemon that must not overlap picks `FromEnd`.

use std::time::Duration;

/// When the fixed delay between daemon invocations is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    /// Delay measured from invocation start (default). Overlap possible.
    #[default]
    FromStart,
    /// Delay measured from invocation end. Invocations never overlap.
    FromEnd,
}

/// Fixed-delay repeat schedule for a daemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    /// Fixed delay between invocations.
    pub every: Duration,
    /// Where the delay is measured from.
    pub repeat: RepeatPolicy,
}

impl Schedule {
    /// Fixed delay of `every`, measured from invocation start.
    pub fn every(every: Duration) -> Self {
        Self {
            every,
            repeat: RepeatPolicy::FromStart,
        }
    }

    /// Switches the schedule to measure the delay from invocation end.
    pub fn from_end(mut self) -> Self {
        self.repeat = RepeatPolicy::FromEnd;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_measures_from_start() {
        let s = Schedule::every(Duration::from_millis(50));
        assert_eq!(s.every, Duration::from_millis(50));
        assert_eq!(s.repeat, RepeatPolicy::FromStart);
    }

    #[test]
    fn test_from_end_switches_policy() {
        let s = Schedule::every(Duration::from_secs(1)).from_end();
        assert_eq!(s.repeat, RepeatPolicy::FromEnd);
    }
}
