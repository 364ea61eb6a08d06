//! Scheduling and failure policies for supervised daemons.
//!
//! ## Contents
//! - [`Schedule`] fixed-delay repetition (`every` + [`RepeatPolicy`])
//! - [`FailurePolicy`] what a failed invocation means for the schedule
//!
//! ## Quick wiring
//! ```text
//! DaemonSpec { daemon, schedule: Schedule, on_failure: FailurePolicy }
//!      └─► core::supervisor uses:
//!           - schedule.repeat to pick overlap vs sequential ticks
//!           - schedule.every as the fixed delay
//!           - on_failure to decide continue/stop after a failed tick
//! ```

mod failure;
mod schedule;

pub use failure::FailurePolicy;
pub use schedule::{RepeatPolicy, Schedule};
