//! Event subscribers.
//!
//! ```text
//! Event flow:
//!   request wrapper / daemon actor ── publish(Event) ──► Bus
//!        Bus ──► runtime listener ──► subscriber1.on_event()
//!                                 ──► subscriber2.on_event()
//!                                 ──► ...
//! ```
//!
//! Implement [`Subscriber`] for custom logging, metrics, or alerting and
//! pass the set to [`Runtime::start`](crate::Runtime::start).

#[cfg(feature = "logging")]
mod log;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscriber;
