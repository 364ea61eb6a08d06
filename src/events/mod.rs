//! Runtime event system.
//!
//! Every lifecycle transition in the runtime publishes an [`Event`] on the
//! shared [`Bus`]; a single listener inside the runtime fans events out to
//! user [`Subscriber`](crate::Subscriber)s.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
