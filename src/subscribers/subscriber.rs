//! # Core subscriber trait.
//!
//! [`Subscriber`] is the extension point for plugging custom observers
//! (logging, metrics, alerting) into the runtime. All subscribers are
//! handed to [`Runtime::start`](crate::Runtime::start); a single listener
//! task inside the runtime receives bus events and dispatches them to each
//! subscriber in turn.
//!
//! ## Contract
//! - Dispatch is sequential within the listener: a slow subscriber delays
//!   the ones after it for that event, never the publishers.
//! - Subscribers that fall more than the bus capacity behind observe a gap
//!   (the bus drops the oldest events for lagging receivers).

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from the runtime's listener task. Implementations should avoid
/// blocking the runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
