//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [runtime-started]
//! [request-started] op=echo
//! [request-completed] op=echo
//! [request-failed] op=echo err="service not found: random"
//! [request-rejected] op=echo
//! [daemon-scheduled] daemon=poller every=1s
//! [tick-started] daemon=poller attempt=1
//! [tick-failed] daemon=poller err="timeout" attempt=4
//! [daemon-stopped] daemon=poller
//! [daemon-rejected] daemon=poller
//! [shutdown-requested]
//! [all-stopped-within-grace]
//! [grace-exceeded]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscriber;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Intended for development and demos —
/// implement a custom [`Subscriber`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscriber for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::RuntimeStarted => {
                println!("[runtime-started]");
            }
            EventKind::RequestStarted => {
                if let Some(op) = &e.task {
                    println!("[request-started] op={op}");
                }
            }
            EventKind::RequestCompleted => {
                if let Some(op) = &e.task {
                    println!("[request-completed] op={op}");
                }
            }
            EventKind::RequestFailed => {
                println!("[request-failed] op={:?} err={:?}", e.task, e.error);
            }
            EventKind::RequestRejected => {
                println!("[request-rejected] op={:?}", e.task);
            }
            EventKind::DaemonScheduled => {
                println!("[daemon-scheduled] daemon={:?} every={:?}", e.task, e.delay);
            }
            EventKind::DaemonTickStarted => {
                if let (Some(daemon), Some(att)) = (&e.task, e.attempt) {
                    println!("[tick-started] daemon={daemon} attempt={att}");
                }
            }
            EventKind::DaemonTickCompleted => {
                if let (Some(daemon), Some(att)) = (&e.task, e.attempt) {
                    println!("[tick-completed] daemon={daemon} attempt={att}");
                }
            }
            EventKind::DaemonTickFailed => {
                println!(
                    "[tick-failed] daemon={:?} err={:?} attempt={:?}",
                    e.task, e.error, e.attempt
                );
            }
            EventKind::DaemonStopped => {
                println!("[daemon-stopped] daemon={:?}", e.task);
            }
            EventKind::DaemonRejected => {
                println!("[daemon-rejected] daemon={:?}", e.task);
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-grace]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
