//! Runtime core: the shared runtime and the components built on it.
//!
//! Internal modules:
//! - [`runtime`]: the one scheduler per process, submission, cancellation;
//! - [`bridge`]: synchronous request entry point for external transports;
//! - [`supervisor`]: scheduled background daemons;
//! - [`shutdown`]: exit-intent handling and bounded drain.

mod bridge;
mod runtime;
mod shutdown;
mod supervisor;

pub use bridge::{BridgeBuilder, RequestBridge};
pub use runtime::{Runtime, RuntimeHandle};
pub use shutdown::{wait_for_shutdown_signal, ShutdownController};
pub use supervisor::Supervisor;
