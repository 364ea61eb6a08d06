//! # Units of work and their execution context.
//!
//! Two kinds of task flow through the runtime:
//! - [`Daemon`] — unbounded lifetime, re-invoked on a schedule until
//!   cancellation ([`DaemonSpec`] bundles it with its policies)
//! - [`Handler`] — bounded lifetime, one external call → one terminal
//!   outcome
//!
//! Both receive a [`TaskContext`]: the shared service registry plus a
//! cancellation token parented to the process-wide one.

mod context;
mod daemon;
mod handler;
mod spec;

pub use context::TaskContext;
pub use daemon::{Daemon, DaemonFn, DaemonRef};
pub use handler::{Handler, HandlerFn, HandlerRef};
pub use spec::DaemonSpec;
