//! # taskbridge
//!
//! **taskbridge** bridges one long-lived async runtime to many independent
//! synchronous callers.
//!
//! A process builds exactly one [`Runtime`] at start — hosting shared
//! services, supervised background daemons, and a process-wide cancellation
//! signal — and external transports answer high-frequency request/response
//! calls against it through a [`RequestBridge`], without ever paying for a
//! new execution environment per call.
//!
//! ## Architecture
//! ```text
//!            bootstrap (once per process)
//!   ServiceRegistry::builder() ─► Runtime::start(cfg, registry, subscribers)
//!                                          │
//!            ┌─────────────────────────────┼─────────────────────────────┐
//!            ▼                             ▼                             ▼
//!   ┌────────────────┐          ┌───────────────────┐         ┌──────────────────┐
//!   │   Supervisor   │          │   RequestBridge   │         │ShutdownController│
//!   │ run_daemon(..) │          │ handle(name,args) │         │ drain()/trigger()│
//!   └───────┬────────┘          └─────────┬─────────┘         └────────┬─────────┘
//!           │ actor loop per daemon       │ one request task per call  │
//!           ▼                             ▼                            ▼
//!   ┌───────────────────────────────────────────────────────────────────────────┐
//!   │  shared runtime: scheduler + ServiceRegistry + CancellationToken          │
//!   │                  + active-task tracker + event Bus                        │
//!   └───────────────────────────────────────────────────────────────────────────┘
//!           every task: TaskContext { registry, child token } ─► outcome
//!           every transition: Event ─► Bus ─► Subscriber::on_event()
//! ```
//!
//! ## Lifecycle
//! ```text
//! start ─► daemons scheduled ─► requests served concurrently
//!   ─► exit intent ─► cancel_all() ─► bounded drain (grace)
//!        ├─ all tasks terminal within grace  → clean stop
//!        └─ grace exceeded                   → degraded stop (reported)
//! ```
//!
//! ## Features
//! | Area          | Description                                              | Key types                              |
//! |---------------|----------------------------------------------------------|----------------------------------------|
//! | **Runtime**   | One scheduler per process, isolated task submission.     | [`Runtime`], [`RuntimeHandle`]         |
//! | **Services**  | Immutable identifier → implementation map.               | [`ServiceRegistry`]                    |
//! | **Requests**  | Synchronous entry point over the shared runtime.         | [`RequestBridge`], [`Handler`]         |
//! | **Daemons**   | Fixed-delay background work with cooperative stop.       | [`Supervisor`], [`Daemon`], [`Schedule`] |
//! | **Shutdown**  | Exit intent, cancellation, bounded drain.                | [`ShutdownController`]                 |
//! | **Errors**    | Typed lifecycle and task failures.                       | [`RuntimeError`], [`TaskError`]        |
//! | **Events**    | Sequence-numbered lifecycle events, fan-out.             | [`Event`], [`Bus`], [`Subscriber`]     |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use serde_json::json;
//! use taskbridge::{
//!     Config, DaemonFn, DaemonSpec, HandlerFn, RequestBridge, Runtime, Schedule,
//!     ServiceRegistry, ShutdownController, Supervisor, TaskContext, TaskError,
//! };
//!
//! struct Clock;
//! impl Clock {
//!     fn now_ms(&self) -> u128 {
//!         std::time::UNIX_EPOCH.elapsed().unwrap_or_default().as_millis()
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ServiceRegistry::builder().register("clock", Clock).build();
//!     let runtime = Runtime::start(Config::default(), registry, Vec::new())?;
//!
//!     // Background work for the life of the process.
//!     let supervisor = Supervisor::new(runtime.handle());
//!     let heartbeat = DaemonFn::arc("heartbeat", |ctx: TaskContext| async move {
//!         let clock = ctx.resolve::<Clock>("clock")?;
//!         println!("alive at {}", clock.now_ms());
//!         Ok::<_, TaskError>(())
//!     });
//!     supervisor.run_daemon(DaemonSpec::new(heartbeat, Schedule::every(Duration::from_secs(1))))?;
//!
//!     // Synchronous entry point for the external transport.
//!     let bridge = RequestBridge::builder(runtime.handle())
//!         .operation(HandlerFn::arc(
//!             "now",
//!             |ctx: TaskContext, _args: serde_json::Value| async move {
//!                 let clock = ctx.resolve::<Clock>("clock")?;
//!                 Ok::<_, TaskError>(json!(clock.now_ms() as u64))
//!             },
//!         ))
//!         .build();
//!     let now = bridge.handle("now", json!(null))?;
//!     println!("now = {now}");
//!
//!     // Exit intent from the host, bounded drain.
//!     let controller = ShutdownController::new(runtime.handle());
//!     controller.trigger()?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod policies;
mod services;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use self::core::{
    wait_for_shutdown_signal, BridgeBuilder, RequestBridge, Runtime, RuntimeHandle,
    ShutdownController, Supervisor,
};
pub use config::Config;
pub use error::{RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::{FailurePolicy, RepeatPolicy, Schedule};
pub use services::{ServiceRegistry, ServiceRegistryBuilder};
pub use subscribers::Subscriber;
pub use tasks::{
    Daemon, DaemonFn, DaemonRef, DaemonSpec, Handler, HandlerFn, HandlerRef, TaskContext,
};

// Optional: expose the simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
