//! # Shutdown: signal handling and bounded drain.
//!
//! [`ShutdownController`] observes process-exit intent, propagates
//! cancellation through the runtime, and waits — up to the configured
//! grace period — for the active-task set to drain. Past the deadline it
//! reports the degraded path instead of hanging: the hosting environment
//! proceeds with termination regardless.
//!
//! ```text
//! exit intent (host callback or OS signal)
//!   └─► publish ShutdownRequested
//!   └─► runtime.cancel_all()            → propagates to child tokens
//!   └─► tracker.close() + wait, bounded by grace:
//!         ├─ drained  → publish AllStoppedWithin   → Ok
//!         └─ deadline → publish GraceExceeded      → Err(GraceExceeded)
//! ```
//!
//! [`wait_for_shutdown_signal`] is the OS-signal flavor of exit intent:
//! SIGINT/SIGTERM/SIGQUIT on Unix, Ctrl-C elsewhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time;

use crate::core::runtime::RuntimeHandle;
use crate::error::RuntimeError;
use crate::events::{Event, EventKind};

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns `Ok(())` when
/// any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns `Ok(())` when
/// any signal is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Observes exit intent and performs the bounded, best-effort drain.
///
/// Idempotent: the first invocation drains; every later one is a no-op
/// returning `Ok(())`.
pub struct ShutdownController {
    runtime: RuntimeHandle,
    grace: Duration,
    fired: AtomicBool,
}

impl ShutdownController {
    /// Creates a controller draining within the runtime's configured grace
    /// period ([`Config::grace`](crate::Config::grace)).
    pub fn new(runtime: RuntimeHandle) -> Self {
        let grace = runtime.shared().grace;
        Self::with_grace(runtime, grace)
    }

    /// Creates a controller with an explicit grace period.
    pub fn with_grace(runtime: RuntimeHandle, grace: Duration) -> Self {
        Self {
            runtime,
            grace,
            fired: AtomicBool::new(false),
        }
    }

    /// Signals cancellation and waits for the active-task set to drain.
    ///
    /// ## Errors
    /// [`RuntimeError::GraceExceeded`] once the grace period elapses with
    /// tasks still active. Termination proceeds regardless; the error is
    /// the observable record of the degraded path.
    pub async fn drain(&self) -> Result<(), RuntimeError> {
        if self.fired.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        drain_inner(self.runtime.clone(), self.grace).await
    }

    /// Blocking twin of [`drain`](Self::drain) for host exit callbacks
    /// that run on a foreign thread ("process is about to exit").
    pub fn trigger(&self) -> Result<(), RuntimeError> {
        if self.fired.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let (tx, rx) = oneshot::channel();
        let fut = drain_inner(self.runtime.clone(), self.grace);
        self.runtime.tokio().spawn(async move {
            let _ = tx.send(fut.await);
        });
        match rx.blocking_recv() {
            Ok(res) => res,
            // The runtime died mid-drain; nothing left to wait for.
            Err(_) => Ok(()),
        }
    }

    /// Waits for an OS termination signal, then drains.
    ///
    /// Convenience for hosts whose exit intent is the signal itself.
    pub async fn run_until_signal(&self) -> Result<(), RuntimeError> {
        let _ = wait_for_shutdown_signal().await;
        self.drain().await
    }
}

async fn drain_inner(runtime: RuntimeHandle, grace: Duration) -> Result<(), RuntimeError> {
    let shared = runtime.shared();
    shared.bus.publish(Event::now(EventKind::ShutdownRequested));
    runtime.cancel_all();

    shared.tracker.close();
    match time::timeout(grace, shared.tracker.wait()).await {
        Ok(()) => {
            shared.bus.publish(Event::now(EventKind::AllStoppedWithin));
            Ok(())
        }
        Err(_elapsed) => {
            shared.bus.publish(Event::now(EventKind::GraceExceeded));
            Err(RuntimeError::GraceExceeded {
                grace,
                active: shared.tracker.len(),
            })
        }
    }
}
