//! # Supervisor for scheduled background daemons.
//!
//! [`Supervisor`] accepts [`DaemonSpec`]s and runs each one as an actor
//! loop inside the shared runtime: invoke, report the outcome, sleep the
//! fixed delay, repeat — until the process-wide cancellation token is set.
//!
//! ## Per-daemon state machine
//! ```text
//! Scheduled ──► Running ──► (Success | Failure) ──► Scheduled
//!     │                                                │
//!     └──────────── cancellation observed ◄────────────┘
//!                          │
//!                          ▼
//!                       Stopped        (only after the current invocation,
//!                                       if any, has completed)
//! ```
//!
//! ## Rules
//! - The fixed delay is measured per the spec's [`RepeatPolicy`]:
//!   `FromStart` spawns each invocation as its own tracked task and starts
//!   the delay immediately (overlap possible); `FromEnd` runs invocations
//!   sequentially and delays after completion.
//! - A failed invocation is published as [`EventKind::DaemonTickFailed`]
//!   and, under the default [`FailurePolicy::Continue`], does not stop the
//!   schedule.
//! - Cancellation never aborts a running invocation by force; it prevents
//!   the next one and asks the current one to unwind via its token.
//! - [`EventKind::DaemonStopped`] is terminal: under `FromStart` it is
//!   published only after every overlapped invocation has completed.
//! - A daemon submitted after cancellation is rejected with
//!   [`EventKind::DaemonRejected`], mirroring the request path.

use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::core::runtime::RuntimeHandle;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::{FailurePolicy, RepeatPolicy};
use crate::tasks::{DaemonSpec, TaskContext};

/// Launches daemons into the shared runtime and supervises their schedule.
///
/// Owns no request-specific state; cheap to construct wherever a handle is
/// available.
pub struct Supervisor {
    runtime: RuntimeHandle,
}

impl Supervisor {
    /// Creates a supervisor submitting into the given runtime.
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    /// Schedules a daemon for the life of the process.
    ///
    /// Publishes [`EventKind::DaemonScheduled`] and spawns the actor loop
    /// as a tracked task, so shutdown drains it like any other work.
    ///
    /// ## Errors
    /// [`TaskError::ShuttingDown`] if cancellation has already fired;
    /// nothing is scheduled.
    pub fn run_daemon(&self, spec: DaemonSpec) -> Result<(), TaskError> {
        let shared = self.runtime.shared();
        if shared.cancel.is_cancelled() {
            shared
                .bus
                .publish(Event::now(EventKind::DaemonRejected).with_task(spec.name()));
            return Err(TaskError::ShuttingDown);
        }

        shared.bus.publish(
            Event::now(EventKind::DaemonScheduled)
                .with_task(spec.name())
                .with_delay(spec.schedule().every),
        );

        let actor = DaemonActor {
            runtime: self.runtime.clone(),
            spec,
        };
        shared
            .tracker
            .spawn_on(actor.run(), self.runtime.tokio());
        Ok(())
    }
}

/// Drives one daemon's schedule until cancellation.
struct DaemonActor {
    runtime: RuntimeHandle,
    spec: DaemonSpec,
}

impl DaemonActor {
    async fn run(self) {
        let shared = self.runtime.shared();
        let bus = shared.bus.clone();
        let cancel = shared.cancel.clone();
        // Local stop signal: lets a failed overlapped tick halt the
        // schedule under FailurePolicy::Stop.
        let stop = CancellationToken::new();
        // Overlapped ticks live here; the actor itself sits in the shared
        // tracker, so the shutdown drain waits on them transitively.
        let ticks = TaskTracker::new();
        let mut attempt: u64 = 0;

        loop {
            if cancel.is_cancelled() || stop.is_cancelled() {
                break;
            }

            attempt += 1;
            bus.publish(
                Event::now(EventKind::DaemonTickStarted)
                    .with_task(self.spec.name())
                    .with_attempt(attempt),
            );

            let ctx = self.runtime.task_context();
            match self.spec.schedule().repeat {
                RepeatPolicy::FromStart => self.spawn_tick(ctx, attempt, &stop, &ticks),
                RepeatPolicy::FromEnd => {
                    let res = self.spec.daemon().tick(ctx).await;
                    if self.report(res, attempt) == FailurePolicy::Stop {
                        break;
                    }
                }
            }

            let sleep = time::sleep(self.spec.schedule().every);
            tokio::pin!(sleep);
            tokio::select! {
                _ = &mut sleep => {}
                _ = cancel.cancelled() => break,
                _ = stop.cancelled() => break,
            }
        }

        // Stopped is terminal: wait out any overlapped invocations first.
        ticks.close();
        ticks.wait().await;
        bus.publish(Event::now(EventKind::DaemonStopped).with_task(self.spec.name()));
    }

    /// Runs one invocation as its own tracked task (FromStart policy).
    fn spawn_tick(
        &self,
        ctx: TaskContext,
        attempt: u64,
        stop: &CancellationToken,
        ticks: &TaskTracker,
    ) {
        let daemon = self.spec.daemon().clone();
        let bus = self.runtime.shared().bus.clone();
        let name = self.spec.name().to_string();
        let on_failure = self.spec.on_failure();
        let stop = stop.clone();

        ticks.spawn(async move {
            match daemon.tick(ctx).await {
                Ok(()) => {
                    bus.publish(
                        Event::now(EventKind::DaemonTickCompleted)
                            .with_task(name.as_str())
                            .with_attempt(attempt),
                    );
                }
                Err(e) => {
                    bus.publish(
                        Event::now(EventKind::DaemonTickFailed)
                            .with_task(name.as_str())
                            .with_attempt(attempt)
                            .with_error(e.to_string()),
                    );
                    if on_failure == FailurePolicy::Stop {
                        stop.cancel();
                    }
                }
            }
        });
    }

    /// Publishes a sequential tick's outcome; returns the policy to apply.
    fn report(&self, res: Result<(), TaskError>, attempt: u64) -> FailurePolicy {
        let bus: &Bus = &self.runtime.shared().bus;
        match res {
            Ok(()) => {
                bus.publish(
                    Event::now(EventKind::DaemonTickCompleted)
                        .with_task(self.spec.name())
                        .with_attempt(attempt),
                );
                FailurePolicy::Continue
            }
            Err(e) => {
                bus.publish(
                    Event::now(EventKind::DaemonTickFailed)
                        .with_task(self.spec.name())
                        .with_attempt(attempt)
                        .with_error(e.to_string()),
                );
                self.spec.on_failure()
            }
        }
    }
}
