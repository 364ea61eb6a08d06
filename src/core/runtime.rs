//! # The shared runtime and its submission handle.
//!
//! [`Runtime`] owns the one multi-threaded scheduler the process ever
//! builds, the frozen [`ServiceRegistry`], the process-wide
//! `CancellationToken`, and the active-task set. [`RuntimeHandle`] is the
//! cheap clone passed explicitly into every component that submits work —
//! there is no ambient global lookup.
//!
//! ## High-level architecture
//! ```text
//! Runtime::start(cfg, registry, subscribers)        (once per process)
//!   ├─► tokio multi-thread runtime (owned)
//!   ├─► Shared { registry, cancel token, task tracker, bus, request sem }
//!   └─► listener task: Bus ──► subscriber.on_event() for each subscriber
//!
//! RuntimeHandle::submit(name, work)                 (many, concurrent)
//!   ├─► cancelled already? ──► Err(ShuttingDown), nothing scheduled
//!   ├─► TaskContext { registry, child token }
//!   ├─► tracker.spawn_on(wrapped work)              (independent task)
//!   └─► await outcome (panic → Fatal, abort → Canceled)
//!
//! RuntimeHandle::cancel_all()
//!   └─► sets the token; draining is ShutdownController's job
//! ```
//!
//! ## Rules
//! - Exactly one runtime per process: a second `start` fails with
//!   [`RuntimeError::AlreadyStarted`] and the first stays usable.
//! - Submissions after `cancel_all` fail fast with
//!   [`TaskError::ShuttingDown`]; no task is scheduled.
//! - Every scheduled task sits in the tracker until it reaches a terminal
//!   state, which is what the shutdown drain waits on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{oneshot, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::services::ServiceRegistry;
use crate::subscribers::Subscriber;
use crate::tasks::TaskContext;

/// Process-wide start guard. One-way: set on the first successful start.
static STARTED: AtomicBool = AtomicBool::new(false);

/// State shared by the runtime and all of its handles.
pub(crate) struct Shared {
    pub(crate) registry: Arc<ServiceRegistry>,
    pub(crate) cancel: CancellationToken,
    pub(crate) tracker: TaskTracker,
    pub(crate) bus: Bus,
    pub(crate) grace: std::time::Duration,
    request_sem: Option<Arc<Semaphore>>,
}

/// The single shared runtime. Owns the scheduler; dropping it tears the
/// scheduler down, so the host keeps it alive for the process lifetime.
pub struct Runtime {
    rt: tokio::runtime::Runtime,
    handle: RuntimeHandle,
}

impl Runtime {
    /// Builds the runtime exactly once per process.
    ///
    /// Constructs the scheduler per `cfg`, freezes `registry` into the
    /// shared state, spawns the subscriber listener, and publishes
    /// [`EventKind::RuntimeStarted`].
    ///
    /// ## Errors
    /// - [`RuntimeError::AlreadyStarted`] on the second call in a process;
    ///   the first runtime remains usable.
    /// - [`RuntimeError::Init`] if the scheduler cannot be built (the guard
    ///   is released so a corrected config may retry).
    pub fn start(
        cfg: Config,
        registry: Arc<ServiceRegistry>,
        subscribers: Vec<Arc<dyn Subscriber>>,
    ) -> Result<Runtime, RuntimeError> {
        if STARTED.swap(true, Ordering::SeqCst) {
            return Err(RuntimeError::AlreadyStarted);
        }

        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.enable_all();
        if let Some(n) = cfg.worker_threads() {
            builder.worker_threads(n);
        }
        let rt = match builder.build() {
            Ok(rt) => rt,
            Err(e) => {
                STARTED.store(false, Ordering::SeqCst);
                return Err(RuntimeError::Init {
                    error: e.to_string(),
                });
            }
        };

        let shared = Arc::new(Shared {
            registry,
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            bus: Bus::new(cfg.bus_capacity_clamped()),
            grace: cfg.grace,
            request_sem: cfg.request_limit().map(|n| Arc::new(Semaphore::new(n))),
        });
        let handle = RuntimeHandle {
            rt: rt.handle().clone(),
            shared,
        };

        handle.spawn_subscriber_listener(subscribers);
        handle.shared.bus.publish(Event::now(EventKind::RuntimeStarted));

        Ok(Runtime { rt, handle })
    }

    /// Returns a cheap submission handle.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// The frozen service registry the runtime was built with.
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        self.handle.registry()
    }

    /// Runs a future to completion on this runtime, blocking the calling
    /// thread. Convenience for a host main loop; must not be called from
    /// inside the runtime.
    pub fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }
}

/// Cheap, clonable handle for submitting work into the shared runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    rt: tokio::runtime::Handle,
    shared: Arc<Shared>,
}

impl RuntimeHandle {
    /// Submits an isolated unit of work and awaits its terminal outcome.
    ///
    /// `work` is given a fresh [`TaskContext`] (registry + child token) and
    /// runs as its own tracked task on whatever worker the scheduler picks;
    /// concurrent submissions never block each other's scheduling. When a
    /// request cap is configured, execution waits on the semaphore inside
    /// the spawned task.
    ///
    /// ## Errors
    /// - [`TaskError::ShuttingDown`] — submission after `cancel_all`;
    ///   rejected immediately, nothing is scheduled.
    /// - [`TaskError::Fatal`] — the task panicked.
    /// - [`TaskError::Canceled`] — the task was cancelled before completing.
    pub async fn submit<T, F, Fut>(&self, name: &str, work: F) -> Result<T, TaskError>
    where
        T: Send + 'static,
        F: FnOnce(TaskContext) -> Fut,
        Fut: std::future::Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let join = self.submit_inner(name, work)?;
        outcome(join).await
    }

    /// Blocking twin of [`submit`](Self::submit) for foreign threads.
    ///
    /// The external caller's thread parks on a oneshot promise that the
    /// scheduled task resolves exactly once; the runtime's own workers are
    /// never blocked. Panics if called from inside an async context — the
    /// bridge is for threads that live outside the runtime.
    pub fn submit_blocking<T, F, Fut>(&self, name: &str, work: F) -> Result<T, TaskError>
    where
        T: Send + 'static,
        F: FnOnce(TaskContext) -> Fut,
        Fut: std::future::Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let join = self.submit_inner(name, work)?;
        let (tx, rx) = oneshot::channel();
        self.rt.spawn(async move {
            let _ = tx.send(outcome(join).await);
        });
        match rx.blocking_recv() {
            Ok(res) => res,
            Err(_) => Err(TaskError::Fatal {
                error: "result channel closed before resolution".to_string(),
            }),
        }
    }

    /// Sets the process-wide cancellation token.
    ///
    /// One-way; does not wait for anything to unwind (that is
    /// [`ShutdownController`](crate::ShutdownController)'s job).
    pub fn cancel_all(&self) {
        self.shared.cancel.cancel();
    }

    /// True once `cancel_all` has fired.
    pub fn is_shutting_down(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Number of tasks currently tracked (scheduled but not yet terminal).
    pub fn active_tasks(&self) -> usize {
        self.shared.tracker.len()
    }

    /// The frozen service registry.
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.shared.registry
    }

    /// The runtime's event bus.
    pub fn bus(&self) -> &Bus {
        &self.shared.bus
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    pub(crate) fn tokio(&self) -> &tokio::runtime::Handle {
        &self.rt
    }

    /// Builds the context a fresh task executes under.
    pub(crate) fn task_context(&self) -> TaskContext {
        TaskContext::new(self.shared.registry.clone(), self.shared.cancel.child_token())
    }

    fn submit_inner<T, F, Fut>(
        &self,
        name: &str,
        work: F,
    ) -> Result<JoinHandle<Result<T, TaskError>>, TaskError>
    where
        T: Send + 'static,
        F: FnOnce(TaskContext) -> Fut,
        Fut: std::future::Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        if self.shared.cancel.is_cancelled() {
            self.shared
                .bus
                .publish(Event::now(EventKind::RequestRejected).with_task(name));
            return Err(TaskError::ShuttingDown);
        }

        let fut = work(self.task_context());
        let name = name.to_string();
        let bus = self.shared.bus.clone();
        let cancel = self.shared.cancel.clone();
        let sem = self.shared.request_sem.clone();

        let wrapped = async move {
            let _permit = match sem {
                Some(sem) => {
                    tokio::select! {
                        permit = sem.acquire_owned() => match permit {
                            Ok(p) => Some(p),
                            Err(_closed) => return Err(TaskError::ShuttingDown),
                        },
                        _ = cancel.cancelled() => return Err(TaskError::Canceled),
                    }
                }
                None => None,
            };

            bus.publish(Event::now(EventKind::RequestStarted).with_task(name.as_str()));
            let res = fut.await;
            match &res {
                Ok(_) => {
                    bus.publish(Event::now(EventKind::RequestCompleted).with_task(name.as_str()))
                }
                Err(e) => bus.publish(
                    Event::now(EventKind::RequestFailed)
                        .with_task(name.as_str())
                        .with_error(e.to_string()),
                ),
            }
            res
        };

        Ok(self.shared.tracker.spawn_on(wrapped, &self.rt))
    }

    /// Spawns the listener that fans bus events out to subscribers.
    ///
    /// Untracked on purpose: it must keep delivering shutdown events while
    /// the tracker drains, and it ends with the process.
    fn spawn_subscriber_listener(&self, subscribers: Vec<Arc<dyn Subscriber>>) {
        if subscribers.is_empty() {
            return;
        }
        let mut rx = self.shared.bus.subscribe();
        self.rt.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        for sub in &subscribers {
                            sub.on_event(&ev).await;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

/// Maps a join result onto the task's terminal outcome.
async fn outcome<T>(join: JoinHandle<Result<T, TaskError>>) -> Result<T, TaskError> {
    match join.await {
        Ok(res) => res,
        Err(e) if e.is_panic() => Err(TaskError::Fatal {
            error: "task panicked".to_string(),
        }),
        Err(_) => Err(TaskError::Canceled),
    }
}
