//! # Daemon abstraction and function-backed implementation.
//!
//! A [`Daemon`] is a unit of work the supervisor re-invokes on a schedule
//! until cancellation. Each invocation ([`tick`](Daemon::tick)) is bounded,
//! has its own outcome, and receives a fresh [`TaskContext`].
//!
//! [`DaemonFn`] wraps a closure `F: Fn(TaskContext) -> Fut`, producing a
//! fresh future per invocation; shared state goes through an explicit
//! `Arc` inside the closure.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::context::TaskContext;

/// Shared handle to a daemon (`Arc<dyn Daemon>`).
pub type DaemonRef = Arc<dyn Daemon>;

/// A repeatedly invoked, cancellation-aware unit of work.
///
/// Implementations should check `ctx.is_cancelled()` inside long ticks and
/// unwind promptly during shutdown.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskbridge::{Daemon, TaskContext, TaskError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Daemon for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     async fn tick(&self, ctx: TaskContext) -> Result<(), TaskError> {
///         if ctx.is_cancelled() {
///             return Ok(());
///         }
///         // emit heartbeat...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Daemon: Send + Sync + 'static {
    /// Returns a stable, human-readable daemon name.
    fn name(&self) -> &str;

    /// Executes one scheduled invocation.
    async fn tick(&self, ctx: TaskContext) -> Result<(), TaskError>;
}

/// Function-backed daemon implementation.
pub struct DaemonFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> DaemonFn<F> {
    /// Creates a new function-backed daemon.
    ///
    /// Prefer [`DaemonFn::arc`] when you immediately need a [`DaemonRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the daemon and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Daemon for DaemonFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn tick(&self, ctx: TaskContext) -> Result<(), TaskError> {
        (self.f)(ctx).await
    }
}
