//! # Request handler abstraction.
//!
//! A [`Handler`] answers one external call: it receives the call's opaque
//! `args` payload plus a [`TaskContext`], and produces exactly one terminal
//! outcome — a success value or a [`TaskError`]. Handlers are registered on
//! the [`RequestBridge`](crate::RequestBridge) at bootstrap, keyed by
//! operation name.
//!
//! [`HandlerFn`] wraps a closure, the same shape [`DaemonFn`](crate::DaemonFn)
//! gives daemons.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TaskError;
use crate::tasks::context::TaskContext;

/// Shared handle to a handler (`Arc<dyn Handler>`).
pub type HandlerRef = Arc<dyn Handler>;

/// A named unit of work answering one external call.
///
/// The `args` payload is opaque to the bridge and passed through unchanged.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use taskbridge::{Handler, TaskContext, TaskError};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Handler for Echo {
///     fn name(&self) -> &str { "echo" }
///
///     async fn call(&self, _ctx: TaskContext, args: Value) -> Result<Value, TaskError> {
///         Ok(args)
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Returns the operation name this handler answers.
    fn name(&self) -> &str;

    /// Executes one request.
    async fn call(&self, ctx: TaskContext, args: Value) -> Result<Value, TaskError>;
}

/// Function-backed handler implementation.
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(TaskContext, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, ctx: TaskContext, args: Value) -> Result<Value, TaskError> {
        (self.f)(ctx, args).await
    }
}
