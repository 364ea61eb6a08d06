//! # RequestBridge: synchronous entry point over the shared runtime.
//!
//! The bridge is what the external transport calls. Each call names an
//! operation and carries an opaque JSON payload; the bridge turns it into
//! one isolated request task on the single shared runtime and hands back
//! the terminal outcome. No runtime is ever constructed per call — the
//! whole point is that hundreds of calls per second reuse the one built at
//! process start.
//!
//! ```text
//! transport thread ──► bridge.handle(name, args)
//!                        ├─► lookup handler (frozen map)
//!                        └─► runtime.submit_blocking
//!                              └─► request task (own TaskContext)
//!                                    └─► handler.call(ctx, args)
//!                        ◄── success value | structured error
//! ```
//!
//! ## Rules
//! - The operation table is frozen at [`build`](BridgeBuilder::build);
//!   concurrent invocations share it read-only and never observe each
//!   other's state.
//! - Every call receives exactly one terminal response. Handler panics
//!   surface as [`TaskError::Fatal`], never as an unwinding fault across
//!   the boundary; [`handle_json`](RequestBridge::handle_json) goes one
//!   step further and folds even errors into a well-formed response value.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::core::runtime::RuntimeHandle;
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::tasks::HandlerRef;

/// Translates external calls into request-task submissions and back.
///
/// Cheap to clone; clones share the same frozen operation table and
/// runtime handle, so one bridge instance serves any number of transport
/// threads.
#[derive(Clone)]
pub struct RequestBridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    runtime: RuntimeHandle,
    handlers: HashMap<String, HandlerRef>,
}

impl RequestBridge {
    /// Starts building a bridge over the given runtime. Operations are
    /// registered during bootstrap, before the transport goes live.
    pub fn builder(runtime: RuntimeHandle) -> BridgeBuilder {
        BridgeBuilder {
            runtime,
            handlers: HashMap::new(),
        }
    }

    /// Answers one external call, blocking the calling thread until the
    /// outcome is available.
    ///
    /// For transport layers that invoke from their own (non-async)
    /// threads. Must not be called from inside the runtime — async callers
    /// use [`dispatch`](Self::dispatch).
    ///
    /// ## Errors
    /// - [`TaskError::HandlerNotFound`] — no handler under `name`.
    /// - [`TaskError::ShuttingDown`] — rejected, runtime is draining.
    /// - any [`TaskError`] the handler itself produced.
    pub fn handle(&self, name: &str, args: Value) -> Result<Value, TaskError> {
        let handler = self.lookup(name)?;
        self.inner
            .runtime
            .submit_blocking(name, move |ctx| async move { handler.call(ctx, args).await })
    }

    /// Async twin of [`handle`](Self::handle) for callers already inside
    /// the runtime.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value, TaskError> {
        let handler = self.lookup(name)?;
        self.inner
            .runtime
            .submit(name, move |ctx| async move { handler.call(ctx, args).await })
            .await
    }

    /// Infallible transport shape: always exactly one well-formed response.
    ///
    /// ```text
    /// success: {"ok": true,  "value": <handler result>}
    /// failure: {"ok": false, "error": <stable label>, "message": <detail>}
    /// ```
    pub fn handle_json(&self, name: &str, args: Value) -> Value {
        match self.handle(name, args) {
            Ok(value) => json!({ "ok": true, "value": value }),
            Err(e) => json!({ "ok": false, "error": e.as_label(), "message": e.as_message() }),
        }
    }

    /// Returns sorted registered operation names.
    pub fn operations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn lookup(&self, name: &str) -> Result<HandlerRef, TaskError> {
        match self.inner.handlers.get(name) {
            Some(h) => Ok(h.clone()),
            None => {
                self.inner.runtime.bus().publish(
                    Event::now(EventKind::RequestFailed)
                        .with_task(name)
                        .with_error("handler_not_found"),
                );
                Err(TaskError::HandlerNotFound {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// Bootstrap-time builder for [`RequestBridge`].
///
/// Registering the same operation name twice keeps the later handler.
pub struct BridgeBuilder {
    runtime: RuntimeHandle,
    handlers: HashMap<String, HandlerRef>,
}

impl BridgeBuilder {
    /// Registers a handler under its own [`Handler::name`](crate::Handler::name).
    pub fn operation(mut self, handler: HandlerRef) -> Self {
        self.handlers.insert(handler.name().to_string(), handler);
        self
    }

    /// Registers a handler under an explicit operation name.
    pub fn operation_named(mut self, name: impl Into<String>, handler: HandlerRef) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Freezes the operation table.
    pub fn build(self) -> RequestBridge {
        RequestBridge {
            inner: Arc::new(BridgeInner {
                runtime: self.runtime,
                handlers: self.handlers,
            }),
        }
    }
}
