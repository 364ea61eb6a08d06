//! # Per-task execution context.
//!
//! Every unit of work — a request task or a daemon tick — receives a
//! [`TaskContext`] at submission time: read access to the shared
//! [`ServiceRegistry`] plus a cancellation token parented to the
//! process-wide one. Cancellation is cooperative: well-behaved tasks check
//! the token at their suspension points and unwind promptly once it is set.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::services::ServiceRegistry;

/// Execution context handed to each task.
///
/// Cheap to clone; clones share the same registry and token.
#[derive(Clone)]
pub struct TaskContext {
    registry: Arc<ServiceRegistry>,
    cancel: CancellationToken,
}

impl TaskContext {
    pub(crate) fn new(registry: Arc<ServiceRegistry>, cancel: CancellationToken) -> Self {
        Self { registry, cancel }
    }

    /// Resolves a service from the shared registry.
    ///
    /// Shorthand for [`ServiceRegistry::resolve`] on [`registry`](Self::registry).
    pub fn resolve<S: Send + Sync + 'static>(&self, service: &str) -> Result<Arc<S>, TaskError> {
        self.registry.resolve::<S>(service)
    }

    /// The shared service registry.
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// True once shutdown has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes when shutdown is signalled. Intended for `tokio::select!`
    /// against the task's own suspension points.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// The task's cancellation token, for passing into child work.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Derives a child context whose token is parented to this one.
    ///
    /// Tasks that submit child work use this to propagate the "set" state
    /// downward.
    pub fn child(&self) -> TaskContext {
        TaskContext {
            registry: self.registry.clone(),
            cancel: self.cancel.child_token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Echo;

    #[test]
    fn test_resolve_goes_through_registry() {
        let registry = ServiceRegistry::builder().register("echo", Echo).build();
        let ctx = TaskContext::new(registry, CancellationToken::new());
        assert!(ctx.resolve::<Echo>("echo").is_ok());
        assert_eq!(
            ctx.resolve::<Echo>("nope").unwrap_err().as_label(),
            "service_not_found"
        );
    }

    #[test]
    fn test_child_observes_parent_cancellation() {
        let registry = ServiceRegistry::builder().build();
        let parent = CancellationToken::new();
        let ctx = TaskContext::new(registry, parent.clone());
        let child = ctx.child();
        assert!(!child.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
        assert!(ctx.is_cancelled());
    }
}
