//! # Immutable service registry.
//!
//! [`ServiceRegistry`] maps a string identifier to a shared service
//! implementation. It is assembled once, during process bootstrap, via
//! [`ServiceRegistryBuilder`]; after [`build`](ServiceRegistryBuilder::build)
//! no identifier is ever added, removed, or replaced.
//!
//! ## Rules
//! - Registration happens strictly before the runtime accepts work.
//! - Resolution is a plain `HashMap` read — immutability is what makes
//!   concurrent resolution from many simultaneous tasks safe without locking.
//! - Resolving an unregistered identifier is a programming error: it fails
//!   the offending task with [`TaskError::ServiceNotFound`], never the process.
//!
//! ## Example
//! ```
//! use taskbridge::ServiceRegistry;
//!
//! struct Greeter;
//! impl Greeter {
//!     fn greet(&self, who: &str) -> String { format!("hello, {who}") }
//! }
//!
//! let registry = ServiceRegistry::builder().register("greeter", Greeter).build();
//! let greeter = registry.resolve::<Greeter>("greeter").unwrap();
//! assert_eq!(greeter.greet("world"), "hello, world");
//! assert!(registry.resolve::<Greeter>("missing").is_err());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TaskError;

type ServiceRef = Arc<dyn Any + Send + Sync>;

/// Immutable mapping from service identifier to implementation.
///
/// Shared read-only by every task in the runtime; see the module docs for
/// the registration/resolution contract.
pub struct ServiceRegistry {
    services: HashMap<String, ServiceRef>,
}

impl ServiceRegistry {
    /// Starts building a registry. Registration is only valid before the
    /// runtime starts accepting work.
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder {
            services: HashMap::new(),
        }
    }

    /// Resolves a service by identifier and concrete type.
    ///
    /// ## Errors
    /// - [`TaskError::ServiceNotFound`] — the identifier was never registered.
    /// - [`TaskError::Fatal`] — the identifier is registered, but not as `S`.
    pub fn resolve<S: Send + Sync + 'static>(&self, service: &str) -> Result<Arc<S>, TaskError> {
        let found = self
            .services
            .get(service)
            .cloned()
            .ok_or_else(|| TaskError::ServiceNotFound {
                service: service.to_string(),
            })?;
        found.downcast::<S>().map_err(|_| TaskError::Fatal {
            error: format!(
                "service {service:?} is not a {}",
                std::any::type_name::<S>()
            ),
        })
    }

    /// True if an identifier was registered.
    pub fn contains(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    /// Returns sorted registered identifiers.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True if no services were registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish()
    }
}

/// Bootstrap-time builder for [`ServiceRegistry`].
///
/// Registering the same identifier twice keeps the later implementation.
pub struct ServiceRegistryBuilder {
    services: HashMap<String, ServiceRef>,
}

impl ServiceRegistryBuilder {
    /// Registers a service under `name`, taking ownership.
    pub fn register<S: Send + Sync + 'static>(self, name: impl Into<String>, service: S) -> Self {
        self.register_arc(name, Arc::new(service))
    }

    /// Registers an already-shared service under `name`.
    pub fn register_arc<S: Send + Sync + 'static>(
        mut self,
        name: impl Into<String>,
        service: Arc<S>,
    ) -> Self {
        self.services.insert(name.into(), service);
        self
    }

    /// Freezes the registry. No mutation is possible afterwards.
    pub fn build(self) -> Arc<ServiceRegistry> {
        Arc::new(ServiceRegistry {
            services: self.services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Echo;
    impl Echo {
        fn echo(&self, s: &str) -> String {
            s.to_string()
        }
    }

    #[derive(Debug)]
    struct Counter(std::sync::atomic::AtomicU64);

    #[test]
    fn test_register_and_resolve() {
        let registry = ServiceRegistry::builder().register("echo", Echo).build();
        let echo = registry.resolve::<Echo>("echo").expect("resolves");
        assert_eq!(echo.echo("abc"), "abc");
    }

    #[test]
    fn test_unregistered_identifier_fails() {
        let registry = ServiceRegistry::builder().build();
        let err = registry.resolve::<Echo>("echo").unwrap_err();
        assert_eq!(err.as_label(), "service_not_found");
    }

    #[test]
    fn test_wrong_type_is_fatal() {
        let registry = ServiceRegistry::builder().register("echo", Echo).build();
        let err = registry
            .resolve::<Counter>("echo")
            .unwrap_err();
        assert_eq!(err.as_label(), "task_fatal");
    }

    #[test]
    fn test_duplicate_registration_keeps_last() {
        let first = Arc::new(Counter(std::sync::atomic::AtomicU64::new(1)));
        let second = Arc::new(Counter(std::sync::atomic::AtomicU64::new(2)));
        let registry = ServiceRegistry::builder()
            .register_arc("counter", first)
            .register_arc("counter", second.clone())
            .build();
        let resolved = registry.resolve::<Counter>("counter").unwrap();
        assert!(Arc::ptr_eq(&resolved, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = ServiceRegistry::builder()
            .register("zeta", Echo)
            .register("alpha", Echo)
            .build();
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        assert!(registry.contains("alpha"));
        assert!(!registry.is_empty());
    }
}
