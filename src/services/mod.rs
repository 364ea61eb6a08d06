//! Service registration and resolution.
//!
//! Services are the shared capabilities tasks draw on at execution time.
//! The registry is frozen before the runtime accepts work; see
//! [`ServiceRegistry`] for the contract.

mod registry;

pub use registry::{ServiceRegistry, ServiceRegistryBuilder};
