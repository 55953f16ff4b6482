//! Ref-count domain - shared resource lifetime tracking

mod registry;

pub use registry::{RefCountRegistry, RefCountRegistryConfig, RefEntry};
