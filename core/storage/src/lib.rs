//! Persistent key/value storage for PassVault.
//!
//! This module provides a trait-based interface over string-keyed,
//! string-valued slots and a registry for resolving a backend by name.
//!
//! # Design Principles
//! - Backend isolation: no backend-specific logic in vault or crypto modules
//! - Async operations: all I/O operations are async
//! - Unified error semantics: backend failures surface as
//!   `Error::StorageUnavailable`

pub mod local;
pub mod memory;
pub mod provider;
pub mod registry;

pub use local::FileStore;
pub use memory::MemoryStore;
pub use provider::KeyValueStore;
pub use registry::{StoreFactory, StoreRegistry};
