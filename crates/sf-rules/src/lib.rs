//! SiteFence rules layer
//!
//! Persistent rule and focus-group management plus the blocking decision
//! pipeline, built on the pure core in `sf-core`. Storage goes through the
//! [`store::StoragePort`] seam so the same logic runs against an in-memory
//! map in tests and a JSON file in the CLI.
//!
//! # Modules
//!
//! - `store`: storage port trait and its memory/file backends
//! - `handler`: rule and focus-group CRUD over a port
//! - `engine`: the per-navigation blocking decision

pub mod engine;
pub mod handler;
pub mod store;

// Re-export commonly used types
pub use engine::{evaluate, Evaluation};
pub use handler::RuleStore;
pub use store::{JsonFileStore, MemoryStore, StoragePort, StoreError};
