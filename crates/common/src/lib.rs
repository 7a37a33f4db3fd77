//! Shared types for the playspace engine.
//!
//! # Invariants
//! - Entity ids are registry slot indices; insertion order is id order.
//! - Transforms default to identity.

pub mod types;

pub use types::{EntityId, ProcessMode, Transform};
