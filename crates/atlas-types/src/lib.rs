//! Core types for the entity-atlas synchronization system.
//!
//! Defines the domain vocabulary shared by the storage, search and
//! indexing crates:
//! - [`Entity`]: canonical entity state held by the entity store
//! - [`IndexDocument`]: the searchable projection of an entity
//! - [`Cause`]: classified mutation reasons and their index relevance
//! - [`QueueEntry`]: a durable synchronization intent in the recovery queue

pub mod cause;
pub mod entity;
pub mod queue;

pub use cause::Cause;
pub use entity::{Entity, IndexDocument};
pub use queue::QueueEntry;
