//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

pub mod keys;
mod key_value;

pub use key_value::{KeyValueStore, KeyValueStoreExt, WriteBatch, WriteOp};
