//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB file for the KeyValueStore port (CLI, durable)
//! - In-memory map for the KeyValueStore port (tests, embedding)
//! - Demo data seeding for demo mode

pub mod demo;
pub mod duckdb;
pub mod memory;

pub use self::duckdb::DuckDbStore;
pub use self::memory::MemoryStore;
