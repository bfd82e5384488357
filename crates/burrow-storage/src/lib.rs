//! Store adapters for Burrow links.

pub mod memory;
pub mod redis;

pub use burrow_core::{Atomicity, ReadStore, StorageError, Store};
pub use memory::InMemoryStore;
pub use self::redis::RedisStore;
