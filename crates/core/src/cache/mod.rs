//! Persistent key-value store and the search result cache built on it.
//!
//! This module provides:
//!
//! - A flat string key-value store (`KvStore`) with SQLite and in-memory backends
//! - Byte quotas on the store, surfaced as `Error::QuotaExceeded`
//! - Automatic schema migrations for the SQLite backend
//! - A 24-hour TTL result cache keyed by search mode and normalized term

pub mod connection;
pub mod key;
pub mod migrations;
pub mod results;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::{CACHE_PREFIX, CACHE_TTL_MS, cache_key, is_fresh};
pub use results::{CacheEntry, ResultCache};
pub use store::{KvStore, MemoryStore};
