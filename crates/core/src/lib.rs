//! Core types and shared functionality for coursefind.
//!
//! This crate provides:
//! - Key-value store with SQLite and in-memory backends
//! - TTL-bounded search result cache
//! - Unified error types
//! - Configuration structures
//! - Course, professor and location models

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheDb, KvStore, MemoryStore, ResultCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use models::{Course, LocationRecord, ProfessorMatch, SearchMode, Suggestions};
