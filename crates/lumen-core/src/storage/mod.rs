//! Storage layer
//!
//! Persistence is a flat key-value store of JSON records.
//!
//! ## Slots
//!
//! - `lumen_reading_stats`: `ReadingStats`
//! - `lumen_settings`: `AppSettings`
//! - `lumen_current_session`: `InProgressSession`, only while a session runs
//!
//! Every slot is read independently; there are no multi-key transactions.

pub mod error;
pub mod kv;
pub mod records;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use records::{CURRENT_SESSION_KEY, SETTINGS_KEY, STATS_KEY};
