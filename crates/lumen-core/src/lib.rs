//! Lumen Core Library
//!
//! This crate provides the core functionality for Lumen, a local-first
//! reading-habit tracker: a session timer, daily goals, reading streaks and
//! a weekly report.
//!
//! # Architecture
//!
//! - **Storage**: a small key-value store, one JSON record per slot
//! - **Engine**: the only mutator of reading state; views read snapshots
//!
//! # Quick Start
//!
//! ```text
//! let mut engine = Engine::open()?;
//!
//! engine.start(Some("Dune, chapter 3".into()));
//! // ... one tick per second ...
//! match engine.stop() {
//!     StopOutcome::Saved { .. } => println!("saved"),
//!     StopOutcome::TooShort { .. } => println!("read for at least a minute"),
//! }
//! ```
//!
//! # Modules
//!
//! - `engine`: session lifecycle and change notification (main entry point)
//! - `stats`: streak rules and aggregations over the session history
//! - `models`: persisted records
//! - `storage`: key-value persistence
//! - `timer`: running-session state and the tick schedule
//! - `format`: duration presentation
//! - `quotes`: literary quote pool
//! - `reminder`: daily reminder decision
//! - `config`: Application configuration

pub mod clock;
pub mod config;
pub mod engine;
pub mod format;
pub mod models;
pub mod quotes;
pub mod reminder;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use engine::{Engine, EngineEvent, Snapshot};
pub use format::{format_duration, DurationStyle};
pub use models::{
    AppSettings, DayReport, InProgressSession, ReadingSession, ReadingStats, SettingsError,
};
pub use quotes::{pick_random, random_quote, Quote, LITERARY_QUOTES};
pub use reminder::Reminder;
pub use stats::{StopOutcome, StopResult, MIN_SESSION_SECS};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use timer::{SessionTimer, TickSchedule, TimerState};
