//! Session engine
//!
//! The `Engine` owns the reading state (stats, settings, the running timer)
//! and is the only component that mutates it. Views read a `Snapshot` and
//! subscribe to `EngineEvent`s to know when to re-render.
//!
//! ## Persistence
//!
//! Every mutation is written through to the key-value store right away.
//! Writes are best effort: a failing store is logged and the in-memory state
//! stays authoritative, so a full disk never stops the timer.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = Engine::open()?;  // resumes a session left running
//! let mut events = engine.subscribe();
//!
//! engine.start(None);
//! engine.poll_ticks();               // call regularly while running
//! let outcome = engine.stop();
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::models::{
    AppSettings, DayReport, InProgressSession, ReadingSession, ReadingStats, SettingsError,
};
use crate::reminder::{self, Reminder};
use crate::stats::{self, StopOutcome};
use crate::storage::records::{load_optional, load_or_default, write_json};
use crate::storage::{
    FileStore, KeyValueStore, StorageError, CURRENT_SESSION_KEY, SETTINGS_KEY, STATS_KEY,
};
use crate::timer::{SessionTimer, TimerState};

/// Change notifications published by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SessionStarted,
    /// Running again, after a pause or from a persisted session
    SessionResumed { elapsed: u64 },
    Ticked { elapsed: u64 },
    SessionPaused { elapsed: u64 },
    SessionSaved {
        session: ReadingSession,
        goal_newly_met: bool,
    },
    SessionTooShort { elapsed: u64 },
    SessionDiscarded,
    StatsReset,
    SettingsSaved,
}

/// Immutable view of the engine state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub today: NaiveDate,
    pub timer: TimerState,
    pub elapsed: u64,
    pub note: String,
    pub stats: ReadingStats,
    pub settings: AppSettings,
    /// Seconds read today
    pub today_total: u64,
    /// Percentage of the daily goal, capped at 100
    pub goal_progress: f64,
    pub goal_reached: bool,
}

impl Snapshot {
    pub fn todays_sessions(&self) -> Vec<&ReadingSession> {
        stats::todays_sessions(&self.stats.sessions, self.today)
    }

    /// Per-day summary of the last `days` days, oldest first
    pub fn report(&self, days: u32) -> Vec<DayReport> {
        stats::aggregate_last_n_days(
            &self.stats.sessions,
            days,
            self.settings.daily_goal,
            self.today,
        )
    }

    pub fn average_session(&self) -> u64 {
        stats::average_session(&self.stats)
    }
}

/// Reading state and the rules that change it
pub struct Engine<S = FileStore, C = SystemClock> {
    store: S,
    clock: C,
    stats: ReadingStats,
    settings: AppSettings,
    timer: SessionTimer,
    subscribers: Vec<UnboundedSender<EngineEvent>>,
}

impl Engine<FileStore, SystemClock> {
    /// Open the engine on the configured data directory
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the engine with a specific configuration
    pub fn open_with_config(config: &Config) -> Self {
        Self::new(FileStore::from_config(config))
    }
}

impl<S: KeyValueStore> Engine<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Engine<S, C> {
    /// Load state from `store` and resume a persisted session, if any
    pub fn with_clock(store: S, clock: C) -> Self {
        let mut engine = Self {
            stats: load_or_default(&store, STATS_KEY),
            settings: load_or_default(&store, SETTINGS_KEY),
            store,
            clock,
            timer: SessionTimer::new(),
            subscribers: Vec::new(),
        };
        engine.resume_on_load();
        engine
    }

    // ==================== Session Lifecycle ====================

    /// Resume the session recorded in storage
    ///
    /// Returns the recovered elapsed seconds. Elapsed time is not capped: a
    /// session left running for days resumes at its full length.
    pub fn resume_on_load(&mut self) -> Option<u64> {
        let record: InProgressSession = load_optional(&self.store, CURRENT_SESSION_KEY)?;
        self.timer.restore(&record, self.clock.now());

        let elapsed = self.timer.elapsed();
        info!("Resumed reading session at {}s", elapsed);
        self.emit(EngineEvent::SessionResumed { elapsed });
        Some(elapsed)
    }

    /// Start a new session now
    ///
    /// Any session already in progress is replaced.
    pub fn start(&mut self, note: Option<String>) -> InProgressSession {
        let now = self.clock.now();
        if self.timer.state() != TimerState::Idle {
            debug!("Replacing session in progress at {}s", self.timer.elapsed());
        }
        self.timer.start(now, note);

        let record = InProgressSession::starting_at(now, self.timer.note_opt());
        self.persist(CURRENT_SESSION_KEY, &record);
        info!("Reading session started");
        self.emit(EngineEvent::SessionStarted);
        record
    }

    /// Continue a paused session; false unless paused
    pub fn resume(&mut self) -> bool {
        if !self.timer.resume(self.clock.now()) {
            return false;
        }
        self.checkpoint();
        let elapsed = self.timer.elapsed();
        self.emit(EngineEvent::SessionResumed { elapsed });
        true
    }

    /// Stop counting without ending the session
    ///
    /// The persisted record is kept, so a restart picks the session up again.
    pub fn pause(&mut self) -> bool {
        if !self.timer.pause() {
            return false;
        }
        let elapsed = self.timer.elapsed();
        debug!("Paused at {}s", elapsed);
        self.emit(EngineEvent::SessionPaused { elapsed });
        true
    }

    /// Advance the running session by one second
    pub fn tick(&mut self) -> bool {
        if !self.timer.tick() {
            return false;
        }
        self.checkpoint();
        let elapsed = self.timer.elapsed();
        self.emit(EngineEvent::Ticked { elapsed });
        true
    }

    /// Apply every tick that came due since the last poll
    pub fn poll_ticks(&mut self) -> u64 {
        let due = self.timer.due_ticks(self.clock.now());
        if due == 0 {
            return 0;
        }
        for _ in 0..due {
            self.timer.tick();
        }
        self.checkpoint();
        let elapsed = self.timer.elapsed();
        self.emit(EngineEvent::Ticked { elapsed });
        due
    }

    /// Replace the note of the session in progress
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.timer.set_note(note);
        if self.timer.is_running() {
            self.checkpoint();
        }
    }

    /// End the session in progress and record it
    pub fn stop(&mut self) -> StopOutcome {
        let (elapsed, note) = self.timer.finish();
        self.stop_with(elapsed, note.as_deref())
    }

    /// End the session with an explicit length and note
    ///
    /// Sessions under a minute are rejected. Either way the running state
    /// and the persisted record are cleared.
    pub fn stop_with(&mut self, elapsed: u64, note: Option<&str>) -> StopOutcome {
        self.timer = SessionTimer::new();

        let result = stats::stop_session(
            elapsed,
            note,
            &self.settings,
            &self.stats,
            self.clock.now(),
        );

        if result.accepted() {
            self.stats = result.stats;
            let stats = self.stats.clone();
            self.persist(STATS_KEY, &stats);
        }
        self.clear_current();

        match &result.outcome {
            StopOutcome::TooShort { elapsed } => {
                info!("Session of {}s too short, not recorded", elapsed);
                self.emit(EngineEvent::SessionTooShort { elapsed: *elapsed });
            }
            StopOutcome::Saved {
                session,
                goal_newly_met,
                ..
            } => {
                info!(
                    "Recorded {}s session, streak {}",
                    session.duration, self.stats.current_streak
                );
                self.emit(EngineEvent::SessionSaved {
                    session: session.clone(),
                    goal_newly_met: *goal_newly_met,
                });
            }
        }

        result.outcome
    }

    /// Drop the session in progress without recording it
    pub fn discard(&mut self) -> bool {
        let was_active = self.timer.state() != TimerState::Idle;
        self.timer = SessionTimer::new();
        self.clear_current();
        if was_active {
            info!("Reading session discarded");
            self.emit(EngineEvent::SessionDiscarded);
        }
        was_active
    }

    // ==================== Stats & Settings ====================

    /// Erase all sessions and streaks
    ///
    /// The daily goal carries over from the current settings. Confirming
    /// with the user is the caller's job.
    pub fn reset(&mut self) {
        self.stats = ReadingStats::reset_with_goal(self.settings.daily_goal);
        let stats = self.stats.clone();
        self.persist(STATS_KEY, &stats);
        info!("Reading progress reset");
        self.emit(EngineEvent::StatsReset);
    }

    /// Validate and store new settings
    pub fn save_settings(&mut self, settings: AppSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.persist(SETTINGS_KEY, &settings);
        self.settings = settings;
        info!("Settings saved");
        self.emit(EngineEvent::SettingsSaved);
        Ok(())
    }

    /// Re-read stats and settings from storage
    ///
    /// Picks up changes written by another process. The running timer is
    /// left alone.
    pub fn reload(&mut self) {
        self.stats = load_or_default(&self.store, STATS_KEY);
        self.settings = load_or_default(&self.store, SETTINGS_KEY);
    }

    // ==================== Queries ====================

    pub fn stats(&self) -> &ReadingStats {
        &self.stats
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Today's calendar day in local time
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn todays_sessions(&self) -> Vec<&ReadingSession> {
        stats::todays_sessions(&self.stats.sessions, self.today())
    }

    pub fn today_total(&self) -> u64 {
        stats::total_on(&self.stats.sessions, self.today())
    }

    /// Per-day summary of the last `days` days, oldest first
    pub fn report(&self, days: u32) -> Vec<DayReport> {
        stats::aggregate_last_n_days(
            &self.stats.sessions,
            days,
            self.settings.daily_goal,
            self.today(),
        )
    }

    pub fn reminder(&self) -> Reminder {
        reminder::check(&self.settings, &self.stats, self.clock.now())
    }

    /// Time until the next tick is due, `None` unless running
    pub fn until_next_tick(&self) -> Option<std::time::Duration> {
        self.timer.schedule().until_next(self.clock.now())
    }

    pub fn snapshot(&self) -> Snapshot {
        let today = self.today();
        let today_total = stats::total_on(&self.stats.sessions, today);
        Snapshot {
            today,
            timer: self.timer.state(),
            elapsed: self.timer.elapsed(),
            note: self.timer.note().to_string(),
            stats: self.stats.clone(),
            settings: self.settings.clone(),
            today_total,
            goal_progress: stats::goal_progress(today_total, self.settings.daily_goal),
            goal_reached: today_total >= self.settings.daily_goal_secs(),
        }
    }

    /// Receive every event published from now on
    pub fn subscribe(&mut self) -> UnboundedReceiver<EngineEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    // ==================== Internal ====================

    fn emit(&mut self, event: EngineEvent) {
        // Dropped receivers unsubscribe themselves
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Persist the running session so a restart recovers the same elapsed value
    fn checkpoint(&mut self) {
        let record = self.timer.checkpoint(self.clock.now());
        self.persist(CURRENT_SESSION_KEY, &record);
    }

    fn persist<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(e) = write_json(&mut self.store, key, value) {
            log_storage_failure(&format!("save '{}'", key), &e);
        }
    }

    fn clear_current(&mut self) {
        if let Err(e) = self.store.remove(CURRENT_SESSION_KEY) {
            log_storage_failure("clear session in progress", &e);
        }
    }
}

fn log_storage_failure(action: &str, err: &StorageError) {
    match err.hint() {
        Some(hint) => warn!("Failed to {}: {} ({})", action, err, hint),
        None => warn!("Failed to {}: {}", action, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::{MemoryStore, StorageResult};
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use tempfile::TempDir;

    /// Local noon, so the whole test stays on one calendar day
    fn t0() -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn test_engine() -> (Engine<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new(t0());
        let engine = Engine::with_clock(MemoryStore::new(), clock.clone());
        (engine, clock)
    }

    /// Run a session of `secs` seconds through the tick schedule
    fn read_for(engine: &mut Engine<MemoryStore, ManualClock>, clock: &ManualClock, secs: i64) {
        engine.start(None);
        clock.advance(Duration::seconds(secs));
        engine.poll_ticks();
    }

    fn drain(rx: &mut UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Store whose writes always fail
    #[derive(Default)]
    struct BrokenStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::InvalidKey {
                key: key.to_string(),
            })
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            Err(StorageError::InvalidKey {
                key: key.to_string(),
            })
        }
    }

    #[test]
    fn test_fresh_engine_uses_defaults() {
        let (engine, _clock) = test_engine();
        assert_eq!(engine.stats(), &ReadingStats::default());
        assert_eq!(engine.settings(), &AppSettings::default());
        assert_eq!(engine.timer().state(), TimerState::Idle);
    }

    #[test]
    fn test_start_persists_record() {
        let (mut engine, _clock) = test_engine();
        let record = engine.start(Some("Moby-Dick".to_string()));

        assert_eq!(record.start_time, t0().timestamp_millis());
        assert_eq!(engine.timer().state(), TimerState::Running);

        let stored: InProgressSession =
            load_optional(engine.store(), CURRENT_SESSION_KEY).unwrap();
        assert_eq!(stored, record);
        assert_eq!(stored.note.as_deref(), Some("Moby-Dick"));
    }

    #[test]
    fn test_start_overwrites_stale_session() {
        let (mut engine, clock) = test_engine();
        engine.start(Some("old".to_string()));
        clock.advance(Duration::minutes(5));
        engine.poll_ticks();

        let record = engine.start(Some("new".to_string()));
        assert_eq!(engine.timer().elapsed(), 0);
        assert_eq!(record.note.as_deref(), Some("new"));
    }

    #[test]
    fn test_ticks_and_checkpoint() {
        let (mut engine, clock) = test_engine();
        engine.start(None);

        assert!(engine.tick());
        assert!(engine.tick());
        assert_eq!(engine.timer().elapsed(), 2);

        // Wall clock moved further than the counted ticks
        clock.advance(Duration::milliseconds(500));
        engine.set_note("Beloved");
        let stored: InProgressSession =
            load_optional(engine.store(), CURRENT_SESSION_KEY).unwrap();
        assert_eq!(stored.elapsed_at(clock.now()), 2);
        assert_eq!(stored.note.as_deref(), Some("Beloved"));
    }

    #[test]
    fn test_poll_ticks_follows_wall_clock() {
        let (mut engine, clock) = test_engine();
        engine.start(None);

        assert_eq!(engine.poll_ticks(), 0);
        clock.advance(Duration::milliseconds(3400));
        assert_eq!(engine.poll_ticks(), 3);
        assert_eq!(engine.timer().elapsed(), 3);
        assert_eq!(
            engine.until_next_tick(),
            Some(std::time::Duration::from_millis(600))
        );
    }

    #[test]
    fn test_pause_stops_ticks_but_keeps_record() {
        let (mut engine, clock) = test_engine();
        read_for(&mut engine, &clock, 30);

        assert!(engine.pause());
        assert!(!engine.pause());
        clock.advance(Duration::seconds(100));
        assert_eq!(engine.poll_ticks(), 0);
        assert!(!engine.tick());
        assert_eq!(engine.timer().elapsed(), 30);
        assert!(engine.until_next_tick().is_none());
        assert!(engine.store().contains_key(CURRENT_SESSION_KEY));

        assert!(engine.resume());
        clock.advance(Duration::seconds(2));
        engine.poll_ticks();
        assert_eq!(engine.timer().elapsed(), 32);
    }

    #[test]
    fn test_too_short_session_is_rejected() {
        let (mut engine, clock) = test_engine();
        read_for(&mut engine, &clock, 59);

        let outcome = engine.stop();
        assert_eq!(outcome, StopOutcome::TooShort { elapsed: 59 });
        assert!(engine.stats().sessions.is_empty());
        assert_eq!(engine.timer().state(), TimerState::Idle);
        assert!(!engine.store().contains_key(CURRENT_SESSION_KEY));
        assert!(!engine.store().contains_key(STATS_KEY));
    }

    #[test]
    fn test_short_session_example() {
        let (mut engine, clock) = test_engine();
        read_for(&mut engine, &clock, 125);

        let outcome = engine.stop();
        assert!(outcome.accepted());

        let stats = engine.stats();
        assert_eq!(stats.sessions.len(), 1);
        assert_eq!(stats.sessions[0].duration, 125);
        assert_eq!(stats.total_time, 125);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert!(!engine.store().contains_key(CURRENT_SESSION_KEY));
    }

    #[test]
    fn test_three_sessions_start_streak() {
        let (mut engine, clock) = test_engine();
        for secs in [200, 200, 250] {
            read_for(&mut engine, &clock, secs);
            engine.stop();
            clock.advance(Duration::minutes(10));
        }

        let stats = engine.stats();
        assert_eq!(stats.total_time, 650);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn test_stop_with_explicit_values() {
        let (mut engine, _clock) = test_engine();
        let outcome = engine.stop_with(3600, Some("  "));

        match outcome {
            StopOutcome::Saved {
                session,
                today_total,
                goal_newly_met,
            } => {
                assert_eq!(session.duration, 3600);
                assert!(session.note.is_none());
                assert_eq!(today_total, 3600);
                assert!(goal_newly_met);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(engine.stats().current_streak, 1);
    }

    #[test]
    fn test_stats_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let clock = ManualClock::new(t0());

        {
            let mut engine =
                Engine::with_clock(FileStore::new(temp_dir.path()), clock.clone());
            engine.start(Some("Dracula".to_string()));
            clock.advance(Duration::minutes(12));
            engine.poll_ticks();
            assert!(engine.stop().accepted());
        }

        let engine = Engine::with_clock(FileStore::new(temp_dir.path()), clock.clone());
        assert_eq!(engine.stats().sessions.len(), 1);
        assert_eq!(engine.stats().total_time, 720);
        assert_eq!(engine.stats().current_streak, 1);
        assert_eq!(
            engine.stats().sessions[0].note.as_deref(),
            Some("Dracula")
        );
        assert_eq!(engine.timer().state(), TimerState::Idle);
    }

    #[test]
    fn test_resume_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let clock = ManualClock::new(t0());

        {
            let mut engine =
                Engine::with_clock(FileStore::new(temp_dir.path()), clock.clone());
            engine.start(Some("Jane Eyre".to_string()));
            clock.advance(Duration::seconds(40));
            engine.poll_ticks();
        }

        // Process was gone for a while
        clock.advance(Duration::seconds(20));
        let engine = Engine::with_clock(FileStore::new(temp_dir.path()), clock.clone());
        assert_eq!(engine.timer().state(), TimerState::Running);
        assert_eq!(engine.timer().elapsed(), 60);
        assert_eq!(engine.timer().note(), "Jane Eyre");
    }

    #[test]
    fn test_resume_on_load_is_not_capped() {
        let clock = ManualClock::new(t0());
        let mut store = MemoryStore::new();
        let record = InProgressSession::starting_at(t0() - Duration::days(3), None);
        write_json(&mut store, CURRENT_SESSION_KEY, &record).unwrap();

        let engine = Engine::with_clock(store, clock);
        assert_eq!(engine.timer().elapsed(), 3 * 86_400);
    }

    #[test]
    fn test_malformed_records_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(STATS_KEY, "[1, 2").unwrap();
        store.set(SETTINGS_KEY, "not json").unwrap();
        store.set(CURRENT_SESSION_KEY, r#"{"note": "no start"}"#).unwrap();

        let engine = Engine::with_clock(store, ManualClock::new(t0()));
        assert_eq!(engine.stats(), &ReadingStats::default());
        assert_eq!(engine.settings(), &AppSettings::default());
        assert_eq!(engine.timer().state(), TimerState::Idle);
    }

    #[test]
    fn test_discard() {
        let (mut engine, clock) = test_engine();
        assert!(!engine.discard());

        read_for(&mut engine, &clock, 600);
        assert!(engine.discard());
        assert_eq!(engine.timer().state(), TimerState::Idle);
        assert!(engine.stats().sessions.is_empty());
        assert!(!engine.store().contains_key(CURRENT_SESSION_KEY));
    }

    #[test]
    fn test_reset_carries_daily_goal() {
        let (mut engine, clock) = test_engine();
        let settings = AppSettings {
            daily_goal: 40,
            ..AppSettings::default()
        };
        engine.save_settings(settings).unwrap();
        read_for(&mut engine, &clock, 900);
        engine.stop();
        assert_eq!(engine.stats().sessions.len(), 1);

        engine.reset();
        let stats = engine.stats();
        assert!(stats.sessions.is_empty());
        assert_eq!(stats.total_time, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.daily_goal, 40);

        let stored: ReadingStats = load_or_default(engine.store(), STATS_KEY);
        assert_eq!(&stored, stats);
    }

    #[test]
    fn test_save_settings_validates() {
        let (mut engine, _clock) = test_engine();
        let bad = AppSettings {
            streak_threshold: 0,
            ..AppSettings::default()
        };
        assert!(engine.save_settings(bad).is_err());
        assert!(!engine.store().contains_key(SETTINGS_KEY));
        assert_eq!(engine.settings(), &AppSettings::default());

        let good = AppSettings {
            streak_threshold: 1,
            notifications_enabled: false,
            ..AppSettings::default()
        };
        engine.save_settings(good.clone()).unwrap();
        assert_eq!(engine.settings(), &good);
        let stored: AppSettings = load_or_default(engine.store(), SETTINGS_KEY);
        assert_eq!(stored, good);
    }

    #[test]
    fn test_threshold_from_saved_settings_applies() {
        let (mut engine, clock) = test_engine();
        engine
            .save_settings(AppSettings {
                streak_threshold: 1,
                ..AppSettings::default()
            })
            .unwrap();

        read_for(&mut engine, &clock, 60);
        engine.stop();
        assert_eq!(engine.stats().current_streak, 1);
    }

    #[test]
    fn test_streak_across_days() {
        let (mut engine, clock) = test_engine();
        for _ in 0..3 {
            read_for(&mut engine, &clock, 600);
            engine.stop();
            clock.advance(Duration::days(1) - Duration::seconds(600));
        }
        assert_eq!(engine.stats().current_streak, 3);

        // Skip a day
        clock.advance(Duration::days(1));
        read_for(&mut engine, &clock, 600);
        engine.stop();
        assert_eq!(engine.stats().current_streak, 1);
        assert_eq!(engine.stats().longest_streak, 3);
    }

    #[test]
    fn test_storage_failures_are_not_fatal() {
        let clock = ManualClock::new(t0());
        let mut engine = Engine::with_clock(BrokenStore::default(), clock.clone());

        engine.start(None);
        clock.advance(Duration::seconds(90));
        engine.poll_ticks();
        assert!(engine.stop().accepted());
        assert_eq!(engine.stats().total_time, 90);
        engine.reset();
        assert!(engine.save_settings(AppSettings::default()).is_ok());
    }

    #[test]
    fn test_events_are_published() {
        let (mut engine, clock) = test_engine();
        let mut rx = engine.subscribe();

        engine.start(None);
        clock.advance(Duration::seconds(2));
        engine.poll_ticks();
        engine.pause();
        engine.resume();
        engine.stop();
        engine.reset();

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                EngineEvent::SessionStarted,
                EngineEvent::Ticked { elapsed: 2 },
                EngineEvent::SessionPaused { elapsed: 2 },
                EngineEvent::SessionResumed { elapsed: 2 },
                EngineEvent::SessionTooShort { elapsed: 2 },
                EngineEvent::StatsReset,
            ]
        );
    }

    #[test]
    fn test_saved_event_carries_session() {
        let (mut engine, clock) = test_engine();
        let mut rx = engine.subscribe();

        read_for(&mut engine, &clock, 900);
        engine.stop();

        let saved = drain(&mut rx)
            .into_iter()
            .find_map(|e| match e {
                EngineEvent::SessionSaved {
                    session,
                    goal_newly_met,
                } => Some((session, goal_newly_met)),
                _ => None,
            })
            .unwrap();
        assert_eq!(saved.0.duration, 900);
        assert!(saved.1);
    }

    #[test]
    fn test_dropped_subscriber_is_removed() {
        let (mut engine, _clock) = test_engine();
        let rx = engine.subscribe();
        drop(rx);
        engine.start(None);
        assert!(engine.subscribers.is_empty());
    }

    #[test]
    fn test_snapshot() {
        let (mut engine, clock) = test_engine();
        read_for(&mut engine, &clock, 450);
        engine.stop();
        engine.start(Some("Kindred".to_string()));
        clock.advance(Duration::seconds(5));
        engine.poll_ticks();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.timer, TimerState::Running);
        assert_eq!(snapshot.elapsed, 5);
        assert_eq!(snapshot.note, "Kindred");
        assert_eq!(snapshot.today_total, 450);
        assert_eq!(snapshot.goal_progress, 50.0);
        assert!(!snapshot.goal_reached);
        assert_eq!(snapshot.todays_sessions().len(), 1);
        assert_eq!(snapshot.average_session(), 450);

        let report = snapshot.report(7);
        assert_eq!(report.len(), 7);
        assert_eq!(report[6].minutes, 7);
        assert_eq!(report[6].date, engine.today());
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let (mut engine, _clock) = test_engine();
        let other = AppSettings {
            daily_goal: 90,
            ..AppSettings::default()
        };
        write_json(&mut engine.store, SETTINGS_KEY, &other).unwrap();

        engine.reload();
        assert_eq!(engine.settings().daily_goal, 90);
    }
}
