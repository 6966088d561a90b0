//! Running-session state
//!
//! `SessionTimer` is the state machine behind the timer view:
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!   ^                |                  |
//!   +-----stop/discard-----------------+
//! ```
//!
//! Elapsed time advances one second per tick. Ticks are produced by a
//! `TickSchedule` that only exists while the timer runs, so pausing or
//! stopping cancels it and no stray tick can land afterwards.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::InProgressSession;

/// Whether a session is being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// One-second tick schedule
///
/// Tracks when the next tick is due. Polling with the current time returns
/// the number of ticks that became due since the last poll, so a late poll
/// catches up instead of losing seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSchedule {
    next_due: Option<DateTime<Utc>>,
}

impl TickSchedule {
    /// Start ticking, first tick one second after `now`
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + Duration::seconds(1));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks due at `now`; zero when cancelled
    pub fn poll(&mut self, now: DateTime<Utc>) -> u64 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }

        let late_ms = (now - due).num_milliseconds().max(0);
        let ticks = 1 + late_ms / 1000;
        self.next_due = Some(due + Duration::seconds(ticks));
        u64::try_from(ticks).unwrap_or(0)
    }

    /// Time until the next tick, `None` when cancelled
    pub fn until_next(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let due = self.next_due?;
        Some((due - now).to_std().unwrap_or(std::time::Duration::ZERO))
    }
}

/// Timer for the session in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    state: TimerState,
    elapsed: u64,
    note: String,
    schedule: TickSchedule,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed: 0,
            note: String::new(),
            schedule: TickSchedule::default(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Elapsed seconds of the current session
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Note for persistence, `None` when blank
    pub fn note_opt(&self) -> Option<String> {
        if self.note.trim().is_empty() {
            None
        } else {
            Some(self.note.clone())
        }
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    /// Begin a fresh session at `now`
    pub fn start(&mut self, now: DateTime<Utc>, note: Option<String>) {
        self.state = TimerState::Running;
        self.elapsed = 0;
        self.note = note.unwrap_or_default();
        self.schedule.arm(now);
    }

    /// Pick up a persisted session, elapsed counted from its start time
    pub fn restore(&mut self, record: &InProgressSession, now: DateTime<Utc>) {
        self.state = TimerState::Running;
        self.elapsed = record.elapsed_at(now);
        self.note = record.note.clone().unwrap_or_default();
        self.schedule.arm(now);
    }

    /// Continue a paused session; false unless paused
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.state = TimerState::Running;
        self.schedule.arm(now);
        true
    }

    /// Stop advancing; false unless running
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        self.schedule.cancel();
        true
    }

    /// Advance one second; ignored unless running
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.elapsed += 1;
        true
    }

    /// Ticks due at `now`
    pub fn due_ticks(&mut self, now: DateTime<Utc>) -> u64 {
        if self.state != TimerState::Running {
            return 0;
        }
        self.schedule.poll(now)
    }

    /// Back to idle, returning the elapsed seconds and note of the session
    pub fn finish(&mut self) -> (u64, Option<String>) {
        let finished = (self.elapsed, self.note_opt());
        *self = Self::new();
        finished
    }

    /// Record to persist so a restart recovers the same elapsed value
    pub fn checkpoint(&self, now: DateTime<Utc>) -> InProgressSession {
        InProgressSession::backdated(now, self.elapsed, self.note_opt())
    }
}
