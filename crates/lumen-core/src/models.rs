//! Data models for Lumen
//!
//! Defines the persisted records: ReadingSession, ReadingStats, AppSettings
//! and InProgressSession, plus the derived DayReport.
//! JSON field names are camelCase so the stored shape stays stable.

use std::ops::RangeInclusive;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Allowed daily goal, in minutes
pub const DAILY_GOAL_RANGE: RangeInclusive<u32> = 1..=480;

/// Allowed streak threshold, in minutes
pub const STREAK_THRESHOLD_RANGE: RangeInclusive<u32> = 1..=120;

/// Format of `AppSettings::notification_time`
pub const NOTIFICATION_TIME_FORMAT: &str = "%H:%M";

/// One completed reading session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
    /// Unique identifier
    pub id: String,
    /// When the session was completed
    pub date: DateTime<Utc>,
    /// Length in seconds
    pub duration: u64,
    /// Optional note, never empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReadingSession {
    /// Create a session completed at `date`
    ///
    /// The note is trimmed; a blank note is dropped.
    pub fn new(date: DateTime<Utc>, duration: u64, note: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            duration,
            note: normalize_note(note),
        }
    }

    /// Calendar day of the session in local time
    pub fn local_date(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }
}

/// Aggregate reading statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingStats {
    /// Cumulative seconds over all sessions
    pub total_time: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Append-only, oldest first
    pub sessions: Vec<ReadingSession>,
    /// Daily goal in minutes at the time of the last reset
    pub daily_goal: u32,
    /// Last calendar day a session was recorded
    #[serde(with = "calendar_day", skip_serializing_if = "Option::is_none")]
    pub last_read_date: Option<NaiveDate>,
}

impl Default for ReadingStats {
    fn default() -> Self {
        Self {
            total_time: 0,
            current_streak: 0,
            longest_streak: 0,
            sessions: Vec::new(),
            daily_goal: AppSettings::default().daily_goal,
            last_read_date: None,
        }
    }
}

impl ReadingStats {
    /// Fresh statistics carrying over the given daily goal
    pub fn reset_with_goal(daily_goal: u32) -> Self {
        Self {
            daily_goal,
            ..Self::default()
        }
    }
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Daily goal in minutes
    pub daily_goal: u32,
    pub notifications_enabled: bool,
    /// Reminder time, "HH:MM"
    pub notification_time: String,
    /// Minimum minutes for a day to count toward the streak
    pub streak_threshold: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_goal: 15,
            notifications_enabled: true,
            notification_time: "19:00".to_string(),
            streak_threshold: 10,
        }
    }
}

/// Errors from validating settings before they are saved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Daily goal must be between 1 and 480 minutes, got {value}")]
    DailyGoalOutOfRange { value: u32 },

    #[error("Streak threshold must be between 1 and 120 minutes, got {value}")]
    StreakThresholdOutOfRange { value: u32 },

    #[error("Invalid reminder time '{value}', expected HH:MM")]
    InvalidNotificationTime { value: String },
}

impl AppSettings {
    pub fn daily_goal_secs(&self) -> u64 {
        u64::from(self.daily_goal) * 60
    }

    pub fn streak_threshold_secs(&self) -> u64 {
        u64::from(self.streak_threshold) * 60
    }

    /// Parsed reminder time, `None` if the stored value is malformed
    pub fn reminder_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.notification_time.trim(), NOTIFICATION_TIME_FORMAT).ok()
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !DAILY_GOAL_RANGE.contains(&self.daily_goal) {
            return Err(SettingsError::DailyGoalOutOfRange {
                value: self.daily_goal,
            });
        }
        if !STREAK_THRESHOLD_RANGE.contains(&self.streak_threshold) {
            return Err(SettingsError::StreakThresholdOutOfRange {
                value: self.streak_threshold,
            });
        }
        if self.reminder_time().is_none() {
            return Err(SettingsError::InvalidNotificationTime {
                value: self.notification_time.clone(),
            });
        }
        Ok(())
    }
}

/// A session that is currently being timed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InProgressSession {
    /// Start instant, epoch milliseconds
    pub start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl InProgressSession {
    /// A session starting at `now`
    pub fn starting_at(now: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            start_time: now.timestamp_millis(),
            note,
        }
    }

    /// A session whose start is back-dated so that `elapsed_at(now)` is `elapsed`
    pub fn backdated(now: DateTime<Utc>, elapsed: u64, note: Option<String>) -> Self {
        let elapsed_ms = i64::try_from(elapsed)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        Self {
            start_time: now.timestamp_millis().saturating_sub(elapsed_ms),
            note,
        }
    }

    /// Whole seconds between the start and `now`, never negative
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        let millis = now.timestamp_millis().saturating_sub(self.start_time);
        u64::try_from(millis / 1000).unwrap_or(0)
    }
}

/// Reading summary for one calendar day
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub label: String,
    /// Whole minutes read that day
    pub minutes: u64,
    pub goal_met: bool,
}

fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Serde adapter for calendar days stored as strings
///
/// Writes `YYYY-MM-DD`. Also reads the `Sun Oct 18 2026` form used by
/// older records; anything else reads as absent.
mod calendar_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO: &str = "%Y-%m-%d";
    const LEGACY: &str = "%a %b %d %Y";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(ISO).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| parse(&s)))
    }

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let parsed = NaiveDate::parse_from_str(s, ISO)
            .or_else(|_| NaiveDate::parse_from_str(s, LEGACY))
            .ok();
        if parsed.is_none() {
            tracing::warn!("Ignoring unrecognised calendar day {:?}", s);
        }
        parsed
    }
}
