//! Daily reading reminder
//!
//! A reminder is due once the configured time of day has passed and today's
//! reading is still short of the daily goal.

use chrono::{DateTime, Local, NaiveTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::models::{AppSettings, ReadingStats};
use crate::stats::total_on;

/// Reminder state at a given instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reminder {
    /// Notifications are off, or the reminder time is unusable
    Disabled,
    /// Reminder time has not come yet today
    Scheduled { at: NaiveTime },
    /// Today's goal is already met
    GoalMet,
    /// Time to read
    Due { remaining_minutes: u64 },
}

impl Reminder {
    /// Message shown to the user when the reminder is due
    pub fn message(&self) -> Option<String> {
        match self {
            Reminder::Due { remaining_minutes } => Some(format!(
                "Time to read! {} to go for today's goal.",
                crate::format::minutes_label(*remaining_minutes)
            )),
            _ => None,
        }
    }
}

/// Evaluate the reminder at `now`
pub fn check(settings: &AppSettings, stats: &ReadingStats, now: DateTime<Utc>) -> Reminder {
    if !settings.notifications_enabled {
        return Reminder::Disabled;
    }

    let Some(at) = settings.reminder_time() else {
        warn!(
            "Reminder time {:?} is not HH:MM, reminders are off",
            settings.notification_time
        );
        return Reminder::Disabled;
    };

    let local = now.with_timezone(&Local);
    let today_total = total_on(&stats.sessions, local.date_naive());
    let goal = settings.daily_goal_secs();
    if today_total >= goal {
        return Reminder::GoalMet;
    }

    if local.time() < at {
        return Reminder::Scheduled { at };
    }

    Reminder::Due {
        remaining_minutes: (goal - today_total).div_ceil(60),
    }
}
