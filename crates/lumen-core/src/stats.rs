//! Session bookkeeping and aggregations
//!
//! Pure functions over `ReadingStats`. Calendar days are local days; the
//! caller passes the instant (or day) to evaluate against so results do not
//! depend on the wall clock.
//!
//! ## Streak rules
//!
//! A day counts toward the streak once its reading total reaches the streak
//! threshold. When a stop brings today over the threshold:
//! - last counted day was yesterday, or there is none: streak + 1
//! - last counted day was today: unchanged
//! - anything older: streak restarts at 1
//!
//! Below the threshold the streak is left alone.

use std::collections::HashMap;

use chrono::{DateTime, Days, Local, NaiveDate, Utc};

use crate::models::{AppSettings, DayReport, ReadingSession, ReadingStats};

/// Shortest session that is recorded, in seconds
pub const MIN_SESSION_SECS: u64 = 60;

/// What happened to a stopped session
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// Shorter than a minute, nothing was recorded
    TooShort { elapsed: u64 },
    /// Appended to the history
    Saved {
        session: ReadingSession,
        /// Today's total including this session, in seconds
        today_total: u64,
        /// The daily goal was not met before this session and is now
        goal_newly_met: bool,
    },
}

impl StopOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, StopOutcome::Saved { .. })
    }
}

/// Updated statistics plus the outcome of a stop
#[derive(Debug, Clone, PartialEq)]
pub struct StopResult {
    pub stats: ReadingStats,
    pub outcome: StopOutcome,
}

impl StopResult {
    pub fn accepted(&self) -> bool {
        self.outcome.accepted()
    }
}

/// Record a stopped session of `elapsed` seconds finishing at `now`
///
/// Sessions under a minute are rejected and `current` is returned as is.
pub fn stop_session(
    elapsed: u64,
    note: Option<&str>,
    settings: &AppSettings,
    current: &ReadingStats,
    now: DateTime<Utc>,
) -> StopResult {
    if elapsed < MIN_SESSION_SECS {
        return StopResult {
            stats: current.clone(),
            outcome: StopOutcome::TooShort { elapsed },
        };
    }

    let today = now.with_timezone(&Local).date_naive();
    let before = total_on(&current.sessions, today);

    let session = ReadingSession::new(now, elapsed, note);
    let mut stats = current.clone();
    stats.sessions.push(session.clone());
    stats.total_time = stats.total_time.saturating_add(elapsed);

    let today_total = total_on(&stats.sessions, today);
    let meets_threshold = today_total >= settings.streak_threshold_secs();
    stats.current_streak =
        next_streak(stats.current_streak, stats.last_read_date, today, meets_threshold);
    stats.longest_streak = stats.longest_streak.max(stats.current_streak);
    if meets_threshold {
        stats.last_read_date = Some(today);
    }

    let goal = settings.daily_goal_secs();
    let goal_newly_met = before < goal && today_total >= goal;

    StopResult {
        stats,
        outcome: StopOutcome::Saved {
            session,
            today_total,
            goal_newly_met,
        },
    }
}

/// Streak after a stop on `today`
pub fn next_streak(
    current: u32,
    last_read: Option<NaiveDate>,
    today: NaiveDate,
    meets_threshold: bool,
) -> u32 {
    if !meets_threshold {
        return current;
    }

    match last_read {
        None => current.saturating_add(1),
        Some(day) if day == today => current,
        Some(day) if Some(day) == today.pred_opt() => current.saturating_add(1),
        Some(_) => 1,
    }
}

/// Sessions recorded today, in original order
pub fn todays_sessions(sessions: &[ReadingSession], today: NaiveDate) -> Vec<&ReadingSession> {
    sessions.iter().filter(|s| s.local_date() == today).collect()
}

/// Seconds read on `day`
pub fn total_on(sessions: &[ReadingSession], day: NaiveDate) -> u64 {
    sessions
        .iter()
        .filter(|s| s.local_date() == day)
        .map(|s| s.duration)
        .sum()
}

/// One entry per day for the `n` days ending `today`, oldest first
pub fn aggregate_last_n_days(
    sessions: &[ReadingSession],
    n: u32,
    daily_goal_minutes: u32,
    today: NaiveDate,
) -> Vec<DayReport> {
    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    for session in sessions {
        *per_day.entry(session.local_date()).or_insert(0) += session.duration;
    }

    (0..n)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            let minutes = per_day.get(&date).copied().unwrap_or(0) / 60;
            DayReport {
                date,
                label: date.format("%a").to_string(),
                minutes,
                goal_met: minutes >= u64::from(daily_goal_minutes),
            }
        })
        .collect()
}

/// Mean session length in seconds, 0 without sessions
pub fn average_session(stats: &ReadingStats) -> u64 {
    match stats.sessions.len() as u64 {
        0 => 0,
        count => stats.total_time / count,
    }
}

/// Share of the daily goal reached, as a percentage capped at 100
pub fn goal_progress(today_total: u64, daily_goal_minutes: u32) -> f64 {
    let goal = u64::from(daily_goal_minutes) * 60;
    if goal == 0 {
        return 100.0;
    }
    (today_total as f64 / goal as f64 * 100.0).min(100.0)
}

/// Upper bound for a bar chart of `reports` with a goal marker
pub fn chart_scale(reports: &[DayReport], daily_goal_minutes: u32) -> u64 {
    reports
        .iter()
        .map(|r| r.minutes)
        .max()
        .unwrap_or(0)
        .max(u64::from(daily_goal_minutes))
}
