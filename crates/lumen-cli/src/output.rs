//! How commands print
//!
//! Every command renders through `Output`: plain text for people, `--json`
//! for scripts, and `--quiet` for a bare value or nothing at all.

use lumen_core::format::{days_label, format_duration, DurationStyle};
use lumen_core::stats::chart_scale;
use lumen_core::{AppSettings, DayReport, Quote, ReadingSession, Reminder, Snapshot, TimerState};
use serde::Serialize;

/// Width of the bars in the weekly chart
const BAR_WIDTH: u64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl OutputFormat {
    /// `--quiet` wins over `--json`
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        match (json, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Json,
            (false, false) => Self::Human,
        }
    }
}

pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        }
    }

    /// Print the timer state
    pub fn print_status(&self, snapshot: &Snapshot) {
        match self.format {
            OutputFormat::Human => {
                match snapshot.timer {
                    TimerState::Idle => println!("No reading session in progress."),
                    TimerState::Running | TimerState::Paused => {
                        let state = if snapshot.timer == TimerState::Running {
                            "Reading"
                        } else {
                            "Paused"
                        };
                        println!(
                            "{}: {}",
                            state,
                            format_duration(snapshot.elapsed, DurationStyle::Clock)
                        );
                        if !snapshot.note.trim().is_empty() {
                            println!("Note: {}", snapshot.note);
                        }
                    }
                }
                println!(
                    "Today: {} of {} min ({:.0}%)",
                    format_duration(snapshot.today_total, DurationStyle::Compact),
                    snapshot.settings.daily_goal,
                    snapshot.goal_progress
                );
            }
            OutputFormat::Json => {
                self.json(&serde_json::json!({
                    "state": snapshot.timer,
                    "elapsed": snapshot.elapsed,
                    "note": snapshot.note,
                    "todayTotal": snapshot.today_total,
                    "goalProgress": snapshot.goal_progress,
                    "goalReached": snapshot.goal_reached,
                }));
            }
            OutputFormat::Quiet => {
                println!("{}", snapshot.elapsed);
            }
        }
    }

    /// Print the stats overview with the per-day report
    pub fn print_stats(&self, snapshot: &Snapshot, report: &[DayReport]) {
        let stats = &snapshot.stats;
        match self.format {
            OutputFormat::Human => {
                println!("Reading Stats");
                println!("=============");
                println!();
                println!(
                    "Total time:      {}",
                    format_duration(stats.total_time, DurationStyle::Compact)
                );
                println!("Sessions:        {}", stats.sessions.len());
                println!(
                    "Average session: {}",
                    format_duration(snapshot.average_session(), DurationStyle::Compact)
                );
                println!("Current streak:  {}", days_label(stats.current_streak));
                println!("Longest streak:  {}", days_label(stats.longest_streak));
                println!();
                println!(
                    "Today:           {} of {} min ({:.0}%)",
                    format_duration(snapshot.today_total, DurationStyle::Compact),
                    snapshot.settings.daily_goal,
                    snapshot.goal_progress
                );
                println!();
                println!("Last {}:", days_label(report.len() as u32));
                let scale = chart_scale(report, snapshot.settings.daily_goal);
                for day in report {
                    println!(
                        "  {} {}  {:<width$} {:>4} min{}",
                        day.label,
                        day.date.format("%m-%d"),
                        bar(day.minutes, scale),
                        day.minutes,
                        if day.goal_met { " ✓" } else { "" },
                        width = BAR_WIDTH as usize
                    );
                }
            }
            OutputFormat::Json => {
                self.json(&serde_json::json!({
                    "totalTime": stats.total_time,
                    "sessionCount": stats.sessions.len(),
                    "averageSession": snapshot.average_session(),
                    "currentStreak": stats.current_streak,
                    "longestStreak": stats.longest_streak,
                    "todayTotal": snapshot.today_total,
                    "dailyGoal": snapshot.settings.daily_goal,
                    "goalProgress": snapshot.goal_progress,
                    "days": report,
                }));
            }
            OutputFormat::Quiet => {
                println!("{}", stats.current_streak);
            }
        }
    }

    /// Print a list of sessions
    pub fn print_sessions(&self, sessions: &[&ReadingSession]) {
        match self.format {
            OutputFormat::Human => {
                if sessions.is_empty() {
                    println!("No sessions today. Start reading!");
                    return;
                }
                let mut total = 0;
                for session in sessions {
                    total += session.duration;
                    let time = session
                        .date
                        .with_timezone(&chrono::Local)
                        .format("%H:%M");
                    match &session.note {
                        Some(note) => println!(
                            "{}  {:>8}  {}",
                            time,
                            format_duration(session.duration, DurationStyle::Compact),
                            truncate(note, 50)
                        ),
                        None => println!(
                            "{}  {:>8}",
                            time,
                            format_duration(session.duration, DurationStyle::Compact)
                        ),
                    }
                }
                println!(
                    "\n{} session(s), {}",
                    sessions.len(),
                    format_duration(total, DurationStyle::Compact)
                );
            }
            OutputFormat::Json => self.json(sessions),
            OutputFormat::Quiet => {
                for session in sessions {
                    println!("{}", session.id);
                }
            }
        }
    }

    pub fn print_quote(&self, quote: &Quote) {
        match self.format {
            OutputFormat::Human => {
                println!("\"{}\"", quote.text);
                println!("  - {}", quote.author);
            }
            OutputFormat::Json => self.json(quote),
            OutputFormat::Quiet => println!("{}", quote.text),
        }
    }

    pub fn print_settings(&self, settings: &AppSettings) {
        match self.format {
            OutputFormat::Human => {
                println!("Settings:");
                println!("  daily_goal:            {} min", settings.daily_goal);
                println!("  streak_threshold:      {} min", settings.streak_threshold);
                println!(
                    "  notifications_enabled: {}",
                    settings.notifications_enabled
                );
                println!("  notification_time:     {}", settings.notification_time);
            }
            OutputFormat::Json => self.json(settings),
            OutputFormat::Quiet => println!("{}", settings.daily_goal),
        }
    }

    pub fn print_reminder(&self, reminder: &Reminder) {
        match self.format {
            OutputFormat::Human => match reminder {
                Reminder::Disabled => println!("Reminders are off."),
                Reminder::Scheduled { at } => {
                    println!("Reminder scheduled for {}.", at.format("%H:%M"))
                }
                Reminder::GoalMet => println!("Daily goal reached. No reminder today."),
                Reminder::Due { .. } => {
                    if let Some(message) = reminder.message() {
                        println!("{}", message);
                    }
                }
            },
            OutputFormat::Json => self.json(reminder),
            // Prints only when due, so `lumen remind -q` can feed a notifier
            OutputFormat::Quiet => {
                if let Some(message) = reminder.message() {
                    println!("{}", message);
                }
            }
        }
    }

    /// Confirmation of a change; silent when quiet
    pub fn success(&self, text: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", text),
            OutputFormat::Json => self.json(&serde_json::json!({ "ok": true, "message": text })),
            OutputFormat::Quiet => {}
        }
    }

    /// Only people get asked before destructive commands
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// A note that is not a result, e.g. "replaced the running session"
    pub fn message(&self, text: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", text),
            OutputFormat::Json => self.json(&serde_json::json!({ "message": text })),
            OutputFormat::Quiet => {}
        }
    }
}

/// Horizontal bar for `minutes` on a chart topping out at `scale`
fn bar(minutes: u64, scale: u64) -> String {
    if scale == 0 {
        return String::new();
    }
    let filled = (minutes * BAR_WIDTH).div_ceil(scale).min(BAR_WIDTH);
    "█".repeat(filled as usize)
}

/// Cut `text` to `width` characters, ending in "..." when shortened
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let head: String = text.chars().take(width.saturating_sub(3)).collect();
    head + "..."
}
