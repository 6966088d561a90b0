//! Reading session command handlers
//!
//! Each invocation is its own process: the engine picks the running session
//! up from storage, so `lumen stop` measures from the `lumen start` that
//! preceded it.

use anyhow::{bail, Result};

use lumen_core::format::{days_label, minutes_label};
use lumen_core::{
    format_duration, Clock, DurationStyle, Engine, KeyValueStore, StopOutcome, TimerState,
    MIN_SESSION_SECS,
};

use crate::output::{Output, OutputFormat};

/// Start a new session
pub fn start<S: KeyValueStore, C: Clock>(
    engine: &mut Engine<S, C>,
    note: Option<String>,
    output: &Output,
) -> Result<()> {
    if engine.timer().state() != TimerState::Idle {
        output.message(&format!(
            "Replacing the session in progress ({} so far).",
            format_duration(engine.timer().elapsed(), DurationStyle::Compact)
        ));
    }

    let record = engine.start(note);

    match output.format {
        OutputFormat::Json => output.json(&record),
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            output.success("Reading session started");
            println!("Run `lumen stop` when you put the book down.");
        }
    }
    Ok(())
}

/// Show the session in progress and today's progress
pub fn status<S: KeyValueStore, C: Clock>(engine: &Engine<S, C>, output: &Output) -> Result<()> {
    output.print_status(&engine.snapshot());
    Ok(())
}

/// Stop the session in progress and record it
pub fn stop<S: KeyValueStore, C: Clock>(
    engine: &mut Engine<S, C>,
    note: Option<String>,
    output: &Output,
) -> Result<()> {
    if engine.timer().state() == TimerState::Idle {
        bail!("No reading session in progress. Start one with `lumen start`.");
    }

    if let Some(note) = note {
        engine.set_note(note);
    }

    match engine.stop() {
        StopOutcome::TooShort { elapsed } => match output.format {
            OutputFormat::Json => output.json(&serde_json::json!({
                "status": "too_short",
                "elapsed": elapsed,
            })),
            _ => output.message(&format!(
                "Session too short ({}). Read for at least {} to record it.",
                format_duration(elapsed, DurationStyle::Compact),
                minutes_label(MIN_SESSION_SECS / 60)
            )),
        },
        StopOutcome::Saved {
            session,
            today_total,
            goal_newly_met,
        } => {
            let streak = engine.stats().current_streak;
            match output.format {
                OutputFormat::Json => output.json(&serde_json::json!({
                    "status": "saved",
                    "session": session,
                    "todayTotal": today_total,
                    "goalNewlyMet": goal_newly_met,
                    "currentStreak": streak,
                })),
                OutputFormat::Quiet => println!("{}", session.id),
                OutputFormat::Human => {
                    output.success(&format!(
                        "Recorded {} of reading",
                        format_duration(session.duration, DurationStyle::Compact)
                    ));
                    if goal_newly_met {
                        println!("Daily goal reached!");
                    }
                    println!(
                        "Today: {}   Streak: {}",
                        format_duration(today_total, DurationStyle::Compact),
                        days_label(streak)
                    );
                }
            }
        }
    }
    Ok(())
}

/// Drop the session in progress without recording it
pub fn discard<S: KeyValueStore, C: Clock>(engine: &mut Engine<S, C>, output: &Output) -> Result<()> {
    if engine.discard() {
        output.success("Session discarded");
    } else {
        output.message("No reading session in progress.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, TimeZone, Utc};
    use lumen_core::{ManualClock, MemoryStore};

    fn setup() -> (Engine<MemoryStore, ManualClock>, ManualClock, Output) {
        let start = Local
            .with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let clock = ManualClock::new(start);
        let engine = Engine::with_clock(MemoryStore::new(), clock.clone());
        (engine, clock, Output::new(OutputFormat::Quiet))
    }

    #[test]
    fn test_start_then_stop_records_session() {
        let (mut engine, clock, output) = setup();
        start(&mut engine, Some("Ulysses".to_string()), &output).unwrap();
        assert_eq!(engine.timer().state(), TimerState::Running);

        clock.advance(Duration::minutes(20));
        engine.poll_ticks();
        stop(&mut engine, None, &output).unwrap();

        let stats = engine.stats();
        assert_eq!(stats.sessions.len(), 1);
        assert_eq!(stats.sessions[0].duration, 1200);
        assert_eq!(stats.sessions[0].note.as_deref(), Some("Ulysses"));
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_stop_note_overrides() {
        let (mut engine, clock, output) = setup();
        start(&mut engine, Some("draft".to_string()), &output).unwrap();
        clock.advance(Duration::minutes(2));
        engine.poll_ticks();

        stop(&mut engine, Some("Chapter 4".to_string()), &output).unwrap();
        assert_eq!(
            engine.stats().sessions[0].note.as_deref(),
            Some("Chapter 4")
        );
    }

    #[test]
    fn test_stop_without_session_fails() {
        let (mut engine, _clock, output) = setup();
        assert!(stop(&mut engine, None, &output).is_err());
    }

    #[test]
    fn test_short_stop_is_not_an_error() {
        let (mut engine, clock, output) = setup();
        start(&mut engine, None, &output).unwrap();
        clock.advance(Duration::seconds(30));
        engine.poll_ticks();

        stop(&mut engine, None, &output).unwrap();
        assert!(engine.stats().sessions.is_empty());
        assert_eq!(engine.timer().state(), TimerState::Idle);
    }

    #[test]
    fn test_discard() {
        let (mut engine, clock, output) = setup();
        discard(&mut engine, &output).unwrap();

        start(&mut engine, None, &output).unwrap();
        clock.advance(Duration::minutes(5));
        discard(&mut engine, &output).unwrap();
        assert_eq!(engine.timer().state(), TimerState::Idle);
        assert!(engine.stats().sessions.is_empty());
    }
}
