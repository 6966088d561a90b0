//! Stats command handlers

use anyhow::{bail, Result};

use lumen_core::{Clock, Engine, KeyValueStore};

use crate::output::Output;
use crate::prompt::confirm;

/// Show totals, streaks and the last `days` days
pub fn show<S: KeyValueStore, C: Clock>(
    engine: &Engine<S, C>,
    days: u32,
    output: &Output,
) -> Result<()> {
    let snapshot = engine.snapshot();
    let report = snapshot.report(days);
    output.print_stats(&snapshot, &report);
    Ok(())
}

/// List today's sessions
pub fn today<S: KeyValueStore, C: Clock>(engine: &Engine<S, C>, output: &Output) -> Result<()> {
    output.print_sessions(&engine.todays_sessions());
    Ok(())
}

/// Erase all reading progress
pub fn reset<S: KeyValueStore, C: Clock>(
    engine: &mut Engine<S, C>,
    yes: bool,
    output: &Output,
) -> Result<()> {
    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to reset without confirmation. Pass --yes.");
        }
        let stats = engine.stats();
        println!(
            "This erases {} session(s) and a {}-day streak.",
            stats.sessions.len(),
            stats.current_streak
        );
        if !confirm("Reset all reading progress?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    engine.reset();
    output.success("Reading progress reset");
    Ok(())
}
