//! Reminder command handler
//!
//! Meant to be run from a scheduler; with `--quiet` it prints only when a
//! reminder is due.

use anyhow::Result;

use lumen_core::{Clock, Engine, KeyValueStore};

use crate::output::Output;

/// Print the reminder state for right now
pub fn check<S: KeyValueStore, C: Clock>(engine: &Engine<S, C>, output: &Output) -> Result<()> {
    output.print_reminder(&engine.reminder());
    Ok(())
}
