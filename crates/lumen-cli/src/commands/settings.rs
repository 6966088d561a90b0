//! Settings command handlers

use anyhow::{bail, Context, Result};

use lumen_core::{AppSettings, Clock, Engine, KeyValueStore};

use crate::output::Output;

/// Show the reading settings
pub fn show<S: KeyValueStore, C: Clock>(engine: &Engine<S, C>, output: &Output) -> Result<()> {
    output.print_settings(engine.settings());
    Ok(())
}

/// Change one setting and save
pub fn set<S: KeyValueStore, C: Clock>(
    engine: &mut Engine<S, C>,
    key: String,
    value: String,
    output: &Output,
) -> Result<()> {
    let settings = apply(engine.settings().clone(), &key, &value)?;
    engine.save_settings(settings)?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn apply(mut settings: AppSettings, key: &str, value: &str) -> Result<AppSettings> {
    match key {
        "daily_goal" => {
            settings.daily_goal = value
                .parse()
                .context("Invalid value for daily_goal. Use a number of minutes.")?;
        }
        "streak_threshold" => {
            settings.streak_threshold = value
                .parse()
                .context("Invalid value for streak_threshold. Use a number of minutes.")?;
        }
        "notifications_enabled" => {
            settings.notifications_enabled = value
                .parse()
                .context("Invalid value for notifications_enabled. Use 'true' or 'false'.")?;
        }
        "notification_time" => {
            settings.notification_time = value.to_string();
        }
        _ => {
            bail!(
                "Unknown setting: '{}'\n\
                 Valid keys: daily_goal, streak_threshold, notifications_enabled, notification_time",
                key
            );
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use chrono::Utc;
    use lumen_core::{ManualClock, MemoryStore};

    #[test]
    fn test_apply() {
        let settings = apply(AppSettings::default(), "daily_goal", "45").unwrap();
        assert_eq!(settings.daily_goal, 45);

        let settings = apply(settings, "notifications_enabled", "false").unwrap();
        assert!(!settings.notifications_enabled);
        assert_eq!(settings.daily_goal, 45);

        assert!(apply(AppSettings::default(), "daily_goal", "lots").is_err());
        assert!(apply(AppSettings::default(), "font_size", "12").is_err());
    }

    #[test]
    fn test_set_validates_before_saving() {
        let mut engine = Engine::with_clock(MemoryStore::new(), ManualClock::new(Utc::now()));
        let output = Output::new(OutputFormat::Quiet);

        assert!(set(&mut engine, "daily_goal".into(), "481".into(), &output).is_err());
        assert!(set(&mut engine, "notification_time".into(), "7pm".into(), &output).is_err());
        assert_eq!(engine.settings(), &AppSettings::default());

        set(&mut engine, "streak_threshold".into(), "120".into(), &output).unwrap();
        assert_eq!(engine.settings().streak_threshold, 120);
    }
}
