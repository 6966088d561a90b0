//! Lumen CLI
//!
//! Command-line interface for Lumen - reading timer, daily goals and streaks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lumen_core::{Config, Engine};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Lumen - Track your reading habit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Start a reading session
    Start {
        /// What you are reading
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Show the session in progress
    Status,
    /// Stop the session in progress and record it
    Stop {
        /// Replace the session note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Drop the session in progress without recording it
    Discard,
    /// Show totals, streaks and recent days
    Stats {
        /// Number of days to report
        #[arg(short, long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
        days: u32,
    },
    /// List today's sessions
    Today,
    /// Print a random literary quote
    Quote,
    /// Show or change reading settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Erase all reading progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether today's reading reminder is due
    Remind,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Change a setting
    Set {
        /// Setting key (daily_goal, streak_threshold, notifications_enabled, notification_time)
        key: String,
        /// New value
        value: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, splash)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Commands that don't need the engine
    match &cli.command {
        Some(Commands::Config { command }) => {
            return handle_config_command(command.clone(), config_path, &output);
        }
        Some(Commands::Quote) => {
            return commands::quote::show(&output);
        }
        _ => {}
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // Handle TUI (default when no command given)
    let Some(command) = cli.command else {
        return tui::run(config).await;
    };
    if matches!(command, Commands::Tui) {
        return tui::run(config).await;
    }

    init_cli_logging();
    let mut engine = Engine::open_with_config(&config);

    match command {
        Commands::Start { note } => commands::session::start(&mut engine, note, &output),
        Commands::Status => commands::session::status(&engine, &output),
        Commands::Stop { note } => commands::session::stop(&mut engine, note, &output),
        Commands::Discard => commands::session::discard(&mut engine, &output),
        Commands::Stats { days } => commands::stats::show(&engine, days, &output),
        Commands::Today => commands::stats::today(&engine, &output),
        Commands::Reset { yes } => commands::stats::reset(&mut engine, yes, &output),
        Commands::Settings { command } => handle_settings_command(command, &mut engine, &output),
        Commands::Remind => commands::remind::check(&engine, &output),
        Commands::Tui | Commands::Quote | Commands::Config { .. } => Ok(()), // Handled above
    }
}

fn handle_settings_command(
    command: Option<SettingsCommands>,
    engine: &mut Engine,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(engine, output),
        Some(SettingsCommands::Set { key, value }) => {
            commands::settings::set(engine, key, value, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging for plain commands
///
/// Logs to stderr at the LUMEN_LOG level, warnings only by default.
fn init_cli_logging() {
    let log_level = std::env::var("LUMEN_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!("lumen_core={},lumen_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
