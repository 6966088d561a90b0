//! Lumen TUI
//!
//! Terminal user interface for the reading timer.
//!
//! ## Views
//!
//! - Timer: elapsed clock, session note, today's progress toward the goal
//! - Stats: totals, streaks, the last seven days and today's sessions
//! - Quotes: a literary quote, rotating every ten seconds
//! - Settings: daily goal, streak threshold, reminders, reset
//!
//! ## Navigation
//!
//! - Tab/Shift+Tab, h/l or ←/→: Switch view
//! - 1-4: Jump to a view
//! - ?: Help
//! - q: Quit
//!
//! Quitting with a session running leaves it running: the next start of the
//! TUI (or `lumen stop`) picks it up from storage.

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lumen_core::{Clock, Config, Engine, EngineEvent, KeyValueStore, TimerState};

use app::{App, InputMode, View};

/// Longest wait between checks for terminal input
const INPUT_POLL: Duration = Duration::from_millis(50);

/// How often the daily reminder is evaluated
const REMINDER_CHECK: Duration = Duration::from_secs(60);

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if LUMEN_LOG is set)
    init_tui_logging(&config);

    let mut engine = Engine::open_with_config(&config);
    let events = engine.subscribe();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(engine.snapshot(), config.splash);

    let result = run_app(&mut terminal, &mut app, &mut engine, events).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend, S: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    engine: &mut Engine<S, C>,
    mut events: UnboundedReceiver<EngineEvent>,
) -> Result<()> {
    let mut reminder_checked: Option<Instant> = None;

    loop {
        let now = Instant::now();
        app.check_status_timeout();
        app.check_splash(now);
        app.maybe_rotate_quote(now);
        if !app.showing_splash()
            && reminder_checked.map_or(true, |at| now.duration_since(at) >= REMINDER_CHECK)
        {
            app.check_reminder(&engine.reminder(), engine.today());
            reminder_checked = Some(now);
        }

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Wake up for the next tick or the next input check, whichever is first
        let wait = engine
            .until_next_tick()
            .map_or(INPUT_POLL, |until| until.min(INPUT_POLL));

        tokio::select! {
            biased;

            Some(engine_event) = events.recv() => {
                app.on_engine_event(&engine_event);
                app.refresh(engine.snapshot());
            }

            _ = tokio::time::sleep(wait) => {
                if engine.poll_ticks() > 0 {
                    // Ticked event refreshes the snapshot next iteration
                    continue;
                }

                // Check for terminal events (non-blocking)
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        handle_key(app, engine, key.code, key.modifiers);
                        app.refresh(engine.snapshot());
                    }
                }
            }
        }

        if app.should_quit {
            if engine.timer().state() != TimerState::Idle {
                info!("Leaving TUI with a session in progress");
            }
            break;
        }
    }

    Ok(())
}

/// Route a key press to the handler for the current mode
fn handle_key<S: KeyValueStore, C: Clock>(
    app: &mut App,
    engine: &mut Engine<S, C>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key skips the splash screen
    if app.showing_splash() {
        app.dismiss_splash();
        return;
    }

    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.confirm_reset {
        app.confirm_reset = false;
        if code == KeyCode::Char('y') {
            engine.reset();
        } else {
            app.set_status("Reset cancelled");
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, engine, code),
        InputMode::Note | InputMode::Setting => handle_input_mode(app, engine, code),
    }
}

/// Handle key events in normal mode
fn handle_normal_mode<S: KeyValueStore, C: Clock>(
    app: &mut App,
    engine: &mut Engine<S, C>,
    code: KeyCode,
) {
    // Global keys
    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            return;
        }
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
            app.next_view();
            return;
        }
        KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
            app.prev_view();
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.select_view(View::ALL[index]);
            return;
        }
        _ => {}
    }

    match app.view {
        View::Timer => handle_timer_key(app, engine, code),
        View::Stats => {
            if code == KeyCode::Char('r') {
                engine.reload();
                app.set_status("Reloaded");
            }
        }
        View::Quotes => {
            if matches!(code, KeyCode::Char('n') | KeyCode::Enter | KeyCode::Char(' ')) {
                app.new_quote();
            }
        }
        View::Settings => handle_settings_key(app, engine, code),
    }
}

fn handle_timer_key<S: KeyValueStore, C: Clock>(
    app: &mut App,
    engine: &mut Engine<S, C>,
    code: KeyCode,
) {
    let state = engine.timer().state();
    match code {
        KeyCode::Char(' ') | KeyCode::Enter => match state {
            TimerState::Idle => {
                let note = app.take_note_draft();
                engine.start(note);
            }
            TimerState::Running => {
                engine.pause();
            }
            TimerState::Paused => {
                engine.resume();
            }
        },
        KeyCode::Char('s') if state != TimerState::Idle => {
            engine.stop();
        }
        KeyCode::Char('x') if state != TimerState::Idle => {
            engine.discard();
        }
        KeyCode::Char('n') => app.begin_note_edit(),
        _ => {}
    }
}

fn handle_settings_key<S: KeyValueStore, C: Clock>(
    app: &mut App,
    engine: &mut Engine<S, C>,
    code: KeyCode,
) {
    match code {
        KeyCode::Char('k') | KeyCode::Up => app.move_setting_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_setting_down(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_setting(1),
        KeyCode::Char('-') => app.adjust_setting(-1),
        KeyCode::Char(' ') => app.toggle_notifications(),
        KeyCode::Enter => app.begin_setting_edit(),
        KeyCode::Char('u') => app.revert_settings(),
        KeyCode::Char('w') => {
            if let Err(e) = engine.save_settings(app.settings_draft.clone()) {
                app.set_status(e.to_string());
            }
        }
        KeyCode::Char('R') => app.confirm_reset = true,
        _ => {}
    }
}

/// Handle key events while typing a note or a setting value
fn handle_input_mode<S: KeyValueStore, C: Clock>(
    app: &mut App,
    engine: &mut Engine<S, C>,
    code: KeyCode,
) {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
        }
        KeyCode::Enter => match app.input_mode {
            InputMode::Note => {
                let note = app.exit_input_mode();
                if engine.timer().state() == TimerState::Idle {
                    app.note_draft = note;
                } else {
                    engine.set_note(note);
                }
            }
            InputMode::Setting => {
                if let Err(e) = app.commit_setting_input() {
                    app.set_status(e);
                }
            }
            InputMode::Normal => {}
        },
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if LUMEN_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("LUMEN_LOG") else {
        return;
    };

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("lumen_core={},lumen_cli={}", log_level, log_level));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
