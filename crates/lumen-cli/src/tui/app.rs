//! Application state and logic

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use lumen_core::format::{format_duration, DurationStyle};
use lumen_core::models::{DAILY_GOAL_RANGE, STREAK_THRESHOLD_RANGE};
use lumen_core::{random_quote, AppSettings, EngineEvent, Quote, Reminder, Snapshot, TimerState};

/// How long the splash screen stays up
const SPLASH_DURATION: Duration = Duration::from_millis(2500);

/// Quotes rotate on their own at this interval
const QUOTE_ROTATION: Duration = Duration::from_secs(10);

/// Status messages dismiss themselves after this long
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Top-level views, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Timer,
    Stats,
    Quotes,
    Settings,
}

impl View {
    pub const ALL: [View; 4] = [View::Timer, View::Stats, View::Quotes, View::Settings];

    pub fn title(self) -> &'static str {
        match self {
            View::Timer => "Timer",
            View::Stats => "Stats",
            View::Quotes => "Quotes",
            View::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Timer => 0,
            View::Stats => 1,
            View::Quotes => 2,
            View::Settings => 3,
        }
    }

    /// Move to the next view (wrapping)
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Move to the previous view (wrapping)
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Editing the session note
    Note,
    /// Typing a value for the selected setting
    Setting,
}

/// Editable rows of the settings view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    DailyGoal,
    StreakThreshold,
    Notifications,
    ReminderTime,
}

impl SettingField {
    pub const ALL: [SettingField; 4] = [
        SettingField::DailyGoal,
        SettingField::StreakThreshold,
        SettingField::Notifications,
        SettingField::ReminderTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingField::DailyGoal => "Daily goal",
            SettingField::StreakThreshold => "Streak threshold",
            SettingField::Notifications => "Daily reminders",
            SettingField::ReminderTime => "Reminder time",
        }
    }

    /// Current value of this field in `settings`, as shown and edited
    pub fn value(self, settings: &AppSettings) -> String {
        match self {
            SettingField::DailyGoal => format!("{} min", settings.daily_goal),
            SettingField::StreakThreshold => format!("{} min", settings.streak_threshold),
            SettingField::Notifications => {
                if settings.notifications_enabled {
                    "on".to_string()
                } else {
                    "off".to_string()
                }
            }
            SettingField::ReminderTime => settings.notification_time.clone(),
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current view
    pub view: View,
    /// Current input mode
    pub input_mode: InputMode,
    /// Text input buffer
    pub input: String,
    /// Cursor position in the input, in characters
    pub input_cursor: usize,
    /// Latest engine state
    pub snapshot: Snapshot,
    /// Note to use for the next session started from idle
    pub note_draft: String,
    /// Quote on display
    pub quote: &'static Quote,
    quote_shown_at: Instant,
    /// Splash screen deadline, `None` once dismissed
    pub splash_until: Option<Instant>,
    /// Settings being edited, saved explicitly
    pub settings_draft: AppSettings,
    /// Draft differs from the saved settings
    pub settings_dirty: bool,
    /// Selected row in the settings view
    pub setting_index: usize,
    /// Reset confirmation dialog is open
    pub confirm_reset: bool,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Day the reading reminder was last shown
    reminder_shown_on: Option<NaiveDate>,
}

impl App {
    pub fn new(snapshot: Snapshot, splash: bool) -> Self {
        let now = Instant::now();
        Self {
            should_quit: false,
            view: View::Timer,
            input_mode: InputMode::Normal,
            input: String::new(),
            input_cursor: 0,
            settings_draft: snapshot.settings.clone(),
            snapshot,
            note_draft: String::new(),
            quote: random_quote(),
            quote_shown_at: now,
            splash_until: splash.then(|| now + SPLASH_DURATION),
            settings_dirty: false,
            setting_index: 0,
            confirm_reset: false,
            status_message: None,
            status_message_time: None,
            show_help: false,
            reminder_shown_on: None,
        }
    }

    /// Take a new engine snapshot
    ///
    /// Unsaved settings edits are kept.
    pub fn refresh(&mut self, snapshot: Snapshot) {
        if !self.settings_dirty {
            self.settings_draft = snapshot.settings.clone();
        }
        self.snapshot = snapshot;
    }

    /// React to an engine notification
    pub fn on_engine_event(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::SessionSaved {
                session,
                goal_newly_met,
            } => {
                if *goal_newly_met {
                    self.set_status(format!(
                        "Session saved ({}). Daily goal reached!",
                        format_duration(session.duration, DurationStyle::Compact)
                    ));
                } else {
                    self.set_status(format!(
                        "Session saved ({})",
                        format_duration(session.duration, DurationStyle::Compact)
                    ));
                }
                self.note_draft.clear();
            }
            EngineEvent::SessionTooShort { .. } => {
                self.set_status("Session too short. Read for at least a minute to record it.");
            }
            EngineEvent::SessionDiscarded => self.set_status("Session discarded"),
            EngineEvent::SessionResumed { elapsed } if *elapsed > 0 => {
                self.set_status(format!(
                    "Resumed at {}",
                    format_duration(*elapsed, DurationStyle::Clock)
                ));
            }
            EngineEvent::StatsReset => self.set_status("Progress reset"),
            EngineEvent::SettingsSaved => {
                self.settings_dirty = false;
                self.set_status("Settings saved");
            }
            _ => {}
        }
    }

    // ==================== Splash ====================

    pub fn showing_splash(&self) -> bool {
        self.splash_until.is_some()
    }

    pub fn dismiss_splash(&mut self) {
        self.splash_until = None;
    }

    /// Drop the splash screen once its time is up
    pub fn check_splash(&mut self, now: Instant) {
        if self.splash_until.is_some_and(|until| now >= until) {
            self.splash_until = None;
        }
    }

    // ==================== Views ====================

    pub fn next_view(&mut self) {
        self.select_view(self.view.next());
    }

    pub fn prev_view(&mut self) {
        self.select_view(self.view.prev());
    }

    pub fn select_view(&mut self, view: View) {
        if view == View::Quotes && self.view != View::Quotes {
            self.new_quote();
        }
        self.view = view;
    }

    /// Show another random quote
    pub fn new_quote(&mut self) {
        self.quote = random_quote();
        self.quote_shown_at = Instant::now();
    }

    /// Rotate the quote when it has been up long enough
    pub fn maybe_rotate_quote(&mut self, now: Instant) {
        if self.view == View::Quotes && now.duration_since(self.quote_shown_at) >= QUOTE_ROTATION {
            self.new_quote();
        }
    }

    // ==================== Status ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Show the reading reminder, at most once per day
    pub fn check_reminder(&mut self, reminder: &Reminder, today: NaiveDate) {
        if self.reminder_shown_on == Some(today) {
            return;
        }
        if let Some(message) = reminder.message() {
            self.reminder_shown_on = Some(today);
            self.set_status(message);
        }
    }

    // ==================== Timer ====================

    /// Note of the session in progress, or the draft for the next one
    pub fn current_note(&self) -> &str {
        if self.snapshot.timer == TimerState::Idle {
            &self.note_draft
        } else {
            &self.snapshot.note
        }
    }

    pub fn begin_note_edit(&mut self) {
        let note = self.current_note().to_string();
        self.enter_input_mode(InputMode::Note, note);
    }

    /// Note to start the next session with
    pub fn take_note_draft(&mut self) -> Option<String> {
        let note = std::mem::take(&mut self.note_draft);
        if note.trim().is_empty() {
            None
        } else {
            Some(note)
        }
    }

    // ==================== Settings ====================

    pub fn current_setting(&self) -> SettingField {
        SettingField::ALL[self.setting_index.min(SettingField::ALL.len() - 1)]
    }

    pub fn move_setting_up(&mut self) {
        self.setting_index = self.setting_index.saturating_sub(1);
    }

    pub fn move_setting_down(&mut self) {
        if self.setting_index + 1 < SettingField::ALL.len() {
            self.setting_index += 1;
        }
    }

    /// Nudge a numeric setting by `delta` minutes, staying in range
    pub fn adjust_setting(&mut self, delta: i64) {
        let (value, range) = match self.current_setting() {
            SettingField::DailyGoal => (&mut self.settings_draft.daily_goal, DAILY_GOAL_RANGE),
            SettingField::StreakThreshold => (
                &mut self.settings_draft.streak_threshold,
                STREAK_THRESHOLD_RANGE,
            ),
            SettingField::Notifications => {
                self.toggle_notifications();
                return;
            }
            SettingField::ReminderTime => return,
        };

        let adjusted = (i64::from(*value) + delta)
            .clamp(i64::from(*range.start()), i64::from(*range.end()));
        let adjusted = u32::try_from(adjusted).unwrap_or(*range.start());
        if adjusted != *value {
            *value = adjusted;
            self.settings_dirty = true;
        }
    }

    pub fn toggle_notifications(&mut self) {
        self.settings_draft.notifications_enabled = !self.settings_draft.notifications_enabled;
        self.settings_dirty = true;
    }

    /// Start typing a value for the selected setting
    pub fn begin_setting_edit(&mut self) {
        let current = match self.current_setting() {
            SettingField::DailyGoal => self.settings_draft.daily_goal.to_string(),
            SettingField::StreakThreshold => self.settings_draft.streak_threshold.to_string(),
            SettingField::ReminderTime => self.settings_draft.notification_time.clone(),
            SettingField::Notifications => {
                self.toggle_notifications();
                return;
            }
        };
        self.enter_input_mode(InputMode::Setting, current);
    }

    /// Apply the typed value to the draft
    ///
    /// Range and format checks happen when the draft is saved.
    pub fn commit_setting_input(&mut self) -> Result<(), String> {
        let input = self.input.trim().to_string();
        let field = self.current_setting();
        self.exit_input_mode();

        match field {
            SettingField::DailyGoal => {
                self.settings_draft.daily_goal = parse_minutes(&input)?;
            }
            SettingField::StreakThreshold => {
                self.settings_draft.streak_threshold = parse_minutes(&input)?;
            }
            SettingField::ReminderTime => {
                self.settings_draft.notification_time = input;
            }
            SettingField::Notifications => return Ok(()),
        }
        self.settings_dirty = true;
        Ok(())
    }

    /// Throw away unsaved settings edits
    pub fn revert_settings(&mut self) {
        self.settings_draft = self.snapshot.settings.clone();
        self.settings_dirty = false;
    }

    // ==================== Text Input ====================

    fn enter_input_mode(&mut self, mode: InputMode, initial: String) {
        self.input_mode = mode;
        self.input_cursor = initial.chars().count();
        self.input = initial;
    }

    /// Leave the input mode, returning what was typed
    pub fn exit_input_mode(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        self.input_cursor = 0;
        std::mem::take(&mut self.input)
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.input_cursor);
        self.input.insert(at, c);
        self.input_cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let at = self.byte_offset(self.input_cursor);
            self.input.remove(at);
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.input_cursor < self.input.chars().count() {
            self.input_cursor += 1;
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

fn parse_minutes(input: &str) -> Result<u32, String> {
    input
        .trim_end_matches("min")
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of minutes", input))
}
