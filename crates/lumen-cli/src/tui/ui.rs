//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, List, ListItem, ListState,
        Paragraph, Tabs, Wrap,
    },
    Frame,
};

use lumen_core::format::{days_label, format_duration, DurationStyle};
use lumen_core::stats::chart_scale;
use lumen_core::TimerState;

use super::app::{App, InputMode, SettingField, View};

/// Days shown in the stats chart
const CHART_DAYS: u32 = 7;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    if app.showing_splash() {
        draw_splash(frame);
        return;
    }

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tabs(frame, app, outer_chunks[0]);

    match app.view {
        View::Timer => draw_timer_view(frame, app, outer_chunks[1]),
        View::Stats => draw_stats_view(frame, app, outer_chunks[1]),
        View::Quotes => draw_quotes_view(frame, app, outer_chunks[1]),
        View::Settings => draw_settings_view(frame, app, outer_chunks[1]),
    }

    match app.input_mode {
        InputMode::Normal => draw_status_bar(frame, app, outer_chunks[2]),
        InputMode::Note => draw_input(frame, app, "note: ", outer_chunks[2]),
        InputMode::Setting => {
            let prefix = format!("{}: ", app.current_setting().label().to_lowercase());
            draw_input(frame, app, &prefix, outer_chunks[2]);
        }
    }

    if app.confirm_reset {
        draw_reset_dialog(frame, app);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_splash(frame: &mut Frame) {
    let area = frame.area();
    let top = area.height.saturating_sub(5) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        "L U M E N",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Illuminate your reading journey",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().title(" Lumen ").borders(Borders::ALL))
        .select(app.view.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Elapsed clock, note and today's progress toward the goal
fn draw_timer_view(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(3)])
        .split(area);

    let (state_label, state_style) = match snapshot.timer {
        TimerState::Idle => ("Ready to read", Style::default().add_modifier(Modifier::DIM)),
        TimerState::Running => ("Reading", Style::default().fg(Color::Green)),
        TimerState::Paused => ("Paused", Style::default().fg(Color::Yellow)),
    };

    let note = app.current_note();
    let hint = match snapshot.timer {
        TimerState::Idle => "space: start   n: note",
        TimerState::Running => "space: pause   s: stop   x: discard   n: note",
        TimerState::Paused => "space: resume   s: stop   x: discard   n: note",
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format_duration(snapshot.elapsed, DurationStyle::Clock),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(state_label, state_style)),
        Line::from(""),
        Line::from(if note.trim().is_empty() {
            Span::styled("(no note)", Style::default().add_modifier(Modifier::DIM))
        } else {
            Span::raw(note.to_string())
        }),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().add_modifier(Modifier::DIM))),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Session ").borders(Borders::ALL));
    frame.render_widget(paragraph, chunks[0]);

    let label = format!(
        "Today {} / {} min",
        format_duration(snapshot.today_total, DurationStyle::Compact),
        snapshot.settings.daily_goal
    );
    let gauge_color = if snapshot.goal_reached {
        Color::Green
    } else {
        Color::Yellow
    };
    let gauge = Gauge::default()
        .block(Block::default().title(" Daily goal ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(gauge_color))
        .ratio((snapshot.goal_progress / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, chunks[1]);
}

/// Totals, streaks, the weekly chart and today's sessions
fn draw_stats_view(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let stats = &snapshot.stats;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(columns[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let summary = vec![
        Line::from(vec![
            Span::styled("Total time:     ", bold),
            Span::raw(format_duration(stats.total_time, DurationStyle::Compact)),
        ]),
        Line::from(vec![
            Span::styled("Sessions:       ", bold),
            Span::raw(stats.sessions.len().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Average:        ", bold),
            Span::raw(format_duration(
                snapshot.average_session(),
                DurationStyle::Compact,
            )),
        ]),
        Line::from(vec![
            Span::styled("Current streak: ", bold),
            Span::raw(days_label(stats.current_streak)),
        ]),
        Line::from(vec![
            Span::styled("Longest streak: ", bold),
            Span::raw(days_label(stats.longest_streak)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Today:          ", bold),
            Span::raw(format!("{:.0}% of goal", snapshot.goal_progress)),
        ]),
    ];
    let paragraph =
        Paragraph::new(summary).block(Block::default().title(" Overview ").borders(Borders::ALL));
    frame.render_widget(paragraph, left[0]);

    let items: Vec<ListItem> = snapshot
        .todays_sessions()
        .into_iter()
        .map(|session| {
            let time = session.date.with_timezone(&chrono::Local).format("%H:%M");
            let mut spans = vec![
                Span::styled(format!("{} ", time), Style::default().add_modifier(Modifier::DIM)),
                Span::raw(format_duration(session.duration, DurationStyle::Compact)),
            ];
            if let Some(note) = &session.note {
                spans.push(Span::styled(
                    format!("  {}", note),
                    Style::default().add_modifier(Modifier::ITALIC),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let title = format!(" Today ({}) ", items.len());
    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Span::styled(
            "No sessions yet",
            Style::default().add_modifier(Modifier::DIM),
        ))])
    } else {
        List::new(items)
    };
    frame.render_widget(
        list.block(Block::default().title(title).borders(Borders::ALL)),
        left[1],
    );

    draw_week_chart(frame, app, columns[1]);
}

fn draw_week_chart(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;
    let report = snapshot.report(CHART_DAYS);
    let scale = chart_scale(&report, snapshot.settings.daily_goal);

    let bars: Vec<Bar> = report
        .iter()
        .map(|day| {
            let style = if day.goal_met {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Yellow)
            };
            Bar::default()
                .value(day.minutes)
                .label(Line::from(day.label.clone()))
                .text_value(day.minutes.to_string())
                .style(style)
        })
        .collect();

    let width = area.width.saturating_sub(2) / CHART_DAYS as u16;
    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(
                    " Last {} (goal {} min) ",
                    days_label(CHART_DAYS),
                    snapshot.settings.daily_goal
                ))
                .borders(Borders::ALL),
        )
        .bar_width(width.saturating_sub(1).max(1))
        .bar_gap(1)
        .max(scale.max(1))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_quotes_view(frame: &mut Frame, app: &App, area: Rect) {
    let top = area.height.saturating_sub(8) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        format!("\"{}\"", app.quote.text),
        Style::default().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("- {}", app.quote.author),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "n: new quote",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Literary Inspiration ")
                .borders(Borders::ALL),
        );
    frame.render_widget(paragraph, area);
}

fn draw_settings_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let items: Vec<ListItem> = SettingField::ALL
        .iter()
        .map(|field| {
            let disabled = *field == SettingField::ReminderTime
                && !app.settings_draft.notifications_enabled;
            let style = if disabled {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<18}", field.label()), style),
                Span::styled(field.value(&app.settings_draft), style),
            ]))
        })
        .collect();

    let title = if app.settings_dirty {
        " Settings (unsaved) "
    } else {
        " Settings "
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(Some(app.setting_index));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let help = vec![
        Line::from("j/k: select   Enter: edit   +/-: adjust   space: toggle reminders"),
        Line::from("w: save   u: undo changes   R: reset progress"),
        Line::from(""),
        Line::from(Span::styled(
            "The streak threshold is the minimum reading per day that keeps a streak going.",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    let paragraph = Paragraph::new(help)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, chunks[1]);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "tab: switch view  1-4: jump  ?: help  q: quit".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw text input at the bottom
fn draw_input(frame: &mut Frame, app: &App, prefix: &str, area: Rect) {
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Yellow)),
        Span::raw(app.input.as_str()),
    ]);

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);

    // Position cursor
    let cursor_x = area.x + prefix.chars().count() as u16 + app.input_cursor as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

fn draw_reset_dialog(frame: &mut Frame, app: &App) {
    let popup_area = centered(frame.area(), 52, 7);
    frame.render_widget(Clear, popup_area);

    let stats = &app.snapshot.stats;
    let text = vec![
        Line::from(format!(
            "Erase {} session(s) and a {} streak?",
            stats.sessions.len(),
            days_label(stats.current_streak)
        )),
        Line::from("This cannot be undone."),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": reset   any other key: cancel"),
        ]),
    ];

    let block = Block::default()
        .title(" Reset progress ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(Paragraph::new(text).block(block), popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered(frame.area(), 50, 22);

    // Clear the popup area
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  Tab, l/→    Next view"),
        Line::from("  S-Tab, h/←  Previous view"),
        Line::from("  1-4         Jump to view"),
        Line::from(""),
        Line::from("Timer:"),
        Line::from("  space       Start / pause / resume"),
        Line::from("  s           Stop and record"),
        Line::from("  x           Discard session"),
        Line::from("  n           Edit note"),
        Line::from(""),
        Line::from("Quotes:  n    New quote"),
        Line::from("Settings: w   Save    R  Reset progress"),
        Line::from(""),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit (a running session continues)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Centered popup area, shrunk to fit small terminals
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use lumen_core::{Engine, ManualClock, MemoryStore};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(90, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn app() -> App {
        let mut engine =
            Engine::with_clock(MemoryStore::new(), ManualClock::new(chrono::Utc::now()));
        engine.stop_with(1500, Some("Dubliners"));
        App::new(engine.snapshot(), false)
    }

    #[test]
    fn test_centered_fits() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered(area, 50, 22);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }

    #[test]
    fn test_every_view_renders() {
        let mut app = app();
        for view in View::ALL {
            app.view = view;
            let screen = render(&app);
            assert!(screen.contains(view.title()));
        }
    }

    #[test]
    fn test_stats_view_shows_session() {
        let mut app = app();
        app.view = View::Stats;
        let screen = render(&app);
        assert!(screen.contains("Dubliners"));
        assert!(screen.contains("25m 0s"));
    }

    #[test]
    fn test_splash_renders() {
        let engine = Engine::with_clock(MemoryStore::new(), ManualClock::new(chrono::Utc::now()));
        let app = App::new(engine.snapshot(), true);
        assert!(render(&app).contains("L U M E N"));
    }
}
