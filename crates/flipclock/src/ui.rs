//! UI rendering

use flipclock::{CardSize, FlipCard, FlipPhase};
use flipclock_core::format;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use std::time::Instant;

use crate::app::{completion_message, App, Overlay, SettingsField, ViewMode};
use crate::glyph::{self, GLYPH_ROWS};

/// Card height: glyph rows, one blank row above and below, borders
const CARD_HEIGHT: u16 = GLYPH_ROWS as u16 + 4;
const SEPARATOR_WIDTH: u16 = 4;
const GAP: u16 = 2;
const PROGRESS_WIDTH: u16 = 64;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App, now: Instant) {
    let chrome = !app.fullscreen;
    let controls = chrome && app.controls_visible(now);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if chrome { 3 } else { 0 }),   // Mode bar
            Constraint::Min(0),                               // Cards
            Constraint::Length(2),                            // Mode title
            Constraint::Length(3),                            // Progress
            Constraint::Length(if controls { 3 } else { 0 }), // Controls
        ])
        .split(f.area());

    if chrome {
        draw_mode_bar(f, app, chunks[0]);
    }
    draw_cards(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);
    draw_progress(f, app, chunks[3]);
    if controls {
        draw_controls(f, app, chunks[4]);
    }

    match app.overlay {
        Overlay::None => {}
        Overlay::Settings(field) => draw_settings_overlay(f, app, field),
        Overlay::Complete(kind) => draw_complete_overlay(f, completion_message(kind)),
    }
}

fn draw_mode_bar(f: &mut Frame, app: &App, area: Rect) {
    let current = app.mode();
    let mut spans = Vec::new();
    for mode in ViewMode::ALL {
        let style = if mode == current {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::raw("  "));
    }
    spans.pop();

    let width = spans.iter().map(|s| s.width() as u16).sum::<u16>() + 4;
    let bar = Paragraph::new(Line::from(spans).centered()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(bar, centered_rect(area, width, 3));
}

fn card_width(size: CardSize) -> u16 {
    glyph::width("00", size) as u16 + 4
}

fn draw_cards(f: &mut Frame, app: &App, area: Rect) {
    let [hours, minutes, seconds] = &app.cards;
    let total = card_width(hours.size())
        + GAP
        + SEPARATOR_WIDTH
        + GAP
        + card_width(minutes.size())
        + GAP
        + card_width(seconds.size());

    if area.width < total || area.height < CARD_HEIGHT {
        draw_compact(f, app, area);
        return;
    }

    let row = centered_rect(area, total, CARD_HEIGHT);
    let mut x = row.x;
    let mut next = |width: u16| {
        let rect = Rect::new(x, row.y, width, row.height);
        x += width + GAP;
        rect
    };

    draw_card(f, hours, next(card_width(hours.size())));
    draw_separator(f, next(SEPARATOR_WIDTH));
    draw_card(f, minutes, next(card_width(minutes.size())));
    draw_card(f, seconds, next(card_width(seconds.size())));
}

/// Plain `HH:MM:SS` for terminals too small for the cards
fn draw_compact(f: &mut Frame, app: &App, area: Rect) {
    let [h, m, s] = &app.cards;
    let text = format!("{}:{}:{}", h.shown(), m.shown(), s.shown());
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).bold(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(paragraph, centered_rect(area, area.width, 1));
}

fn draw_card(f: &mut Frame, card: &FlipCard, area: Rect) {
    let phase = card.phase();
    let normal = Style::default().fg(Color::White).bold();
    let dim = Style::default().fg(Color::DarkGray);
    let border = match phase {
        FlipPhase::Idle => Color::Gray,
        FlipPhase::Folding | FlipPhase::Unfolding => Color::Cyan,
    };

    // The half that is mid-fold is drawn dim
    let half = GLYPH_ROWS / 2;
    let mut lines = vec![Line::from("")];
    for (i, row) in glyph::render(card.shown(), card.size()).into_iter().enumerate() {
        let style = match phase {
            FlipPhase::Folding if i < half => dim,
            FlipPhase::Unfolding if i > half => dim,
            FlipPhase::Folding | FlipPhase::Unfolding if i == half => {
                normal.add_modifier(Modifier::UNDERLINED)
            }
            _ => normal,
        };
        lines.push(Line::from(Span::styled(row, style)).centered());
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

fn draw_separator(f: &mut Frame, area: Rect) {
    let dot = Line::from(Span::styled(" ██ ", Style::default().fg(Color::Blue)));
    let lines = vec![
        Line::from(""),
        Line::from(""),
        dot.clone(),
        Line::from(""),
        dot,
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let mode = app.mode();
    let mut spans = vec![
        Span::styled("● ", Style::default().fg(Color::Blue)),
        Span::styled(mode.title(), Style::default().fg(Color::Gray).bold()),
    ];
    if mode != ViewMode::Clock {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            app.session_label(),
            Style::default().fg(Color::DarkGray),
        ));
        if app.timer.is_running() {
            spans.push(Span::styled("  ▶", Style::default().fg(Color::Green)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans).centered());
    f.render_widget(paragraph, area);
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let Some(progress) = app.progress() else {
        return;
    };

    let area = centered_rect(area, PROGRESS_WIDTH.min(area.width), area.height);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .ratio(progress.ratio)
        .label("");
    f.render_widget(gauge, rows[0]);

    let label_style = Style::default().fg(Color::DarkGray);
    f.render_widget(
        Paragraph::new(Span::styled(progress.elapsed, label_style)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(progress.remaining, label_style)).alignment(Alignment::Right),
        rows[1],
    );
}

fn draw_controls(f: &mut Frame, app: &App, area: Rect) {
    let timer_keys = if app.mode() == ViewMode::Clock {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan).bold()
    };
    let key = Style::default().fg(Color::Cyan).bold();
    let play = if app.timer.is_running() { " pause  " } else { " start  " };

    let help = Line::from(vec![
        Span::styled("Space", timer_keys),
        Span::raw(play),
        Span::styled("r", timer_keys),
        Span::raw(" reset  "),
        Span::styled("1/2/3", key),
        Span::raw(" mode  "),
        Span::styled("s", key),
        Span::raw(" settings  "),
        Span::styled("f", key),
        Span::raw(" fullscreen  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ]);

    let width = help.width() as u16 + 4;
    let controls = Paragraph::new(help.centered())
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(controls, centered_rect(area, width, 3));
}

fn draw_settings_overlay(f: &mut Frame, app: &App, selected: SettingsField) {
    let popup_area = centered_rect(f.area(), 46, 11);
    f.render_widget(Clear, popup_area);

    let durations = app.timer.durations();
    let on_off = |on: bool| String::from(if on { "[on] " } else { "[off]" });

    let mut lines = vec![Line::from("")];
    for field in SettingsField::ALL {
        let (name, value) = match field {
            SettingsField::TimeFormat => ("24-Hour Format", on_off(app.settings.use_24_hour)),
            SettingsField::WorkMinutes => (
                "Pomodoro Duration",
                format::duration(u64::from(durations.work_secs())),
            ),
            SettingsField::BreakMinutes => (
                "Break Duration",
                format::duration(u64::from(durations.break_secs())),
            ),
            SettingsField::Sound => ("Sound Notifications", on_off(app.settings.sound)),
        };

        let (marker, style) = if field == selected {
            ("> ", Style::default().fg(Color::Yellow).bold())
        } else {
            ("  ", Style::default().fg(Color::Gray))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {}{:<24}", marker, name), style),
            Span::styled(value, style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "↑/↓ select  ←/→ change  Esc close",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    );

    let popup = Paragraph::new(lines).block(
        Block::default()
            .title(" Settings ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(popup, popup_area);
}

fn draw_complete_overlay(f: &mut Frame, message: &str) {
    let popup_area = centered_rect(f.area(), 40, 8);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Session Complete!",
            Style::default().fg(Color::White).bold(),
        ))
        .centered(),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))).centered(),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(popup, popup_area);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
