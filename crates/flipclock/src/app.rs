//! Application state and logic

use chrono::NaiveTime;
use flipclock::sound::{self, Chime};
use flipclock::{CardSize, Durations, FlipCard, SessionKind, SessionTimer, TimerEvent};
use flipclock_core::{format, Settings};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::input::Command;
use crate::surface::Surface;

/// What the cards show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Pomodoro,
    Break,
    Clock,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Pomodoro, ViewMode::Break, ViewMode::Clock];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::Break => "Break",
            Self::Clock => "Clock",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Pomodoro => "POMODORO SESSION",
            Self::Break => "BREAK TIME",
            Self::Clock => "CURRENT TIME",
        }
    }
}

/// Rows of the settings overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    TimeFormat,
    WorkMinutes,
    BreakMinutes,
    Sound,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::TimeFormat,
        SettingsField::WorkMinutes,
        SettingsField::BreakMinutes,
        SettingsField::Sound,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::TimeFormat => Self::WorkMinutes,
            Self::WorkMinutes => Self::BreakMinutes,
            Self::BreakMinutes => Self::Sound,
            Self::Sound => Self::TimeFormat,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::TimeFormat => Self::Sound,
            Self::WorkMinutes => Self::TimeFormat,
            Self::BreakMinutes => Self::WorkMinutes,
            Self::Sound => Self::BreakMinutes,
        }
    }
}

/// At most one overlay is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Settings(SettingsField),
    /// Holds the kind that just completed
    Complete(SessionKind),
}

/// Progress line under the cards
pub struct ProgressInfo {
    pub elapsed: String,
    pub remaining: String,
    pub ratio: f64,
}

/// Application state
pub struct App {
    pub settings: Settings,
    pub timer: SessionTimer,
    /// Hours, minutes, seconds
    pub cards: [FlipCard; 3],
    pub overlay: Overlay,
    pub fullscreen: bool,
    clock_mode: bool,
    wall: NaiveTime,
    last_input: Instant,
    quit: bool,
    chime: Box<dyn Chime>,
    surface: Box<dyn Surface>,
}

impl App {
    pub fn new(
        settings: Settings,
        durations: Durations,
        clock_mode: bool,
        now: Instant,
        wall: NaiveTime,
        chime: Box<dyn Chime>,
        surface: Box<dyn Surface>,
    ) -> Self {
        let timer = SessionTimer::new(durations);
        let fields = if clock_mode {
            format::clock_fields(&wall, settings.use_24_hour)
        } else {
            format::countdown_fields(timer.remaining_secs())
        };
        let [hours, minutes, seconds] = fields;

        Self {
            settings,
            timer,
            cards: [
                FlipCard::new(hours, CardSize::Large),
                FlipCard::new(minutes, CardSize::Large),
                FlipCard::new(seconds, CardSize::Small),
            ],
            overlay: Overlay::None,
            fullscreen: false,
            clock_mode,
            wall,
            last_input: now,
            quit: false,
            chime,
            surface,
        }
    }

    /// Current mode; follows the timer across auto-advances
    pub fn mode(&self) -> ViewMode {
        if self.clock_mode {
            return ViewMode::Clock;
        }
        match self.timer.kind() {
            SessionKind::Work => ViewMode::Pomodoro,
            SessionKind::Break => ViewMode::Break,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle(&mut self, command: Command, now: Instant) {
        self.last_input = now;

        if command == Command::Quit {
            self.quit = true;
            return;
        }

        if !self.handle_overlay(command) {
            match command {
                Command::TogglePlay if !self.clock_mode => {
                    if self.timer.is_running() {
                        self.timer.pause();
                    } else {
                        self.timer.start();
                    }
                }
                Command::Reset if !self.clock_mode => self.timer.reset(),
                Command::SelectMode(mode) => self.select_mode(mode),
                Command::ToggleFullscreen => self.toggle_fullscreen(),
                Command::OpenSettings => {
                    self.overlay = Overlay::Settings(SettingsField::default())
                }
                Command::Escape => self.overlay = Overlay::None,
                _ => {}
            }
        }

        self.refresh_cards(now);
    }

    /// Commands the open overlay consumes. Returns false to fall through.
    fn handle_overlay(&mut self, command: Command) -> bool {
        match (self.overlay, command) {
            (Overlay::Complete(_), Command::Confirm | Command::Escape) => {
                self.overlay = Overlay::None;
            }
            (Overlay::Settings(_), Command::Escape | Command::OpenSettings) => {
                self.overlay = Overlay::None;
            }
            (Overlay::Settings(field), Command::Up) => {
                self.overlay = Overlay::Settings(field.prev());
            }
            (Overlay::Settings(field), Command::Down) => {
                self.overlay = Overlay::Settings(field.next());
            }
            (Overlay::Settings(field), Command::Left) => self.adjust(field, false),
            (Overlay::Settings(field), Command::Right | Command::Confirm) => {
                self.adjust(field, true)
            }
            _ => return false,
        }
        true
    }

    /// The once-per-second real-time pulse
    pub fn pulse(&mut self, now: Instant, wall: NaiveTime) {
        self.wall = wall;
        if let Some(event) = self.timer.tick(now) {
            self.on_event(event);
        }
        self.refresh_cards(now);
    }

    /// Run whatever the timer and cards have scheduled
    pub fn poll(&mut self, now: Instant) {
        if let Some(event) = self.timer.poll(now) {
            self.on_event(event);
            self.refresh_cards(now);
        }
        for card in &mut self.cards {
            card.poll(now);
        }
    }

    /// Earliest scheduled step across the timer and cards
    pub fn next_due(&self) -> Option<Instant> {
        self.cards
            .iter()
            .filter_map(FlipCard::next_due)
            .chain(self.timer.next_due())
            .min()
    }

    /// Leave the terminal the way it was found
    pub fn shutdown(&mut self) {
        if self.fullscreen {
            self.fullscreen = false;
            if let Err(e) = self.surface.set_fullscreen(false) {
                warn!("{:#}", e);
            }
        }
    }

    fn on_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::SessionComplete(kind) => {
                info!(kind = %kind, "showing completion");
                self.overlay = Overlay::Complete(kind);
                if self.settings.sound {
                    sound::ring(self.chime.as_mut());
                }
            }
            TimerEvent::Advanced { .. } => {}
        }
    }

    fn select_mode(&mut self, mode: ViewMode) {
        self.clock_mode = mode == ViewMode::Clock;
        match mode {
            ViewMode::Pomodoro => self.timer.switch_mode(SessionKind::Work),
            ViewMode::Break => self.timer.switch_mode(SessionKind::Break),
            ViewMode::Clock => self.timer.pause(),
        }
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        if let Err(e) = self.surface.set_fullscreen(self.fullscreen) {
            warn!("{:#}", e);
        }
    }

    fn adjust(&mut self, field: SettingsField, up: bool) {
        match field {
            SettingsField::TimeFormat => self.settings.use_24_hour = !self.settings.use_24_hour,
            SettingsField::Sound => self.settings.sound = !self.settings.sound,
            SettingsField::WorkMinutes => {
                self.settings.step_work_minutes(up);
                self.apply_durations();
            }
            SettingsField::BreakMinutes => {
                self.settings.step_break_minutes(up);
                self.apply_durations();
            }
        }
    }

    fn apply_durations(&mut self) {
        match Durations::from_minutes(self.settings.work_minutes, self.settings.break_minutes) {
            Ok(durations) => self.timer.set_durations(durations),
            Err(e) => warn!("Ignoring settings change: {}", e),
        }
    }

    fn refresh_cards(&mut self, now: Instant) {
        let fields = self.display_fields();
        for (card, value) in self.cards.iter_mut().zip(fields) {
            card.update(now, &value);
        }
    }

    /// Values the cards are heading towards
    pub fn display_fields(&self) -> [String; 3] {
        if self.clock_mode {
            format::clock_fields(&self.wall, self.settings.use_24_hour)
        } else {
            format::countdown_fields(self.timer.remaining_secs())
        }
    }

    /// Whether the controls panel is shown
    pub fn controls_visible(&self, now: Instant) -> bool {
        let idle_hides = self.timer.is_running() || self.clock_mode;
        if !idle_hides || self.overlay != Overlay::None {
            return true;
        }
        let auto_hide = Duration::from_secs(self.settings.auto_hide_secs);
        now.saturating_duration_since(self.last_input) < auto_hide
    }

    /// "Session N - Work", counting the session in progress
    pub fn session_label(&self) -> String {
        format!(
            "Session {} - {}",
            self.timer.completed_work_sessions() + 1,
            self.timer.kind().label()
        )
    }

    pub fn progress(&self) -> Option<ProgressInfo> {
        if self.clock_mode {
            return None;
        }
        Some(ProgressInfo {
            elapsed: format!("{} elapsed", format::minutes_seconds(self.timer.elapsed_secs())),
            remaining: format!(
                "{} remaining",
                format::minutes_seconds(self.timer.remaining_secs())
            ),
            ratio: (self.timer.progress_percent() / 100.0).clamp(0.0, 1.0),
        })
    }
}

/// Message shown once `kind` completes
pub fn completion_message(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Work => "Time for a break!",
        SessionKind::Break => "Time to get back to work!",
    }
}
