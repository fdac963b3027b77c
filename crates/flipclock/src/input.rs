//! Keyboard input
//!
//! The app never reads the terminal itself. An `InputSource` hands it
//! `Command`s; the terminal implementation maps crossterm key events.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::ViewMode;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    Reset,
    SelectMode(ViewMode),
    ToggleFullscreen,
    OpenSettings,
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Escape,
    Quit,
    /// Any other key; only shows the controls again
    Activity,
}

/// Where commands come from
pub trait InputSource {
    /// Wait up to `timeout` for the next command
    fn next_command(&mut self, timeout: Duration) -> Result<Option<Command>>;
}

/// Reads key presses from the terminal
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn next_command(&mut self, timeout: Duration) -> Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(map_key(key))),
            _ => Ok(None),
        }
    }
}

/// Map a key press to a command
pub fn map_key(key: KeyEvent) -> Command {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Command::Quit,
            _ => Command::Activity,
        };
    }

    match key.code {
        KeyCode::Char(' ') => Command::TogglePlay,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char('f') => Command::ToggleFullscreen,
        KeyCode::Char('s') => Command::OpenSettings,
        KeyCode::Char('1') | KeyCode::Char('p') => Command::SelectMode(ViewMode::Pomodoro),
        KeyCode::Char('2') | KeyCode::Char('b') => Command::SelectMode(ViewMode::Break),
        KeyCode::Char('3') | KeyCode::Char('c') => Command::SelectMode(ViewMode::Clock),
        KeyCode::Char('k') | KeyCode::Up => Command::Up,
        KeyCode::Char('j') | KeyCode::Down => Command::Down,
        KeyCode::Char('h') | KeyCode::Left => Command::Left,
        KeyCode::Char('l') | KeyCode::Right => Command::Right,
        KeyCode::Enter => Command::Confirm,
        KeyCode::Esc => Command::Escape,
        KeyCode::Char('q') => Command::Quit,
        _ => Command::Activity,
    }
}
