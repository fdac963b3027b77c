//! Settings for flipclock
//!
//! Read once at startup from `~/.config/flipclock/config.json`. Every field is
//! optional; a missing file means defaults. Changes made in the settings
//! overlay are not written back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// Work minutes selectable from the settings overlay
pub const WORK_MINUTES_RANGE: RangeInclusive<u32> = 15..=60;
pub const WORK_MINUTES_STEP: u32 = 5;

/// Break minutes selectable from the settings overlay
pub const BREAK_MINUTES_RANGE: RangeInclusive<u32> = 3..=15;
pub const BREAK_MINUTES_STEP: u32 = 1;

/// Errors for settings that can never drive a timer
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least 1 minute")]
    ZeroMinutes { field: &'static str },

    #[error("auto_hide_secs must be at least 1 second")]
    ZeroAutoHide,

    #[error("Invalid duration '{0}'. Use formats like: 25, 25m, 30s, 1m30s")]
    InvalidDuration(String),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Length of a work session in minutes
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,

    /// Length of a break in minutes
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,

    /// Show the wall clock as 00-23 instead of 1-12
    #[serde(default)]
    pub use_24_hour: bool,

    /// Play a chime when a session completes
    #[serde(default = "default_sound")]
    pub sound: bool,

    /// Seconds without input before the controls hide while running
    #[serde(default = "default_auto_hide_secs")]
    pub auto_hide_secs: u64,
}

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

fn default_sound() -> bool {
    true
}

fn default_auto_hide_secs() -> u64 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            use_24_hour: false,
            sound: default_sound(),
            auto_hide_secs: default_auto_hide_secs(),
        }
    }
}

impl Settings {
    /// Load settings from file, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;

        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON: {}", path.display()))?;

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        Ok(settings)
    }

    /// Reject settings that would produce a zero-length session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_minutes == 0 {
            return Err(ConfigError::ZeroMinutes { field: "work_minutes" });
        }
        if self.break_minutes == 0 {
            return Err(ConfigError::ZeroMinutes { field: "break_minutes" });
        }
        if self.auto_hide_secs == 0 {
            return Err(ConfigError::ZeroAutoHide);
        }
        Ok(())
    }

    /// Move work minutes one step up or down within the overlay range
    pub fn step_work_minutes(&mut self, up: bool) {
        self.work_minutes = step(self.work_minutes, up, WORK_MINUTES_STEP, &WORK_MINUTES_RANGE);
    }

    /// Move break minutes one step up or down within the overlay range
    pub fn step_break_minutes(&mut self, up: bool) {
        self.break_minutes = step(self.break_minutes, up, BREAK_MINUTES_STEP, &BREAK_MINUTES_RANGE);
    }
}

fn step(value: u32, up: bool, by: u32, range: &RangeInclusive<u32>) -> u32 {
    let next = if up {
        value.saturating_add(by)
    } else {
        value.saturating_sub(by)
    };
    next.clamp(*range.start(), *range.end())
}

/// Parse a duration such as `25` (minutes), `90s`, `25m` or `1m30s` into seconds
pub fn parse_duration(input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim().to_lowercase();
    let invalid = || ConfigError::InvalidDuration(input.to_string());

    // A bare number is minutes
    if let Ok(minutes) = trimmed.parse::<u32>() {
        return match minutes.checked_mul(60) {
            Some(0) | None => Err(invalid()),
            Some(secs) => Ok(secs),
        };
    }

    let mut total: u32 = 0;
    let mut number = String::new();

    for ch in trimmed.chars() {
        match ch {
            '0'..='9' => number.push(ch),
            'm' | 's' => {
                if number.is_empty() {
                    return Err(invalid());
                }
                let n: u32 = number.parse().map_err(|_| invalid())?;
                let secs = if ch == 'm' { n.checked_mul(60) } else { Some(n) };
                total = secs
                    .and_then(|s| total.checked_add(s))
                    .ok_or_else(invalid)?;
                number.clear();
            }
            c if c.is_whitespace() => {}
            _ => return Err(invalid()),
        }
    }

    if !number.is_empty() || total == 0 {
        return Err(invalid());
    }

    Ok(total)
}
