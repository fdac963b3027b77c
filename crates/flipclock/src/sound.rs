//! Completion chime
//!
//! Plays a short system sound when a session completes. Playback is spawned
//! and never waited on; failures are logged and go no further.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Something that can make a noise
pub trait Chime {
    fn play(&mut self) -> Result<()>;
}

/// Plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Chime for Silent {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }
}

const MACOS_SOUNDS: &[&str] = &[
    "/System/Library/Sounds/Glass.aiff",
    "/System/Library/Sounds/Ping.aiff",
];

const LINUX_SOUNDS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/freedesktop/stereo/bell.oga",
    "/usr/share/sounds/sound-icons/bell.wav",
    "/usr/share/sounds/alsa/Front_Center.wav",
];

/// Available sound players
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundBackend {
    /// macOS afplay
    Afplay(PathBuf),
    /// PulseAudio / PipeWire paplay
    Paplay(PathBuf),
    /// ALSA aplay (wav only)
    Aplay(PathBuf),
    /// Terminal bell
    Bell,
}

impl SoundBackend {
    /// Detect the best available player and sound file for this platform
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            if let Some(sound) = first_existing(MACOS_SOUNDS) {
                return Self::Afplay(sound);
            }
        } else if cfg!(target_os = "linux") {
            if let Some(sound) = first_existing(LINUX_SOUNDS) {
                if Self::command_exists("paplay") {
                    return Self::Paplay(sound);
                }
                if sound.extension().is_some_and(|ext| ext == "wav")
                    && Self::command_exists("aplay")
                {
                    return Self::Aplay(sound);
                }
            }
        }

        Self::Bell
    }

    /// Check if a command exists
    fn command_exists(cmd: &str) -> bool {
        Command::new("which")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get the name of this backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::Afplay(_) => "afplay",
            Self::Paplay(_) => "paplay",
            Self::Aplay(_) => "aplay",
            Self::Bell => "bell",
        }
    }

    fn spawn(program: &str, sound: &Path) -> Result<()> {
        Command::new(program)
            .arg(sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;
        Ok(())
    }

    fn bell() -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07").context("Failed to ring terminal bell")?;
        stdout.flush()?;
        Ok(())
    }
}

impl Chime for SoundBackend {
    fn play(&mut self) -> Result<()> {
        debug!(backend = self.name(), "playing chime");
        match self {
            Self::Afplay(sound) => Self::spawn("afplay", sound),
            Self::Paplay(sound) => Self::spawn("paplay", sound),
            Self::Aplay(sound) => {
                if !sound.exists() {
                    bail!("Sound file is gone: {}", sound.display());
                }
                Self::spawn("aplay", sound)
            }
            Self::Bell => Self::bell(),
        }
    }
}

fn first_existing(candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Play `chime`, logging instead of propagating any failure
pub fn ring(chime: &mut dyn Chime) {
    if let Err(e) = chime.play() {
        warn!("Failed to play chime: {:#}", e);
    }
}
