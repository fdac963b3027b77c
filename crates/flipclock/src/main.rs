//! flipclock - Flip-card clock and Pomodoro timer for the terminal
//!
//! Usage:
//!   flipclock                   Start a 25 minute work session
//!   flipclock --work 50m        Custom work length
//!   flipclock --clock           Start on the wall clock
//!   flipclock config            Show the effective settings

mod app;
mod glyph;
mod input;
mod surface;
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flipclock::{Durations, SoundBackend};
use flipclock_core::config::parse_duration;
use flipclock_core::{Paths, Settings};
use ratatui::prelude::*;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use input::{InputSource, TerminalInput};
use surface::TerminalSurface;

/// Timer and clock resolution
const PULSE: Duration = Duration::from_secs(1);
/// Longest the loop sleeps between redraws
const MAX_WAIT: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "flipclock")]
#[command(about = "Flip-card clock and Pomodoro timer for the terminal")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Leave it running in a spare terminal to pace work sessions, or as a
    large wall clock.

EXAMPLES:
    flipclock                       # 25 min work, 5 min break
    flipclock --work 50 --break 10  # Longer sessions
    flipclock --work 90s            # Short test session
    flipclock --clock --24h         # Wall clock, 24-hour format
    flipclock config                # Show settings and config path

KEY BINDINGS:
    Space       Start/pause the timer
    r           Reset the current session
    1/p 2/b 3/c Pomodoro, Break, Clock
    s           Settings (arrows or hjkl to change, Esc to close)
    f           Toggle fullscreen
    Enter       Dismiss the completion message
    q, Ctrl-C   Quit

CONFIG:
    ~/.config/flipclock/config.json (all fields optional):
    {"work_minutes": 25, "break_minutes": 5, "use_24_hour": false,
     "sound": true, "auto_hide_secs": 3}

LOGS:
    ~/.local/share/flipclock/flipclock.log (set RUST_LOG=debug for more)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Work session length (25, 25m, 90s, 1m30s)
    #[arg(long, value_name = "DUR")]
    work: Option<String>,

    /// Break length (5, 5m, 300s)
    #[arg(long = "break", value_name = "DUR")]
    break_: Option<String>,

    /// Show the clock in 24-hour format
    #[arg(long = "24h")]
    use_24_hour: bool,

    /// Don't play a sound when a session completes
    #[arg(long)]
    no_sound: bool,

    /// Start on the wall clock instead of the timer
    #[arg(long)]
    clock: bool,

    /// Settings file to read instead of the default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective settings and where they are read from
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new();

    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let mut settings = Settings::load(&config_path)?;
    let durations = apply_overrides(&mut settings, &cli)?;

    match cli.command {
        Some(Commands::Config) => cmd_config(&settings, durations, &config_path),
        None => {
            if let Err(e) = init_logging(&paths) {
                eprintln!("Warning: logging disabled: {:#}", e);
            }
            cmd_run(settings, durations, cli.clock)
        }
    }
}

/// Fold command-line flags into the loaded settings
fn apply_overrides(settings: &mut Settings, cli: &Cli) -> Result<Durations> {
    let mut work_secs = settings.work_minutes.saturating_mul(60);
    let mut break_secs = settings.break_minutes.saturating_mul(60);

    if let Some(work) = &cli.work {
        work_secs = parse_duration(work).context("--work")?;
        settings.work_minutes = work_secs.div_ceil(60);
    }
    if let Some(rest) = &cli.break_ {
        break_secs = parse_duration(rest).context("--break")?;
        settings.break_minutes = break_secs.div_ceil(60);
    }
    if cli.use_24_hour {
        settings.use_24_hour = true;
    }
    if cli.no_sound {
        settings.sound = false;
    }

    Ok(Durations::new(work_secs, break_secs)?)
}

/// What `flipclock config` prints: the settings plus the session lengths
/// the timer will actually run, which flags can set to the second
#[derive(Serialize)]
struct EffectiveConfig<'a> {
    settings: &'a Settings,
    durations: Durations,
}

fn config_json(settings: &Settings, durations: Durations) -> Result<String> {
    let effective = EffectiveConfig {
        settings,
        durations,
    };
    serde_json::to_string_pretty(&effective).context("Failed to serialize settings")
}

fn cmd_config(settings: &Settings, durations: Durations, path: &Path) -> Result<()> {
    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config: {}{}", path.display(), state);
    println!("{}", config_json(settings, durations)?);
    Ok(())
}

/// Send tracing output to the log file; stdout belongs to the TUI
fn init_logging(paths: &Paths) -> Result<()> {
    std::fs::create_dir_all(&paths.data)
        .with_context(|| format!("Failed to create {}", paths.data.display()))?;

    let log_file = paths.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open {}", log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flipclock=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn cmd_run(settings: Settings, durations: Durations, clock_mode: bool) -> Result<()> {
    let chime = SoundBackend::detect();
    info!(
        work_secs = durations.work_secs(),
        break_secs = durations.break_secs(),
        sound = chime.name(),
        "starting"
    );

    let now = Instant::now();
    let mut app = App::new(
        settings,
        durations,
        clock_mode,
        now,
        Local::now().time(),
        Box::new(chime),
        Box::new(TerminalSurface::new(io::stdout())),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = run_app(&mut terminal, &mut app, &mut TerminalInput);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    input: &mut dyn InputSource,
) -> Result<()> {
    let mut next_pulse = Instant::now() + PULSE;

    loop {
        let now = Instant::now();
        terminal.draw(|f| ui::draw(f, app, now))?;

        let wake = app.next_due().map_or(next_pulse, |due| due.min(next_pulse));
        let timeout = wake.saturating_duration_since(Instant::now()).min(MAX_WAIT);

        if let Some(command) = input.next_command(timeout)? {
            let was_running = app.timer.is_running();
            let now = Instant::now();
            app.handle(command, now);
            if app.should_quit() {
                return Ok(());
            }
            // A fresh start gets a full first second
            if !was_running && app.timer.is_running() {
                next_pulse = now + PULSE;
            }
        }

        let now = Instant::now();
        if now >= next_pulse {
            app.pulse(now, Local::now().time());
            next_pulse += PULSE;
            if next_pulse <= now {
                next_pulse = now + PULSE;
            }
        }
        app.poll(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("flipclock").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let mut settings = Settings::default();
        let durations = apply_overrides(&mut settings, &parse(&[])).unwrap();
        assert_eq!(durations, Durations::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_duration_flags() {
        let mut settings = Settings::default();
        let cli = parse(&["--work", "90s", "--break", "10"]);
        let durations = apply_overrides(&mut settings, &cli).unwrap();
        assert_eq!(durations.work_secs(), 90);
        assert_eq!(durations.break_secs(), 600);
        assert_eq!(settings.work_minutes, 2);
        assert_eq!(settings.break_minutes, 10);
    }

    #[test]
    fn test_toggle_flags() {
        let mut settings = Settings::default();
        let cli = parse(&["--24h", "--no-sound", "--clock"]);
        apply_overrides(&mut settings, &cli).unwrap();
        assert!(settings.use_24_hour);
        assert!(!settings.sound);
        assert!(cli.clock);
    }

    #[test]
    fn test_bad_duration_is_rejected() {
        let mut settings = Settings::default();
        assert!(apply_overrides(&mut settings, &parse(&["--work", "soon"])).is_err());
        assert!(apply_overrides(&mut settings, &parse(&["--break", "0"])).is_err());
    }

    #[test]
    fn test_config_json_shows_effective_durations() {
        let mut settings = Settings::default();
        let cli = parse(&["--work", "90s", "config"]);
        let durations = apply_overrides(&mut settings, &cli).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&config_json(&settings, durations).unwrap()).unwrap();
        assert_eq!(json["durations"]["work_secs"], 90);
        assert_eq!(json["durations"]["break_secs"], 300);
        assert_eq!(json["settings"]["work_minutes"], 2);
        assert_eq!(json["settings"]["sound"], true);
    }

    #[test]
    fn test_config_subcommand() {
        let cli = parse(&["config"]);
        assert!(matches!(cli.command, Some(Commands::Config)));
    }
}
