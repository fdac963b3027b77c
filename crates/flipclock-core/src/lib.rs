//! flipclock-core - Shared functionality for the flipclock tools
//!
//! Standard paths, the settings file and the small formatting helpers
//! used by both the timer core and the terminal view.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{ConfigError, Settings};
pub use paths::Paths;
