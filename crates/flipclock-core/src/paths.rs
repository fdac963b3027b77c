//! Standard paths used by flipclock

use std::path::PathBuf;

/// Standard flipclock paths
pub struct Paths {
    /// Data directory (~/.local/share/flipclock)
    pub data: PathBuf,
    /// Config directory (~/.config/flipclock)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("flipclock");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("flipclock");

        Self { data, config }
    }

    /// Settings file read at startup
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Log file for the TUI (stdout belongs to the terminal view)
    pub fn log_file(&self) -> PathBuf {
        self.data.join("flipclock.log")
    }
}
