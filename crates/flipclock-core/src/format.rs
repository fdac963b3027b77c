//! Formatting utilities

use chrono::Timelike;

/// Zero-padded two digit field
pub fn two_digits(value: u32) -> String {
    format!("{:02}", value)
}

/// Hours, minutes and seconds fields for a countdown
pub fn countdown_fields(total_secs: u32) -> [String; 3] {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    [two_digits(hours), two_digits(minutes), two_digits(seconds)]
}

/// Hours, minutes and seconds fields for the wall clock
pub fn clock_fields<T: Timelike>(time: &T, use_24_hour: bool) -> [String; 3] {
    let hours = if use_24_hour {
        time.hour()
    } else {
        match time.hour() % 12 {
            0 => 12,
            h => h,
        }
    };
    [
        two_digits(hours),
        two_digits(time.minute()),
        two_digits(time.second()),
    ]
}

/// `m:ss`, as shown under the progress bar
pub fn minutes_seconds(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format a duration in human-readable form
pub fn duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        match seconds % 60 {
            0 => format!("{}m", seconds / 60),
            secs => format!("{}m {}s", seconds / 60, secs),
        }
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
