//! Display surface control
//!
//! Fullscreen is a request to the terminal emulator. xterm-compatible
//! terminals honour `CSI 10 ; 1 t`; others ignore it, and the view still
//! hides its own chrome.

use anyhow::{Context, Result};
use std::io::Write;

pub trait Surface {
    fn set_fullscreen(&mut self, on: bool) -> Result<()>;
}

/// Writes the fullscreen escape to a terminal
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn set_fullscreen(&mut self, on: bool) -> Result<()> {
        let seq: &[u8] = if on { b"\x1b[10;1t" } else { b"\x1b[10;0t" };
        self.out
            .write_all(seq)
            .and_then(|_| self.out.flush())
            .context("Failed to send fullscreen request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_sequences() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.set_fullscreen(true).unwrap();
        surface.set_fullscreen(false).unwrap();
        assert_eq!(surface.out, b"\x1b[10;1t\x1b[10;0t".to_vec());
    }
}
