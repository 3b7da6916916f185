//! Terminal output formatting and utilities.
//!
//! Data (fingerprints, tables, paths) goes to stdout untouched. Warnings and
//! errors go to stderr.

pub mod colors;
pub mod errors;

use colors::{ColorSupport, Style};
use std::io::{self, Write};

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    /// Print a line of command output
    pub fn data(&self, line: &str) {
        println!("{}", line);
    }

    /// Write raw bytes of command output
    pub fn raw(&self, bytes: &[u8]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(bytes)?;
        handle.flush()
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.paint(Style::Warning, "⚠"), message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
