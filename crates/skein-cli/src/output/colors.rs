//! Terminal color support.
//!
//! Colors only decorate diagnostics on stderr, so detection looks at stderr.
//! `NO_COLOR` always wins.

use std::env;
use std::io::{self, IsTerminal};

/// ANSI styles used by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Warning,
    Failure,
    Muted,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Warning => "33",
            Style::Failure => "31",
            Style::Muted => "2",
        }
    }
}

/// Whether styled output is enabled
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Enable colors when stderr is a terminal and NO_COLOR is unset
    pub fn detect() -> Self {
        let enabled = env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal();
        Self { enabled }
    }

    /// Never emit escape codes
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Wrap `text` in the escape codes for `style`
    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", style.code(), text)
        } else {
            text.to_string()
        }
    }
}
