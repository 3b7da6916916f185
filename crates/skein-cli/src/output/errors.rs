//! Error message formatting with actionable suggestions.
//!
//! Renders a SkeinError with its suggestion and the chain of underlying
//! causes, so a failed fingerprint explains which file or key was at fault.

use super::colors::{ColorSupport, Style};
use skein_core::error::SkeinError;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    /// Create a formatter that never emits color codes
    pub fn plain() -> Self {
        Self {
            colors: ColorSupport::disabled(),
        }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &SkeinError) -> String {
        let mut output = String::new();

        // Main error message
        output.push_str(&self.colors.paint(Style::Failure, "error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        // Add suggestion if available
        if let Some(suggestion) = error.suggestion() {
            output.push_str(&self.colors.paint(Style::Muted, "help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        // Add source chain if available
        let mut source = error.source();
        while let Some(err) = source {
            output.push_str(&self.colors.paint(Style::Muted, "caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            output.push('\n');
            source = err.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
