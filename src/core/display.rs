// ErrLogView - core/display.rs
//
// Single-line rendering of log entries under a configurable set of visible
// fields. Pure: the configuration is passed in, entries hold no reference
// to it.

use crate::core::model::LogEntry;
use crate::util::constants::TIMESTAMP_DISPLAY_FORMAT;
use std::fmt;

/// Which optional fields are shown when an entry is rendered.
///
/// The message is always shown. `version` increases on every toggle so a
/// holder of an older snapshot can tell that rendered output is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayConfig {
    pub show_type: bool,
    pub show_program: bool,
    pub show_app_number: bool,
    pub show_timestamp: bool,
    version: u64,
}

/// A visible field of a rendered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayField {
    Type,
    Program,
    AppNumber,
    Timestamp,
}

/// Outcome of a display toggle, returned to the caller instead of raising
/// an event. Carries the toggled field and the configuration now in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayChange {
    Changed {
        field: DisplayField,
        config: DisplayConfig,
    },
}

impl DisplayConfig {
    /// Configuration with every optional field shown.
    pub fn all_fields() -> Self {
        Self {
            show_type: true,
            show_program: true,
            show_app_number: true,
            show_timestamp: true,
            version: 0,
        }
    }

    /// Number of toggles applied since construction.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set one field's visibility. Always counts as a change, even when the
    /// value is unchanged, matching how the console viewer re-renders on any
    /// toggle press.
    pub fn set(&mut self, field: DisplayField, state: bool) -> DisplayChange {
        match field {
            DisplayField::Type => self.show_type = state,
            DisplayField::Program => self.show_program = state,
            DisplayField::AppNumber => self.show_app_number = state,
            DisplayField::Timestamp => self.show_timestamp = state,
        }
        self.version += 1;
        DisplayChange::Changed {
            field,
            config: *self,
        }
    }
}

/// Render `entry` as one line of text under `config`.
///
/// Fields are emitted in a fixed order, then the message after a `#`
/// marker; leading and trailing spaces and `#` characters are trimmed from
/// the result so that a bare message carries no marker.
pub fn format_entry(entry: &LogEntry, config: &DisplayConfig) -> String {
    let mut line = String::with_capacity(64 + entry.message.len());
    if config.show_type {
        line.push_str(entry.entry_type.label());
        line.push_str(": ");
    }
    if config.show_program {
        line.push_str(&entry.program);
        line.push(' ');
    }
    if config.show_app_number {
        line.push_str(&format!("[App {}] ", entry.app_number));
    }
    if config.show_timestamp {
        line.push_str(&format!(
            "# {} ",
            entry.timestamp.format(TIMESTAMP_DISPLAY_FORMAT)
        ));
    }
    line.push_str("# ");
    line.push_str(&entry.message);

    line.trim_matches(|c| c == ' ' || c == '#').to_string()
}

/// `Display` adapter returned by [`LogEntry::display`].
pub struct FormattedEntry<'a> {
    entry: &'a LogEntry,
    config: &'a DisplayConfig,
}

impl fmt::Display for FormattedEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_entry(self.entry, self.config))
    }
}

impl LogEntry {
    /// Borrow this entry for rendering under `config`.
    pub fn display<'a>(&'a self, config: &'a DisplayConfig) -> FormattedEntry<'a> {
        FormattedEntry {
            entry: self,
            config,
        }
    }
}
