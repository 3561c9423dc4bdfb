// ErrLogView - app/service.rs
//
// Orchestrates one query: retrieve console text, repair it, extract the
// records for a program slot, then apply recency limiting and a predicate.
// Owns the max-logs setting and the display configuration.
//
// Nothing is cached here; every query re-runs the whole pipeline.

use crate::app::source::TextSource;
use crate::core::display::{DisplayChange, DisplayConfig, DisplayField};
use crate::core::extract::EntryExtractor;
use crate::core::model::LogEntry;
use crate::core::repair::repair_text;
use crate::util::constants;

/// Construction-time settings for [`LogService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Program slot of the calling application. Queries for this slot
    /// reuse a pattern compiled once at construction.
    pub own_app_number: u32,

    /// Most recent entries kept per query.
    pub max_logs: usize,

    /// Initial field visibility.
    pub display: DisplayConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            own_app_number: constants::DEFAULT_OWN_APP_NUMBER,
            max_logs: constants::DEFAULT_MAX_LOGS,
            display: DisplayConfig::default(),
        }
    }
}

pub struct LogService {
    source: Box<dyn TextSource>,
    own_extractor: EntryExtractor,
    max_logs: usize,
    display: DisplayConfig,
}

impl std::fmt::Debug for LogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogService")
            .field("own_app_number", &self.own_extractor.app_number())
            .field("max_logs", &self.max_logs)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl LogService {
    pub fn new(config: ServiceConfig, source: Box<dyn TextSource>) -> Self {
        tracing::debug!(
            own_app = config.own_app_number,
            max_logs = config.max_logs,
            "Log service created"
        );
        Self {
            source,
            own_extractor: EntryExtractor::new(config.own_app_number),
            max_logs: config.max_logs,
            display: config.display,
        }
    }

    /// Fetch the newest `max_logs` records for `app_number` that satisfy
    /// `predicate`, newest first.
    ///
    /// Retrieval failures are logged and produce an empty result.
    pub fn get_filtered_logs<P>(&mut self, app_number: u32, predicate: P) -> Vec<LogEntry>
    where
        P: Fn(&LogEntry) -> bool,
    {
        let raw = match self.source.request_console_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Console text retrieval failed; no entries");
                String::new()
            }
        };

        let entries = self.parse(app_number, &raw);
        let total = entries.len();

        let result: Vec<LogEntry> = entries
            .into_iter()
            .rev()
            .take(self.max_logs)
            .filter(|entry| predicate(entry))
            .collect();

        tracing::debug!(
            app = app_number,
            extracted = total,
            max_logs = self.max_logs,
            returned = result.len(),
            "Query complete"
        );

        result
    }

    /// Repair and extract in text order (oldest first).
    fn parse(&self, app_number: u32, raw: &str) -> Vec<LogEntry> {
        if raw.is_empty() {
            return Vec::new();
        }
        let repaired = repair_text(raw);
        if app_number == self.own_extractor.app_number() {
            self.own_extractor.extract(&repaired)
        } else {
            EntryExtractor::new(app_number).extract(&repaired)
        }
    }

    /// Replace the recency cutoff for subsequent queries.
    pub fn set_max_logs(&mut self, max_logs: usize) {
        tracing::debug!(max_logs, "Max logs updated");
        self.max_logs = max_logs;
    }

    pub fn max_logs(&self) -> usize {
        self.max_logs
    }

    pub fn own_app_number(&self) -> u32 {
        self.own_extractor.app_number()
    }

    /// Current field visibility, for rendering.
    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn enable_show_type(&mut self, state: bool) -> DisplayChange {
        self.set_display(DisplayField::Type, state)
    }

    pub fn enable_show_program(&mut self, state: bool) -> DisplayChange {
        self.set_display(DisplayField::Program, state)
    }

    pub fn enable_show_app_number(&mut self, state: bool) -> DisplayChange {
        self.set_display(DisplayField::AppNumber, state)
    }

    pub fn enable_show_timestamp(&mut self, state: bool) -> DisplayChange {
        self.set_display(DisplayField::Timestamp, state)
    }

    fn set_display(&mut self, field: DisplayField, state: bool) -> DisplayChange {
        tracing::debug!(?field, state, "Display field toggled");
        self.display.set(field, state)
    }
}
