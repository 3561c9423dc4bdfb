// ErrLogView - app/viewer.rs
//
// Externally facing query surface. Primary queries (all, by type) run the
// full service pipeline and replace the cached result; refinement queries
// (by program, by message) narrow the cached result without touching the
// console. Every result is delivered to a single registered sink.
//
// Refinement queries accept an app number for signature parity with the
// primary queries but ignore it: they always operate on whatever the last
// primary query cached, whichever slot that was for.

use crate::app::service::LogService;
use crate::core::display::{format_entry, DisplayChange, DisplayConfig};
use crate::core::filter;
use crate::core::model::{LogEntry, TypeMask};

/// Why a result was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateReason {
    /// A primary query fetched and cached a new result.
    Query,
    /// A refinement narrowed the cached result.
    Refinement,
    /// The cached result is re-sent because field visibility changed.
    DisplayChanged,
}

/// One published result: the complete ordered entry set plus the display
/// configuration it should be rendered with.
#[derive(Debug, Clone)]
pub struct LogsUpdate {
    pub entries: Vec<LogEntry>,
    pub display: DisplayConfig,
    pub reason: UpdateReason,
}

impl LogsUpdate {
    /// Render every entry, in order, under this update's display config.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format_entry(entry, &self.display))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Receives published results.
pub type LogsSink = Box<dyn FnMut(&LogsUpdate)>;

pub struct LogViewer {
    service: LogService,
    cached: Option<Vec<LogEntry>>,
    sink: Option<LogsSink>,
}

impl std::fmt::Debug for LogViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogViewer")
            .field("service", &self.service)
            .field("cached", &self.cached.as_ref().map(Vec::len))
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl LogViewer {
    pub fn new(service: LogService) -> Self {
        Self {
            service,
            cached: None,
            sink: None,
        }
    }

    /// Register the result sink, replacing any previous one.
    pub fn set_logs_updated<F>(&mut self, sink: F)
    where
        F: FnMut(&LogsUpdate) + 'static,
    {
        self.sink = Some(Box::new(sink));
    }

    /// Last result produced by a primary query, newest first.
    pub fn cached(&self) -> Option<&[LogEntry]> {
        self.cached.as_deref()
    }

    pub fn service(&self) -> &LogService {
        &self.service
    }

    pub fn set_max_logs(&mut self, max_logs: usize) {
        self.service.set_max_logs(max_logs);
    }

    /// Fetch every recent entry for `app_number`, publish and cache it.
    pub fn get_all_logs(&mut self, app_number: u32) {
        let entries = self.service.get_filtered_logs(app_number, |_| true);
        self.publish_and_cache(entries);
    }

    /// Fetch recent entries for `app_number` whose severity is in `mask`,
    /// publish and cache them.
    pub fn get_logs_by_type_filter(&mut self, app_number: u32, mask: TypeMask) {
        let entries = self
            .service
            .get_filtered_logs(app_number, |entry| filter::matches_type_mask(entry, mask));
        self.publish_and_cache(entries);
    }

    /// Narrow the cached result to programs starting with `prefix`
    /// (trimmed, `.exe` optional, case-insensitive). Does nothing if no
    /// primary query has run yet. The cache is left unchanged.
    pub fn get_logs_by_program_filter(&mut self, _app_number: u32, prefix: &str) {
        let Some(cached) = self.cached.as_deref() else {
            tracing::debug!("Program filter requested before any query; ignored");
            return;
        };
        let entries = filter::filter_by_program(cached, prefix);
        self.publish(entries, UpdateReason::Refinement);
    }

    /// Narrow the cached result to messages containing `substring`
    /// (trimmed, case-insensitive). Does nothing if no primary query has
    /// run yet. The cache is left unchanged.
    pub fn get_logs_by_message_filter(&mut self, _app_number: u32, substring: &str) {
        let Some(cached) = self.cached.as_deref() else {
            tracing::debug!("Message filter requested before any query; ignored");
            return;
        };
        let entries = filter::filter_by_message(cached, substring);
        self.publish(entries, UpdateReason::Refinement);
    }

    pub fn enable_show_type(&mut self, state: bool) {
        let change = self.service.enable_show_type(state);
        self.on_display_change(change);
    }

    pub fn enable_show_program(&mut self, state: bool) {
        let change = self.service.enable_show_program(state);
        self.on_display_change(change);
    }

    pub fn enable_show_app_number(&mut self, state: bool) {
        let change = self.service.enable_show_app_number(state);
        self.on_display_change(change);
    }

    pub fn enable_show_timestamp(&mut self, state: bool) {
        let change = self.service.enable_show_timestamp(state);
        self.on_display_change(change);
    }

    /// Re-send the cached result so the sink re-renders it.
    fn on_display_change(&mut self, change: DisplayChange) {
        match change {
            DisplayChange::Changed { field, .. } => {
                if let Some(cached) = self.cached.clone() {
                    tracing::debug!(?field, entries = cached.len(), "Re-publishing cached logs");
                    self.publish(cached, UpdateReason::DisplayChanged);
                }
            }
        }
    }

    fn publish_and_cache(&mut self, entries: Vec<LogEntry>) {
        self.publish(entries.clone(), UpdateReason::Query);
        self.cached = Some(entries);
    }

    fn publish(&mut self, entries: Vec<LogEntry>, reason: UpdateReason) {
        let update = LogsUpdate {
            entries,
            display: *self.service.display(),
            reason,
        };
        tracing::debug!(entries = update.len(), ?reason, "Publishing logs");
        if let Some(sink) = self.sink.as_mut() {
            sink(&update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::service::ServiceConfig;
    use crate::app::source::StaticText;
    use crate::core::model::LogEntryType;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TEXT: &str = "\
1. Notice: MyApp.exe [App 1] # 2024-01-15 14:30:21  # Program started
2. Warning: Helper.exe [App 1] # 2024-01-15 14:30:22  # Disk space low
3. Error: MyApp.exe [App 1] # 2024-01-15 14:30:23  # Connection failed
4. Info: myapp.exe [App 1] # 2024-01-15 14:30:24  # Connection restored
";

    fn viewer_with_log() -> (LogViewer, Rc<RefCell<Vec<LogsUpdate>>>) {
        let service = LogService::new(ServiceConfig::default(), Box::new(StaticText::new(TEXT)));
        let mut viewer = LogViewer::new(service);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink_log = Rc::clone(&log);
        viewer.set_logs_updated(move |update| sink_log.borrow_mut().push(update.clone()));
        (viewer, log)
    }

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_get_all_publishes_and_caches() {
        let (mut viewer, log) = viewer_with_log();
        viewer.get_all_logs(1);

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reason, UpdateReason::Query);
        assert_eq!(
            messages(&log[0].entries),
            vec![
                "Connection restored",
                "Connection failed",
                "Disk space low",
                "Program started"
            ]
        );
        assert_eq!(viewer.cached(), Some(log[0].entries.as_slice()));
    }

    #[test]
    fn test_type_filter_uses_mask_and_replaces_cache() {
        let (mut viewer, log) = viewer_with_log();
        viewer.get_all_logs(1);
        viewer.get_logs_by_type_filter(1, LogEntryType::Warning | LogEntryType::Error);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(
            messages(&log[1].entries),
            vec!["Connection failed", "Disk space low"]
        );
        assert_eq!(viewer.cached().map(<[LogEntry]>::len), Some(2));
    }

    #[test]
    fn test_refinement_before_query_is_silent() {
        let (mut viewer, log) = viewer_with_log();
        viewer.get_logs_by_message_filter(1, "connection");
        viewer.get_logs_by_program_filter(1, "MyApp");
        assert!(log.borrow().is_empty());
        assert!(viewer.cached().is_none());
    }

    #[test]
    fn test_program_filter_refines_cache_in_order() {
        let (mut viewer, log) = viewer_with_log();
        viewer.get_all_logs(1);
        viewer.get_logs_by_program_filter(1, " MyApp.EXE ");
        viewer.get_logs_by_program_filter(1, "myapp");

        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].reason, UpdateReason::Refinement);
        assert_eq!(
            messages(&log[1].entries),
            vec!["Connection restored", "Connection failed", "Program started"]
        );
        assert_eq!(log[1].entries, log[2].entries);
        // Refinements do not narrow the cache.
        assert_eq!(viewer.cached().map(<[LogEntry]>::len), Some(4));
    }

    #[test]
    fn test_message_filter_ignores_app_number() {
        let (mut viewer, log) = viewer_with_log();
        viewer.get_all_logs(1);
        viewer.get_logs_by_message_filter(42, "CONNECTION ");

        let log = log.borrow();
        assert_eq!(
            messages(&log[1].entries),
            vec!["Connection restored", "Connection failed"]
        );
    }

    #[test]
    fn test_display_toggle_republishes_cache() {
        let (mut viewer, log) = viewer_with_log();

        // Nothing cached yet: toggling publishes nothing.
        viewer.enable_show_type(false);
        assert!(log.borrow().is_empty());

        viewer.get_all_logs(1);
        viewer.enable_show_timestamp(true);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].reason, UpdateReason::DisplayChanged);
        assert_eq!(log[0].entries, log[1].entries);

        let before = log[0].lines();
        let after = log[1].lines();
        assert_eq!(before[0], "Connection restored");
        assert_eq!(after[0], "2024-01-15 02:30:24 # Connection restored");
    }

    #[test]
    fn test_last_sink_registration_wins() {
        let (mut viewer, first) = viewer_with_log();
        let second = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&second);
        viewer.set_logs_updated(move |_| *counter.borrow_mut() += 1);

        viewer.get_all_logs(1);
        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), 1);
    }
}
