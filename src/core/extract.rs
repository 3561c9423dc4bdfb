// ErrLogView - core/extract.rs
//
// Pattern-based extraction of typed records from repaired console text.
// Core layer: pure, takes text and returns entries.
//
// A record looks like:
//
//   12. Error: MyApp.exe [App 1] # 2024-01-15 14:30:22  # Unhandled exception
//      at MyApp.Main.Run()
//      at MyApp.Main.Start()
//
// The indented `at ...` lines belong to the record's message.

use crate::core::model::{LogEntry, LogEntryType};
use crate::util::constants::{DEBUG_MAX_LINE_PREVIEW, TIMESTAMP_FORMAT};
use crate::util::error::RecordError;
use chrono::NaiveDateTime;
use regex::{Captures, Regex};

/// Counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Spans that matched the record pattern.
    pub candidates: usize,
    /// Candidates discarded because a field failed to parse.
    pub dropped: usize,
}

/// Record pattern compiled for one program slot.
///
/// Building the pattern is the expensive step, so the service keeps one
/// for its own slot and reuses it across queries.
#[derive(Debug, Clone)]
pub struct EntryExtractor {
    app_number: u32,
    pattern: Regex,
}

impl EntryExtractor {
    /// Compile the record pattern for `app_number`.
    pub fn new(app_number: u32) -> Self {
        let pattern = Regex::new(&record_pattern(app_number))
            .expect("extract: record pattern is valid for every app number");
        Self {
            app_number,
            pattern,
        }
    }

    pub fn app_number(&self) -> u32 {
        self.app_number
    }

    /// Extract all well-formed records in text order (oldest first).
    pub fn extract(&self, text: &str) -> Vec<LogEntry> {
        self.extract_with_stats(text).0
    }

    /// Like [`extract`](Self::extract), also reporting how many candidates
    /// were matched and dropped.
    ///
    /// A candidate whose severity or timestamp does not parse is skipped;
    /// the rest of the text is still processed.
    pub fn extract_with_stats(&self, text: &str) -> (Vec<LogEntry>, ExtractStats) {
        let mut entries = Vec::new();
        let mut stats = ExtractStats::default();

        for caps in self.pattern.captures_iter(text) {
            stats.candidates += 1;
            match self.build_entry(&caps) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    stats.dropped += 1;
                    let span = caps.get(0).map_or("", |m| m.as_str());
                    tracing::debug!(
                        app = self.app_number,
                        error = %e,
                        span = preview(span),
                        "Dropped malformed log record"
                    );
                }
            }
        }

        tracing::debug!(
            app = self.app_number,
            entries = entries.len(),
            candidates = stats.candidates,
            dropped = stats.dropped,
            "Extraction complete"
        );

        (entries, stats)
    }

    fn build_entry(&self, caps: &Captures<'_>) -> Result<LogEntry, RecordError> {
        let raw_type = caps.name("type").map_or("", |m| m.as_str());
        let entry_type = raw_type
            .parse::<LogEntryType>()
            .map_err(|_| RecordError::UnknownType {
                raw: raw_type.to_string(),
            })?;

        let raw_ts = caps.name("timestamp").map_or("", |m| m.as_str());
        let timestamp = NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT).map_err(
            |source| RecordError::Timestamp {
                raw: raw_ts.to_string(),
                source,
            },
        )?;

        Ok(LogEntry {
            entry_type,
            program: caps
                .name("program")
                .map_or_else(String::new, |m| m.as_str().to_string()),
            app_number: self.app_number,
            timestamp,
            message: clean_message(caps.name("message").map_or("", |m| m.as_str())),
        })
    }
}

/// Extract records for `app_number` with a freshly compiled pattern.
pub fn extract_entries(app_number: u32, text: &str) -> Vec<LogEntry> {
    EntryExtractor::new(app_number).extract(text)
}

/// Record pattern for one program slot.
///
/// Groups: `type`, `program`, `timestamp`, `message`. The message is the
/// rest of the header line, any blank lines after it, then every
/// immediately following indented `at ...` line. `(?m)` makes `^` match at
/// each line start so consecutive records are matched separately.
fn record_pattern(app_number: u32) -> String {
    format!(
        r"(?m)^\s*\d+\. (?P<type>(?i:Notice|Ok|Info|Warning|Error|Fatal)): (?P<program>[\w-]+\.exe) \[App {app_number}\] # (?P<timestamp>\d{{4}}(?:-\d{{2}}){{2}} \d{{2}}(?::\d{{2}}){{2}})  #(?P<message>.+\n*(?:(?:\s+at.+\n)+)?)"
    )
}

/// Drop the space after the `#` marker and the trailing line breaks the
/// pattern consumes; keep continuation lines and their indentation.
fn clean_message(raw: &str) -> String {
    raw.strip_prefix(' ').unwrap_or(raw).trim_end().to_string()
}

fn preview(span: &str) -> &str {
    match span.char_indices().nth(DEBUG_MAX_LINE_PREVIEW) {
        Some((idx, _)) => &span[..idx],
        None => span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_extract_basic_records_in_text_order() {
        let text = "1. Notice: MyApp.exe [App 1] # 2024-01-15 14:30:22  # Program started\n\
                    2. Warning: MyApp.exe [App 1] # 2024-01-15 14:30:23  # Disk low\n";
        let entries = extract_entries(1, text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_type, LogEntryType::Notice);
        assert_eq!(entries[0].program, "MyApp.exe");
        assert_eq!(entries[0].app_number, 1);
        assert_eq!(entries[0].timestamp, ts(2024, 1, 15, 14, 30, 22));
        assert_eq!(entries[0].message, "Program started");
        assert_eq!(entries[1].entry_type, LogEntryType::Warning);
        assert_eq!(entries[1].message, "Disk low");
    }

    #[test]
    fn test_extract_only_requested_app() {
        let text = "1. Notice: MyApp.exe [App 1] # 2024-01-15 14:30:22  # one\n\
                    2. Notice: Other.exe [App 2] # 2024-01-15 14:30:23  # two\n\
                    3. Notice: MyApp.exe [App 10] # 2024-01-15 14:30:24  # ten\n";
        let entries = extract_entries(2, text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].program, "Other.exe");
        assert_eq!(entries[0].app_number, 2);

        // App 1 must not match the App 10 record.
        let entries = extract_entries(1, text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "one");
    }

    #[test]
    fn test_extract_stack_trace_continuation() {
        let text = "   4. Error: MyApp.exe [App 1] # 2024-01-15 14:30:22  # Unhandled exception\n\
                    \x20  at MyApp.Main.Run()\n\
                    \x20  at MyApp.Main.Start()\n\
                    5. Info: MyApp.exe [App 1] # 2024-01-15 14:30:25  # Recovered\n";
        let entries = extract_entries(1, text);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].message,
            "Unhandled exception\n   at MyApp.Main.Run()\n   at MyApp.Main.Start()"
        );
        assert_eq!(entries[1].message, "Recovered");
    }

    #[test]
    fn test_severity_is_case_insensitive() {
        let text = "1. WARNING: MyApp.exe [App 1] # 2024-01-15 14:30:22  # shouting\n\
                    2. fatal: MyApp.exe [App 1] # 2024-01-15 14:30:23  # quiet\n";
        let entries = extract_entries(1, text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_type, LogEntryType::Warning);
        assert_eq!(entries[1].entry_type, LogEntryType::Fatal);
    }

    #[test]
    fn test_malformed_timestamp_drops_only_that_candidate() {
        let text = "1. Error: MyApp.exe [App 1] # 2024-13-45 99:00:00  # bad clock\n\
                    2. Info: MyApp.exe [App 1] # 2024-01-15 14:30:23  # good\n";
        let extractor = EntryExtractor::new(1);
        let (entries, stats) = extractor.extract_with_stats(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "good");
        assert_eq!(
            stats,
            ExtractStats {
                candidates: 2,
                dropped: 1
            }
        );
    }

    #[test]
    fn test_program_without_exe_is_not_a_record() {
        let text = "1. Error: MyApp [App 1] # 2024-01-15 14:30:22  # no extension\n";
        assert!(extract_entries(1, text).is_empty());
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let extractor = EntryExtractor::new(7);
        assert_eq!(extractor.app_number(), 7);
        assert!(extractor.extract("").is_empty());
    }

    #[test]
    fn test_pattern_compiles_for_extreme_app_numbers() {
        for app in [0, 1, u32::MAX] {
            let _ = EntryExtractor::new(app);
        }
    }
}
