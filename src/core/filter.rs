// ErrLogView - core/filter.rs
//
// Entry predicates used by the query operations.
// Core layer: pure logic, no I/O.
//
// Severity filtering runs inside a full query. Program and message
// filtering refine an already-fetched result set and keep its order.

use crate::core::model::{LogEntry, TypeMask};

/// True if the entry's severity flag is set in `mask`.
pub fn matches_type_mask(entry: &LogEntry, mask: TypeMask) -> bool {
    mask.contains(entry.entry_type)
}

/// Normalise a user-entered program filter: trim it and drop a trailing
/// `.exe` (any case), so `"MyApp.exe"` and `"MyApp"` filter identically.
pub fn normalize_program_prefix(prefix: &str) -> &str {
    let trimmed = prefix.trim();
    let split = trimmed.len().saturating_sub(4);
    match (trimmed.get(..split), trimmed.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".exe") => stem,
        _ => trimmed,
    }
}

/// Case-insensitive prefix test against the program name.
///
/// `prefix_lower` must already be normalised and lowercased.
fn matches_program_prefix(entry: &LogEntry, prefix_lower: &str) -> bool {
    entry.program.to_lowercase().starts_with(prefix_lower)
}

/// Case-insensitive substring test against the message.
///
/// `needle_lower` must already be trimmed and lowercased.
fn matches_message(entry: &LogEntry, needle_lower: &str) -> bool {
    entry.message.to_lowercase().contains(needle_lower)
}

/// Entries whose program starts with `prefix` (normalised, case-insensitive).
pub fn filter_by_program(entries: &[LogEntry], prefix: &str) -> Vec<LogEntry> {
    let prefix_lower = normalize_program_prefix(prefix).to_lowercase();
    entries
        .iter()
        .filter(|entry| matches_program_prefix(entry, &prefix_lower))
        .cloned()
        .collect()
}

/// Entries whose message contains `substring` (trimmed, case-insensitive).
pub fn filter_by_message(entries: &[LogEntry], substring: &str) -> Vec<LogEntry> {
    let needle_lower = substring.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| matches_message(entry, &needle_lower))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LogEntryType;
    use chrono::NaiveDate;

    fn make_entry(entry_type: LogEntryType, program: &str, message: &str) -> LogEntry {
        LogEntry {
            entry_type,
            program: program.to_string(),
            app_number: 1,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(14, 30, 22)
                .unwrap(),
            message: message.to_string(),
        }
    }

    fn programs(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.program.as_str()).collect()
    }

    #[test]
    fn test_type_mask_membership() {
        let mask = LogEntryType::Warning | LogEntryType::Error;
        let matched: Vec<LogEntryType> = LogEntryType::all()
            .iter()
            .map(|t| make_entry(*t, "MyApp.exe", "x"))
            .filter(|e| matches_type_mask(e, mask))
            .map(|e| e.entry_type)
            .collect();
        assert_eq!(matched, vec![LogEntryType::Warning, LogEntryType::Error]);
    }

    #[test]
    fn test_normalize_program_prefix() {
        assert_eq!(normalize_program_prefix("  MyApp.exe "), "MyApp");
        assert_eq!(normalize_program_prefix("MyApp.EXE"), "MyApp");
        assert_eq!(normalize_program_prefix("MyApp"), "MyApp");
        assert_eq!(normalize_program_prefix(".exe"), "");
        assert_eq!(normalize_program_prefix("exe"), "exe");
        assert_eq!(normalize_program_prefix("ü.exe"), "ü");
    }

    #[test]
    fn test_program_filter_ignores_case_and_extension() {
        let entries = vec![
            make_entry(LogEntryType::Info, "MyApp.exe", "a"),
            make_entry(LogEntryType::Info, "Other.exe", "b"),
            make_entry(LogEntryType::Info, "MyAppHelper.exe", "c"),
        ];
        let with_ext = filter_by_program(&entries, "MyApp.exe");
        let without_ext = filter_by_program(&entries, "MyApp");
        let lower = filter_by_program(&entries, "myapp");

        assert_eq!(programs(&with_ext), vec!["MyApp.exe", "MyAppHelper.exe"]);
        assert_eq!(with_ext, without_ext);
        assert_eq!(with_ext, lower);
    }

    #[test]
    fn test_message_filter_trims_and_ignores_case() {
        let entries = vec![
            make_entry(LogEntryType::Error, "MyApp.exe", "Connection FAILED"),
            make_entry(LogEntryType::Info, "MyApp.exe", "Connection succeeded"),
            make_entry(LogEntryType::Error, "MyApp.exe", "Retry failed again"),
        ];
        let result = filter_by_message(&entries, "  failed ");
        let messages: Vec<&str> = result.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Connection FAILED", "Retry failed again"]);
    }

    #[test]
    fn test_empty_filters_keep_everything_in_order() {
        let entries = vec![
            make_entry(LogEntryType::Info, "B.exe", "2"),
            make_entry(LogEntryType::Info, "A.exe", "1"),
        ];
        assert_eq!(filter_by_program(&entries, "  "), entries);
        assert_eq!(filter_by_message(&entries, ""), entries);
    }
}
