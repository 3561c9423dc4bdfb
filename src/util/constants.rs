// ErrLogView - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ErrLogView";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ErrLogView";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Console retrieval
// =============================================================================

/// Console command that dumps the control system error log.
///
/// Passed to `CommandSource` as the final argument when the configured
/// command is a console bridge (e.g. an SSH wrapper) rather than a script
/// that already knows what to request.
pub const CONSOLE_ERROR_LOG_COMMAND: &str = "ERR";

// =============================================================================
// Query limits
// =============================================================================

/// Number of most recent entries kept by a query unless configured otherwise.
pub const DEFAULT_MAX_LOGS: usize = 500;

/// Minimum sensible value for the max-logs limit.
pub const MIN_MAX_LOGS: usize = 1;

/// Hard upper bound on max logs. The console keeps far fewer entries than
/// this; the bound only guards against configuration mistakes.
pub const ABSOLUTE_MAX_LOGS: usize = 65_535;

/// Application number assumed for the calling program when neither the
/// config file nor the CLI provides one. Program slots are numbered from 1.
pub const DEFAULT_OWN_APP_NUMBER: u32 = 1;

/// Highest program slot number accepted from configuration.
pub const MAX_APP_NUMBER: u32 = 99;

/// Maximum length of a captured span included in debug output when a
/// candidate record is dropped.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Formatting
// =============================================================================

/// chrono format record timestamps are parsed with (24-hour clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// chrono format used when rendering a timestamp. 12-hour clock without an
/// AM/PM marker, as the console viewer shows it: 14:30:22 renders as 02:30:22.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %I:%M:%S";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
