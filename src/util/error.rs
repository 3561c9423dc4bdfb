// ErrLogView - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
//
// The query pipeline itself never surfaces errors: retrieval failures,
// malformed records and stale-cache refinements all degrade to fewer or
// no results. `SourceError` and `RecordError` are logged where they occur;
// `ErrLogViewError` covers only what can still fail the CLI (writing output).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type returned by the `errlogview` binary.
#[derive(Debug)]
pub enum ErrLogViewError {
    /// Writing rendered entries to stdout failed.
    Output { source: io::Error },

    /// JSON serialisation of entries failed.
    Json { source: serde_json::Error },
}

impl fmt::Display for ErrLogViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output { source } => write!(f, "Output error: {source}"),
            Self::Json { source } => write!(f, "JSON output error: {source}"),
        }
    }
}

impl std::error::Error for ErrLogViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Output { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Errors raised by a `TextSource` while requesting console text.
#[derive(Debug)]
pub enum SourceError {
    /// Reading a captured dump (file or stdin) failed.
    Io {
        path: Option<PathBuf>,
        source: io::Error,
    },

    /// The console bridge program could not be started.
    Spawn { program: String, source: io::Error },

    /// The console bridge program ran but reported failure.
    CommandFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path: Some(path),
                source,
            } => write!(f, "Failed to read '{}': {source}", path.display()),
            Self::Io { path: None, source } => write!(f, "Failed to read stdin: {source}"),
            Self::Spawn { program, source } => {
                write!(f, "Failed to start '{program}': {source}")
            }
            Self::CommandFailed {
                program,
                status,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "'{program}' exited with status {code}")?,
                    None => write!(f, "'{program}' was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Spawn { source, .. } => Some(source),
            Self::CommandFailed { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record errors
// ---------------------------------------------------------------------------

/// Why a matched candidate span could not become a `LogEntry`.
///
/// Never returned from a query: the extractor logs it and drops the
/// candidate, continuing with the rest of the text.
#[derive(Debug)]
pub enum RecordError {
    /// The severity name is not one of the six known types.
    UnknownType { raw: String },

    /// The timestamp has the right shape but is not a real date/time.
    Timestamp {
        raw: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { raw } => write!(f, "unknown log entry type '{raw}'"),
            Self::Timestamp { raw, source } => {
                write!(f, "cannot parse timestamp '{raw}': {source}")
            }
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timestamp { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading. `load_config` reports these as
/// warnings and falls back to defaults; they never abort a run.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Argument errors
// ---------------------------------------------------------------------------

/// Errors interpreting user-supplied values. Surfaced through clap's value
/// parser for `--types`.
#[derive(Debug)]
pub enum ArgError {
    /// A type mask was neither a number nor a list of severity names.
    InvalidTypeMask { input: String, token: String },
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTypeMask { input, token } => write!(
                f,
                "Invalid type mask '{input}': '{token}' is not one of \
                 notice, ok, info, warning, error, fatal"
            ),
        }
    }
}

impl std::error::Error for ArgError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_command_failed_display_includes_stderr() {
        let err = SourceError::CommandFailed {
            program: "console-bridge".to_string(),
            status: Some(2),
            stderr: "host unreachable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'console-bridge' exited with status 2: host unreachable"
        );
    }

    #[test]
    fn test_source_error_preserves_io_chain() {
        let err = SourceError::Io {
            path: Some(PathBuf::from("err.txt")),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("err.txt"));
        assert_eq!(err.source().expect("io source").to_string(), "missing");
    }

    #[test]
    fn test_output_error_exposes_io_source() {
        let err = ErrLogViewError::Output {
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.to_string(), "Output error: pipe closed");
        assert!(err.source().is_some());
    }
}
