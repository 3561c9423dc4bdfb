// ErrLogView - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::display::DisplayConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ErrLogView configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/errlogview/ or %APPDATA%\ErrLogView\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[service]` section.
    pub service: ServiceSection,
    /// `[display]` section.
    pub display: DisplaySection,
    /// `[source]` section.
    pub source: SourceSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[service]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Program slot of this installation.
    pub own_app_number: Option<u32>,
    /// Most recent entries kept per query.
    pub max_logs: Option<usize>,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub show_type: Option<bool>,
    pub show_program: Option<bool>,
    pub show_app_number: Option<bool>,
    pub show_timestamp: Option<bool>,
}

/// `[source]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// Console bridge program.
    pub command: Option<String>,
    /// Arguments passed to the console bridge.
    pub args: Option<Vec<String>>,
    /// Saved console dump read instead of running a command.
    pub file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Service --
    pub own_app_number: u32,
    pub max_logs: usize,

    // -- Display --
    pub display: DisplayConfig,

    // -- Source --
    /// Console bridge program, if configured.
    pub source_command: Option<String>,
    /// Console bridge arguments.
    pub source_args: Vec<String>,
    /// Saved console dump, if configured.
    pub source_file: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            own_app_number: constants::DEFAULT_OWN_APP_NUMBER,
            max_logs: constants::DEFAULT_MAX_LOGS,
            display: DisplayConfig::default(),
            source_command: None,
            source_args: vec![constants::CONSOLE_ERROR_LOG_COMMAND.to_string()],
            source_file: None,
            log_level: None,
        }
    }
}

/// Read and parse a config file without validating values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(&config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Service: own_app_number --
    if let Some(app) = raw.service.own_app_number {
        if (1..=constants::MAX_APP_NUMBER).contains(&app) {
            config.own_app_number = app;
        } else {
            warnings.push(out_of_range(
                "service.own_app_number",
                app,
                format!("1-{}", constants::MAX_APP_NUMBER),
                constants::DEFAULT_OWN_APP_NUMBER,
            ));
        }
    }

    // -- Service: max_logs --
    if let Some(max) = raw.service.max_logs {
        if (constants::MIN_MAX_LOGS..=constants::ABSOLUTE_MAX_LOGS).contains(&max) {
            config.max_logs = max;
        } else {
            warnings.push(out_of_range(
                "service.max_logs",
                max,
                format!("{}-{}", constants::MIN_MAX_LOGS, constants::ABSOLUTE_MAX_LOGS),
                constants::DEFAULT_MAX_LOGS,
            ));
        }
    }

    // -- Display --
    let display = &mut config.display;
    if let Some(state) = raw.display.show_type {
        display.show_type = state;
    }
    if let Some(state) = raw.display.show_program {
        display.show_program = state;
    }
    if let Some(state) = raw.display.show_app_number {
        display.show_app_number = state;
    }
    if let Some(state) = raw.display.show_timestamp {
        display.show_timestamp = state;
    }

    // -- Source --
    if let Some(command) = raw.source.command {
        if command.trim().is_empty() {
            warnings.push("[source] command is empty. Ignoring it.".to_string());
        } else {
            config.source_command = Some(command);
        }
    }
    if let Some(args) = raw.source.args {
        config.source_args = args;
    }
    if let Some(file) = raw.source.file {
        if !file.is_empty() {
            config.source_file = Some(PathBuf::from(file));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

fn out_of_range(
    field: &str,
    value: impl ToString,
    expected: String,
    default: impl std::fmt::Display,
) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    };
    format!("{err}. Using default ({default}).")
}
