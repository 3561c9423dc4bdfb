// ErrLogView - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// presentation state. These types are the shared vocabulary across all layers.

use crate::util::error::ArgError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

// =============================================================================
// Log Entry (output of extraction)
// =============================================================================

/// A single record recovered from the console error log.
///
/// Entries carry no presentation state. Rendering takes the display
/// configuration explicitly, see [`LogEntry::display`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Severity of the record.
    #[serde(rename = "type")]
    pub entry_type: LogEntryType,

    /// Executable that raised the record, as written (e.g. `MyApp.exe`).
    pub program: String,

    /// Program slot that owns the record.
    pub app_number: u32,

    /// Local controller time; the console does not report a timezone.
    pub timestamp: NaiveDateTime,

    /// Message text, including indented stack-trace continuation lines.
    pub message: String,
}

// =============================================================================
// LogEntryType
// =============================================================================

/// Severity of a console log record.
///
/// Discriminants are bit flags so that a set of severities can be combined
/// into a [`TypeMask`] for filtering. A single entry always holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u32)]
pub enum LogEntryType {
    Notice = 1,
    Ok = 2,
    Info = 4,
    Warning = 8,
    Error = 16,
    Fatal = 32,
}

impl LogEntryType {
    /// Returns all variants in flag order.
    pub fn all() -> &'static [LogEntryType] {
        &[
            LogEntryType::Notice,
            LogEntryType::Ok,
            LogEntryType::Info,
            LogEntryType::Warning,
            LogEntryType::Error,
            LogEntryType::Fatal,
        ]
    }

    /// Name as written by the console (and used when rendering).
    pub fn label(&self) -> &'static str {
        match self {
            LogEntryType::Notice => "Notice",
            LogEntryType::Ok => "Ok",
            LogEntryType::Info => "Info",
            LogEntryType::Warning => "Warning",
            LogEntryType::Error => "Error",
            LogEntryType::Fatal => "Fatal",
        }
    }

    /// Flag value of this severity.
    pub fn bits(&self) -> u32 {
        *self as u32
    }
}

impl std::fmt::Display for LogEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when text does not name one of the six severities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntryType(pub String);

impl std::fmt::Display for UnknownEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown log entry type '{}'", self.0)
    }
}

impl std::error::Error for UnknownEntryType {}

impl FromStr for LogEntryType {
    type Err = UnknownEntryType;

    /// Case-insensitive match against the six severity names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogEntryType::all()
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEntryType(s.to_string()))
    }
}

// =============================================================================
// TypeMask
// =============================================================================

/// Any combination of [`LogEntryType`] flags, used to filter by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeMask(u32);

impl TypeMask {
    /// Matches nothing.
    pub const NONE: TypeMask = TypeMask(0);

    /// Matches every severity.
    pub const ALL: TypeMask = TypeMask(0b11_1111);

    /// Build a mask from raw bits, dropping bits that name no severity.
    pub fn from_bits_truncate(bits: u32) -> Self {
        TypeMask(bits & Self::ALL.0)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if `entry_type`'s flag is set in this mask.
    pub fn contains(&self, entry_type: LogEntryType) -> bool {
        self.0 & entry_type.bits() != 0
    }

    /// Severities present in this mask, in flag order.
    pub fn types(&self) -> impl Iterator<Item = LogEntryType> + '_ {
        LogEntryType::all()
            .iter()
            .copied()
            .filter(move |t| self.contains(*t))
    }
}

impl From<LogEntryType> for TypeMask {
    fn from(t: LogEntryType) -> Self {
        TypeMask(t.bits())
    }
}

impl BitOr for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 | rhs.0)
    }
}

impl BitOr<LogEntryType> for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: LogEntryType) -> TypeMask {
        TypeMask(self.0 | rhs.bits())
    }
}

impl BitOr for LogEntryType {
    type Output = TypeMask;

    fn bitor(self, rhs: LogEntryType) -> TypeMask {
        TypeMask(self.bits() | rhs.bits())
    }
}

impl BitOrAssign<LogEntryType> for TypeMask {
    fn bitor_assign(&mut self, rhs: LogEntryType) {
        self.0 |= rhs.bits();
    }
}

impl FromStr for TypeMask {
    type Err = ArgError;

    /// Accepts either a decimal mask (`"24"`) or a comma-separated list of
    /// severity names (`"warning,error"`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(bits) = trimmed.parse::<u32>() {
            return Ok(TypeMask::from_bits_truncate(bits));
        }

        let mut mask = TypeMask::NONE;
        for token in trimmed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let t = token
                .parse::<LogEntryType>()
                .map_err(|_| ArgError::InvalidTypeMask {
                    input: s.to_string(),
                    token: token.to_string(),
                })?;
            mask |= t;
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_parse_is_case_insensitive() {
        assert_eq!("warning".parse::<LogEntryType>(), Ok(LogEntryType::Warning));
        assert_eq!("FATAL".parse::<LogEntryType>(), Ok(LogEntryType::Fatal));
        assert_eq!("oK".parse::<LogEntryType>(), Ok(LogEntryType::Ok));
        assert!("Debug".parse::<LogEntryType>().is_err());
    }

    #[test]
    fn test_entry_type_bits_match_console_flags() {
        let bits: Vec<u32> = LogEntryType::all().iter().map(|t| t.bits()).collect();
        assert_eq!(bits, vec![1, 2, 4, 8, 16, 32]);
    }

    #[test]
    fn test_mask_membership() {
        let mask = LogEntryType::Warning | LogEntryType::Error;
        assert_eq!(mask.bits(), 24);
        assert!(mask.contains(LogEntryType::Warning));
        assert!(mask.contains(LogEntryType::Error));
        for t in [
            LogEntryType::Notice,
            LogEntryType::Ok,
            LogEntryType::Info,
            LogEntryType::Fatal,
        ] {
            assert!(!mask.contains(t), "{t} should not be in the mask");
        }
    }

    #[test]
    fn test_mask_from_bits_truncates_unknown_flags() {
        let mask = TypeMask::from_bits_truncate(64 | 1);
        assert_eq!(mask, TypeMask::from(LogEntryType::Notice));
        assert!(TypeMask::from_bits_truncate(0).is_empty());
    }

    #[test]
    fn test_mask_parse_names_and_numbers() {
        assert_eq!("24".parse::<TypeMask>().unwrap().bits(), 24);
        let mask: TypeMask = "Warning, error".parse().unwrap();
        assert_eq!(
            mask.types().collect::<Vec<_>>(),
            vec![LogEntryType::Warning, LogEntryType::Error]
        );
        assert!("warning,verbose".parse::<TypeMask>().is_err());
    }
}
