// ErrLogView - app/source.rs
//
// The seam between the query pipeline and whatever issues the console
// command. The service only needs "give me the current error log text";
// how that text is obtained (live console, captured dump, test fixture)
// is up to the implementation.

use crate::util::error::SourceError;

/// Supplies the raw console text of the controller's error log.
pub trait TextSource {
    /// Request the full error log text.
    ///
    /// Callers treat any error as "no text available".
    fn request_console_text(&mut self) -> Result<String, SourceError>;
}

impl<F> TextSource for F
where
    F: FnMut() -> Result<String, SourceError>,
{
    fn request_console_text(&mut self) -> Result<String, SourceError> {
        self()
    }
}

/// A fixed response, returned on every request.
#[derive(Debug, Clone, Default)]
pub struct StaticText(pub String);

impl StaticText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl TextSource for StaticText {
    fn request_console_text(&mut self) -> Result<String, SourceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_source() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            Ok::<_, SourceError>(format!("call {calls}"))
        };
        assert_eq!(source.request_console_text().unwrap(), "call 1");
        assert_eq!(source.request_console_text().unwrap(), "call 2");
    }

    #[test]
    fn test_static_text_repeats() {
        let mut source = StaticText::new("abc");
        assert_eq!(source.request_console_text().unwrap(), "abc");
        assert_eq!(source.request_console_text().unwrap(), "abc");
    }
}
