// ErrLogView - platform/console.rs
//
// Text sources backed by the operating system: a captured error-log dump
// on disk, standard input, or an external program that talks to the
// controller console (an SSH or telnet wrapper issuing `ERR`) and prints
// the reply.

use crate::app::source::TextSource;
use crate::util::error::SourceError;
use std::io::Read;
use std::path::PathBuf;
use std::process::Command;

/// Reads a saved console reply from a file on every request.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextSource for FileSource {
    fn request_console_text(&mut self) -> Result<String, SourceError> {
        let bytes = std::fs::read(&self.path).map_err(|source| SourceError::Io {
            path: Some(self.path.clone()),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Read console dump");
        // Console replies are ASCII in practice; tolerate stray bytes.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Reads the whole of standard input once; later requests return the same text.
#[derive(Debug, Default)]
pub struct StdinSource {
    buffered: Option<String>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextSource for StdinSource {
    fn request_console_text(&mut self) -> Result<String, SourceError> {
        if let Some(text) = &self.buffered {
            return Ok(text.clone());
        }
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|source| SourceError::Io { path: None, source })?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.buffered = Some(text.clone());
        Ok(text)
    }
}

/// Runs an external console bridge and captures its stdout.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl TextSource for CommandSource {
    fn request_console_text(&mut self) -> Result<String, SourceError> {
        tracing::debug!(program = %self.program, args = ?self.args, "Requesting console text");
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                program: self.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
