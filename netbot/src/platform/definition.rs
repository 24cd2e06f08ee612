//! Platform definition for vendor-specific session settings.

use memchr::memrchr;
use regex::bytes::Regex;

use crate::error::{PlatformError, Result};

/// Everything the driver needs to know to hold a CLI session with one
/// family of devices.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "cisco_ios", "cisco_nxos").
    pub name: String,

    /// Pattern matching the device prompt at the end of output.
    pub prompt_pattern: Regex,

    /// Patterns that indicate command failure.
    pub failed_when_contains: Vec<String>,

    /// Commands to run when connection is established.
    pub on_open_commands: Vec<String>,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a new platform definition from a name and prompt regex.
    pub fn new(name: impl Into<String>, prompt_pattern: &str) -> Result<Self> {
        let name = name.into();
        let prompt_pattern =
            Regex::new(prompt_pattern).map_err(|e| PlatformError::InvalidDefinition {
                message: format!("{name}: bad prompt pattern: {e}"),
            })?;

        Ok(Self {
            name,
            prompt_pattern,
            failed_when_contains: vec![],
            on_open_commands: vec![],
            terminal_width: 511,
            terminal_height: 24,
        })
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Return the first failure pattern contained in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Normalize command output: strip the command echo and the trailing prompt line.
    pub fn normalize_output(&self, raw: &str, command: &str) -> String {
        let output = raw.trim_start_matches(['\r', '\n']);
        let output = output
            .strip_prefix(command)
            .unwrap_or(output)
            .trim_start_matches(['\r', '\n']);

        match memrchr(b'\n', output.as_bytes()) {
            Some(pos) => output[..pos].to_string(),
            // Only the prompt came back
            None if self.prompt_pattern.is_match(output.as_bytes()) => String::new(),
            None => output.to_string(),
        }
    }
}
