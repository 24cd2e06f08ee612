//! Error types for netbot.

use std::io;
use thiserror::Error;

/// Main error type for netbot operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Device output could not be turned into a report
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Process configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Chat transport errors
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key does not match the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and strict checking is enabled
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Driver layer errors (command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// Command output matched one of the platform's failure patterns
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// No platform registered under this name
    #[error("Unknown platform: {name}")]
    UnknownPlatform { name: String },

    /// No request profile registered under this driver name
    #[error("Unknown driver: {name}")]
    UnknownDriver { name: String },
}

/// Errors turning CLI output into structured reports.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A field every report needs was not found in the output
    #[error("'{field}' not found in output of '{command}'")]
    MissingField {
        field: &'static str,
        command: &'static str,
    },

    /// Fewer command outputs than the profile issued
    #[error("Expected {expected} command outputs, got {actual}")]
    OutputCount { expected: usize, actual: usize },
}

/// Process configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable not set
    #[error("Missing required setting {var}")]
    Missing { var: &'static str },

    /// Setting present but unusable
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Chat transport errors (Telegram Bot API).
#[derive(Error, Debug)]
pub enum ChatError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API answered with `ok: false`
    #[error("Bot API error {code:?}: {description}")]
    Api {
        code: Option<i32>,
        description: String,
    },
}

/// Result type alias using netbot's Error.
pub type Result<T> = std::result::Result<T, Error>;
