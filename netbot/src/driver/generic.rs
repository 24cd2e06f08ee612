//! Generic driver implementation that works with any platform.

use std::time::{Duration, Instant};

use log::{debug, warn};

use super::Driver;
use super::response::Response;
use crate::channel::{DEFAULT_SEARCH_DEPTH, PtyChannel};
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{SshConfig, SshTransport};

/// An open SSH connection and its interactive shell.
struct Session {
    transport: SshTransport,
    channel: PtyChannel,
}

/// Generic driver that works with any platform definition.
///
/// Handles SSH transport management and command execution with prompt
/// detection; everything vendor-specific comes from the
/// [`PlatformDefinition`].
pub struct GenericDriver {
    /// SSH configuration.
    ssh_config: SshConfig,

    /// Platform definition.
    platform: PlatformDefinition,

    /// Open session (None when disconnected).
    session: Option<Session>,

    /// Default timeout for operations.
    timeout: Duration,
}

impl GenericDriver {
    /// Create a new generic driver.
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition) -> Self {
        let timeout = ssh_config.timeout;
        Self {
            ssh_config,
            platform,
            session: None,
            timeout,
        }
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Get the SSH configuration.
    pub fn ssh_config(&self) -> &SshConfig {
        &self.ssh_config
    }

    /// Open the shell channel and wait for the first prompt.
    async fn open_shell(&self, transport: &SshTransport) -> Result<PtyChannel> {
        let mut channel = PtyChannel::new(transport.open_channel().await?, DEFAULT_SEARCH_DEPTH);
        channel
            .read_until_pattern(&self.platform.prompt_pattern, self.timeout)
            .await?;
        Ok(channel)
    }
}

impl Driver for GenericDriver {
    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(&self.ssh_config).await?;
        let channel = match self.open_shell(&transport).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    warn!("{}: close after failed open: {}", self.ssh_config.host, close_err);
                }
                return Err(e);
            }
        };
        self.session = Some(Session { transport, channel });
        debug!(
            "{}: session open (platform {})",
            self.ssh_config.host, self.platform.name
        );

        for cmd in self.platform.on_open_commands.clone() {
            match self.send_command(&cmd).await {
                Ok(response) if !response.is_success() => {
                    debug!("{}: on_open '{}' rejected", self.ssh_config.host, cmd);
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = self.close().await;
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };

        if let Err(e) = session.channel.close().await {
            debug!("{}: channel close: {}", self.ssh_config.host, e);
        }
        session.transport.close().await?;
        debug!("{}: session closed", self.ssh_config.host);
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let session = self.session.as_mut().ok_or(DriverError::NotConnected)?;

        let start = Instant::now();
        session.channel.send(command).await?;
        let data = session
            .channel
            .read_until_pattern(&self.platform.prompt_pattern, self.timeout)
            .await?;
        let elapsed = start.elapsed();

        let raw_result = String::from_utf8_lossy(&data).into_owned();
        let prompt = self
            .platform
            .prompt_pattern
            .find(&data)
            .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
            .unwrap_or_default();

        let result = self.platform.normalize_output(&raw_result, command);
        let failure = self.platform.detect_failure(&result).map(str::to_string);

        let response = Response::new(command, result, raw_result, prompt, elapsed);
        Ok(match failure {
            Some(message) => response.with_failure(message),
            None => response,
        })
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }
}
