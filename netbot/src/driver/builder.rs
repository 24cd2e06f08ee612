//! Builder for creating device drivers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::generic::GenericDriver;
use crate::error::{DriverError, PlatformError, Result};
use crate::platform::PlatformRegistry;
use crate::transport::config::{Credentials, HostKeyVerification, SshConfig};

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use netbot::driver::{Driver, DriverBuilder};
/// use netbot::transport::Credentials;
///
/// # async fn example() -> Result<(), netbot::Error> {
/// let mut driver = DriverBuilder::new("192.168.1.1")
///     .credentials(Arc::new(Credentials::password("admin", "secret")))
///     .platform("cisco_ios")
///     .build()?;
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    credentials: Option<Arc<Credentials>>,
    platform_name: Option<String>,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            credentials: None,
            platform_name: None,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login used for the session.
    pub fn credentials(mut self, credentials: Arc<Credentials>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the platform name (e.g., "cisco_ios").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set the connection and command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        let credentials = self.credentials.ok_or_else(|| DriverError::InvalidConfig {
            message: "credentials are required".to_string(),
        })?;

        let name = self.platform_name.ok_or_else(|| DriverError::InvalidConfig {
            message: "platform must be specified".to_string(),
        })?;
        let platform = PlatformRegistry::builtin()
            .get(&name)
            .ok_or(PlatformError::UnknownPlatform { name })?
            .clone();

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            credentials,
            timeout: self.timeout,
            terminal_width: platform.terminal_width,
            terminal_height: platform.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(GenericDriver::new(ssh_config, platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;

    fn creds() -> Arc<Credentials> {
        Arc::new(Credentials::password("admin", "secret"))
    }

    #[test]
    fn test_build_requires_credentials() {
        let err = DriverBuilder::new("10.0.0.1")
            .platform("cisco_ios")
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn test_build_requires_platform() {
        let err = DriverBuilder::new("10.0.0.1")
            .credentials(creds())
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("platform"));
    }

    #[test]
    fn test_build_unknown_platform() {
        let err = DriverBuilder::new("10.0.0.1")
            .credentials(creds())
            .platform("vendor_x")
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::Error::Platform(PlatformError::UnknownPlatform { .. })
        ));
    }

    #[test]
    fn test_build_not_connected() {
        let driver = DriverBuilder::new("10.0.0.1")
            .port(2222)
            .credentials(creds())
            .platform("cisco_nxos")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert!(!driver.is_open());
        assert_eq!(driver.platform().name, "cisco_nxos");
        assert_eq!(driver.ssh_config().socket_addr(), "10.0.0.1:2222");
    }
}
