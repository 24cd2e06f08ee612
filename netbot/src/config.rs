//! Process configuration.
//!
//! Everything is injected through `NETBOT_*` environment variables:
//!
//! | Variable | Default |
//! |---|---|
//! | `NETBOT_TELEGRAM_TOKEN` | required |
//! | `NETBOT_TELEGRAM_API_URL` | `https://api.telegram.org` |
//! | `NETBOT_POLL_TIMEOUT_SECS` | `30` |
//! | `NETBOT_DEVICE_USERNAME` | required |
//! | `NETBOT_DEVICE_PASSWORD` | one of password or key required |
//! | `NETBOT_DEVICE_KEY` / `NETBOT_DEVICE_KEY_PASSPHRASE` | |
//! | `NETBOT_SSH_PORT` | `22` |
//! | `NETBOT_SSH_TIMEOUT_SECS` | `30` |
//! | `NETBOT_HOST_KEY_CHECKING` | `accept-new` |
//! | `NETBOT_KNOWN_HOSTS` | `~/.ssh/known_hosts` |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::driver::DriverBuilder;
use crate::error::{ConfigError, Result};
use crate::transport::{Credentials, HostKeyVerification};

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API settings.
#[derive(Debug)]
pub struct TelegramConfig {
    /// Bot token from BotFather.
    pub token: SecretString,

    /// Bot API base URL, without the `/bot<token>` suffix.
    pub api_url: String,

    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

/// How device sessions are opened.
///
/// Shared by the detection probe and the full session so both log in the
/// same way.
#[derive(Debug, Clone)]
pub struct DeviceAccess {
    pub credentials: Arc<Credentials>,
    pub port: u16,
    pub timeout: Duration,
    pub host_key_verification: HostKeyVerification,
    pub known_hosts_path: Option<PathBuf>,
}

impl DeviceAccess {
    /// Access with default port, timeout and host key policy.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            port: 22,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Driver builder for `host` carrying these settings.
    pub fn driver_builder(&self, host: &str) -> DriverBuilder {
        let builder = DriverBuilder::new(host)
            .port(self.port)
            .credentials(self.credentials.clone())
            .timeout(self.timeout)
            .host_key_verification(self.host_key_verification);

        match &self.known_hosts_path {
            Some(path) => builder.known_hosts_path(path.clone()),
            None => builder,
        }
    }
}

/// Complete bot configuration.
#[derive(Debug)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub device: DeviceAccess,
}

impl BotConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let required = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });

        let telegram = TelegramConfig {
            token: SecretString::from(required("NETBOT_TELEGRAM_TOKEN")?),
            api_url: get("NETBOT_TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            poll_timeout: Duration::from_secs(parse_or(&get, "NETBOT_POLL_TIMEOUT_SECS", 30)?),
        };

        let username = required("NETBOT_DEVICE_USERNAME")?;
        let credentials = match (get("NETBOT_DEVICE_PASSWORD"), get("NETBOT_DEVICE_KEY")) {
            (Some(password), _) => Credentials::password(username, password),
            (None, Some(key)) => {
                Credentials::private_key(username, key, get("NETBOT_DEVICE_KEY_PASSPHRASE"))
            }
            (None, None) => {
                return Err(ConfigError::Missing {
                    var: "NETBOT_DEVICE_PASSWORD",
                }
                .into());
            }
        };

        let device = DeviceAccess {
            credentials: Arc::new(credentials),
            port: parse_or(&get, "NETBOT_SSH_PORT", 22)?,
            timeout: Duration::from_secs(parse_or(&get, "NETBOT_SSH_TIMEOUT_SECS", 30)?),
            host_key_verification: parse_or(
                &get,
                "NETBOT_HOST_KEY_CHECKING",
                HostKeyVerification::default(),
            )?,
            known_hosts_path: get("NETBOT_KNOWN_HOSTS").map(PathBuf::from),
        };

        Ok(Self { telegram, device })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> std::result::Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::transport::AuthMethod;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_minimal_password_config() {
        let config = load(&[
            ("NETBOT_TELEGRAM_TOKEN", "123:abc"),
            ("NETBOT_DEVICE_USERNAME", "netops"),
            ("NETBOT_DEVICE_PASSWORD", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.telegram.token.expose_secret(), "123:abc");
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.telegram.poll_timeout, Duration::from_secs(30));
        assert_eq!(config.device.credentials.username, "netops");
        assert!(matches!(
            &config.device.credentials.auth,
            AuthMethod::Password(p) if p.expose_secret() == "s3cret"
        ));
        assert_eq!(config.device.port, 22);
        assert_eq!(config.device.timeout, Duration::from_secs(30));
        assert_eq!(
            config.device.host_key_verification,
            HostKeyVerification::AcceptNew
        );
        assert!(config.device.known_hosts_path.is_none());
    }

    #[test]
    fn test_key_config_with_overrides() {
        let config = load(&[
            ("NETBOT_TELEGRAM_TOKEN", "123:abc"),
            ("NETBOT_TELEGRAM_API_URL", "http://localhost:8081/"),
            ("NETBOT_POLL_TIMEOUT_SECS", "5"),
            ("NETBOT_DEVICE_USERNAME", "netops"),
            ("NETBOT_DEVICE_KEY", "/etc/netbot/id_ed25519"),
            ("NETBOT_SSH_PORT", "2222"),
            ("NETBOT_SSH_TIMEOUT_SECS", "10"),
            ("NETBOT_HOST_KEY_CHECKING", "strict"),
            ("NETBOT_KNOWN_HOSTS", "/etc/netbot/known_hosts"),
        ])
        .unwrap();

        assert_eq!(config.telegram.api_url, "http://localhost:8081");
        assert_eq!(config.telegram.poll_timeout, Duration::from_secs(5));
        assert!(matches!(
            &config.device.credentials.auth,
            AuthMethod::PrivateKey { path, passphrase: None }
                if path == &PathBuf::from("/etc/netbot/id_ed25519")
        ));
        assert_eq!(config.device.port, 2222);
        assert_eq!(config.device.timeout, Duration::from_secs(10));
        assert_eq!(config.device.host_key_verification, HostKeyVerification::Strict);
        assert_eq!(
            config.device.known_hosts_path,
            Some(PathBuf::from("/etc/netbot/known_hosts"))
        );
    }

    #[test]
    fn test_missing_token() {
        let err = load(&[
            ("NETBOT_DEVICE_USERNAME", "netops"),
            ("NETBOT_DEVICE_PASSWORD", "s3cret"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("NETBOT_TELEGRAM_TOKEN"));
    }

    #[test]
    fn test_missing_device_secret() {
        let err = load(&[
            ("NETBOT_TELEGRAM_TOKEN", "123:abc"),
            ("NETBOT_DEVICE_USERNAME", "netops"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("NETBOT_DEVICE_PASSWORD"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = load(&[
            ("NETBOT_TELEGRAM_TOKEN", "  "),
            ("NETBOT_DEVICE_USERNAME", "netops"),
            ("NETBOT_DEVICE_PASSWORD", "s3cret"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("NETBOT_TELEGRAM_TOKEN"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("NETBOT_TELEGRAM_TOKEN", "123:abc"),
            ("NETBOT_DEVICE_USERNAME", "netops"),
            ("NETBOT_DEVICE_PASSWORD", "s3cret"),
            ("NETBOT_SSH_PORT", "ssh"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("NETBOT_SSH_PORT"));
    }

    #[test]
    fn test_driver_builder_carries_settings() {
        let mut access = DeviceAccess::new(Credentials::password("netops", "s3cret"));
        access.port = 830;
        let driver = access
            .driver_builder("10.0.0.1")
            .platform("cisco_ios")
            .build()
            .unwrap();
        assert_eq!(driver.ssh_config().socket_addr(), "10.0.0.1:830");
        assert_eq!(driver.ssh_config().username(), "netops");
    }
}
