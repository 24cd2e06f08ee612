//! SSH-backed detector and connector.

use std::sync::Arc;

use log::{debug, warn};

use super::{DeviceConnector, DeviceSession, DialectDetector};
use crate::address::DeviceAddress;
use crate::config::DeviceAccess;
use crate::detect::{Autodetect, probe_commands};
use crate::driver::{Driver, GenericDriver};
use crate::error::{PlatformError, Result};
use crate::profile::{self, RequestProfile};
use crate::report::{Facts, Interfaces};

/// Platform used for the probe session, before the dialect is known.
const PROBE_PLATFORM: &str = "generic";

/// Detects dialects by running probe commands over a generic shell session.
#[derive(Debug, Clone)]
pub struct SshDetector {
    access: Arc<DeviceAccess>,
}

impl SshDetector {
    pub fn new(access: Arc<DeviceAccess>) -> Self {
        Self { access }
    }
}

impl DialectDetector for SshDetector {
    async fn detect(&self, address: &DeviceAddress) -> Result<Option<String>> {
        let mut driver = self
            .access
            .driver_builder(address.as_str())
            .platform(PROBE_PLATFORM)
            .build()?;
        driver.open().await?;

        let detected = probe(&mut driver).await;
        if let Err(e) = driver.close().await {
            warn!("{address}: closing probe session: {e}");
        }

        let detected = detected?;
        debug!("{address}: detected {:?}", detected);
        Ok(detected)
    }
}

async fn probe(driver: &mut GenericDriver) -> Result<Option<String>> {
    let mut autodetect = Autodetect::new();
    for command in probe_commands() {
        let response = driver.send_command(command).await?;
        if autodetect.observe(command, &response.result) {
            break;
        }
    }
    Ok(autodetect.best().map(str::to_string))
}

/// Opens full sessions using the request profile of the resolved driver.
#[derive(Debug, Clone)]
pub struct SshConnector {
    access: Arc<DeviceAccess>,
}

impl SshConnector {
    pub fn new(access: Arc<DeviceAccess>) -> Self {
        Self { access }
    }
}

impl DeviceConnector for SshConnector {
    type Session = SshSession;

    async fn connect(&self, address: &DeviceAddress, driver: &str) -> Result<SshSession> {
        let profile = profile::lookup(driver).ok_or_else(|| PlatformError::UnknownDriver {
            name: driver.to_string(),
        })?;

        let mut device = self
            .access
            .driver_builder(address.as_str())
            .platform(profile.platform())
            .build()?;
        device.open().await?;

        Ok(SshSession {
            driver: device,
            profile,
        })
    }
}

/// Full session driven by a request profile.
pub struct SshSession {
    driver: GenericDriver,
    profile: &'static dyn RequestProfile,
}

impl SshSession {
    /// Run `commands`, failing on the first one the device rejects.
    async fn run(&mut self, commands: &[&str]) -> Result<Vec<String>> {
        self.driver
            .send_commands(commands)
            .await?
            .into_iter()
            .map(|response| response.into_result().map(|r| r.result))
            .collect()
    }
}

impl DeviceSession for SshSession {
    async fn get_facts(&mut self) -> Result<Facts> {
        let commands = self.profile.facts_commands();
        let outputs = self.run(commands).await?;
        let outputs: Vec<&str> = outputs.iter().map(String::as_str).collect();
        self.profile.parse_facts(&outputs)
    }

    async fn get_interfaces(&mut self) -> Result<Interfaces> {
        let commands = self.profile.interfaces_commands();
        let outputs = self.run(commands).await?;
        let outputs: Vec<&str> = outputs.iter().map(String::as_str).collect();
        self.profile.parse_interfaces(&outputs)
    }

    async fn close(mut self) -> Result<()> {
        self.driver.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Credentials;

    fn access() -> Arc<DeviceAccess> {
        Arc::new(DeviceAccess::new(Credentials::password("netops", "s3cret")))
    }

    #[tokio::test]
    async fn test_connect_unknown_driver() {
        let connector = SshConnector::new(access());
        let address = DeviceAddress::parse("10.0.0.1").unwrap();

        let err = connector.connect(&address, "junos").await.err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Platform(PlatformError::UnknownDriver { ref name }) if name == "junos"
        ));
    }

    #[test]
    fn test_probe_platform_registered() {
        assert!(crate::platform::PlatformRegistry::builtin().contains(PROBE_PLATFORM));
    }
}
