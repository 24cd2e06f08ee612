//! Device session resolution.
//!
//! Resolving an address is a two step pipeline: a probe session detects the
//! device dialect, the [`DialectMap`] turns that into a driver identifier,
//! and only then is a full session opened with that driver. The result is a
//! [`Resolution`]: either a [`CapabilityHandle`] good for one retrieval, or
//! `Unsupported` when the dialect has no driver.

mod ssh;

pub use ssh::{SshConnector, SshDetector, SshSession};

use std::future::Future;

use indexmap::IndexMap;
use log::{info, warn};

use crate::address::DeviceAddress;
use crate::error::Result;
use crate::report::{Facts, Interfaces};

/// Detects the command dialect of a device.
pub trait DialectDetector: Send + Sync {
    /// Best guess at the dialect of `address`, `None` if nothing matched.
    ///
    /// Any session opened for probing is closed before this returns.
    fn detect(
        &self,
        address: &DeviceAddress,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// An open session able to retrieve structured reports.
pub trait DeviceSession: Send {
    fn get_facts(&mut self) -> impl Future<Output = Result<Facts>> + Send;

    fn get_interfaces(&mut self) -> impl Future<Output = Result<Interfaces>> + Send;

    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens full sessions for a resolved driver.
pub trait DeviceConnector: Send + Sync {
    type Session: DeviceSession;

    fn connect(
        &self,
        address: &DeviceAddress,
        driver: &str,
    ) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Detected dialect to driver identifier.
#[derive(Debug, Clone)]
pub struct DialectMap {
    drivers: IndexMap<String, String>,
}

impl DialectMap {
    /// Driver for `dialect`, if it is supported.
    pub fn driver_for(&self, dialect: &str) -> Option<&str> {
        self.drivers.get(dialect).map(String::as_str)
    }

    /// Supported dialects.
    pub fn dialects(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }
}

impl Default for DialectMap {
    fn default() -> Self {
        [("cisco_ios", "ios"), ("cisco_nxos", "nxos_ssh")]
            .into_iter()
            .collect()
    }
}

impl<D: Into<String>, R: Into<String>> FromIterator<(D, R)> for DialectMap {
    fn from_iter<I: IntoIterator<Item = (D, R)>>(iter: I) -> Self {
        Self {
            drivers: iter
                .into_iter()
                .map(|(dialect, driver)| (dialect.into(), driver.into()))
                .collect(),
        }
    }
}

/// An open session bound to one device and one driver.
///
/// Good for exactly one retrieval: both retrieval methods consume the handle
/// and close the session afterwards, whether or not the retrieval worked.
pub struct CapabilityHandle<S: DeviceSession> {
    address: DeviceAddress,
    driver: String,
    session: S,
}

impl<S: DeviceSession> CapabilityHandle<S> {
    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Retrieve identity facts, then close.
    pub async fn facts(mut self) -> Result<Facts> {
        let facts = self.session.get_facts().await;
        self.release().await;
        facts
    }

    /// Retrieve the interface table, then close.
    pub async fn interfaces(mut self) -> Result<Interfaces> {
        let interfaces = self.session.get_interfaces().await;
        self.release().await;
        interfaces
    }

    async fn release(self) {
        if let Err(e) = self.session.close().await {
            warn!("{}: closing {} session: {}", self.address, self.driver, e);
        }
    }
}

/// Outcome of resolving an address.
pub enum Resolution<S: DeviceSession> {
    Resolved(CapabilityHandle<S>),
    /// No driver for the device. `dialect` is what detection reported.
    Unsupported { dialect: Option<String> },
}

/// Detect, map, connect.
pub struct SessionResolver<D, C> {
    dialects: DialectMap,
    detector: D,
    connector: C,
}

impl<D: DialectDetector, C: DeviceConnector> SessionResolver<D, C> {
    pub fn new(dialects: DialectMap, detector: D, connector: C) -> Self {
        Self {
            dialects,
            detector,
            connector,
        }
    }

    pub fn dialects(&self) -> &DialectMap {
        &self.dialects
    }

    /// Resolve `address` to an open capability handle.
    ///
    /// Unmapped or undetected dialects yield [`Resolution::Unsupported`]
    /// without a second session. Probe and connect failures propagate.
    pub async fn resolve(&self, address: &DeviceAddress) -> Result<Resolution<C::Session>> {
        info!("{address}: detecting dialect");
        let Some(dialect) = self.detector.detect(address).await? else {
            info!("{address}: dialect not recognised");
            return Ok(Resolution::Unsupported { dialect: None });
        };

        let Some(driver) = self.dialects.driver_for(&dialect) else {
            info!("{address}: dialect {dialect} has no driver");
            return Ok(Resolution::Unsupported {
                dialect: Some(dialect),
            });
        };

        info!("{address}: dialect {dialect}, opening {driver} session");
        let session = self.connector.connect(address, driver).await?;

        Ok(Resolution::Resolved(CapabilityHandle {
            address: address.clone(),
            driver: driver.to_string(),
            session,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, FakeConnector, FakeDetector, sample_facts};

    fn addr() -> DeviceAddress {
        DeviceAddress::parse("10.0.0.1").unwrap()
    }

    fn resolver(
        dialect: Option<&'static str>,
        log: &CallLog,
    ) -> SessionResolver<FakeDetector, FakeConnector> {
        SessionResolver::new(
            DialectMap::default(),
            FakeDetector::new(dialect, log),
            FakeConnector::new(log),
        )
    }

    #[test]
    fn test_builtin_dialect_map() {
        let map = DialectMap::default();
        assert_eq!(map.driver_for("cisco_ios"), Some("ios"));
        assert_eq!(map.driver_for("cisco_nxos"), Some("nxos_ssh"));
        assert_eq!(map.driver_for("juniper_junos"), None);
        assert_eq!(map.dialects().collect::<Vec<_>>(), ["cisco_ios", "cisco_nxos"]);
    }

    #[tokio::test]
    async fn test_unmapped_dialects_never_connect() {
        for dialect in ["juniper_junos", "arista_eos", "linux", "cisco_xr", ""] {
            let log = CallLog::default();
            let resolution = resolver(Some(dialect), &log).resolve(&addr()).await.unwrap();

            assert!(matches!(
                resolution,
                Resolution::Unsupported { dialect: Some(ref d) } if d == dialect
            ));
            assert_eq!(log.count("connect"), 0, "dialect {dialect}");
        }
    }

    #[tokio::test]
    async fn test_undetected_is_unsupported() {
        let log = CallLog::default();
        let resolution = resolver(None, &log).resolve(&addr()).await.unwrap();

        assert!(matches!(resolution, Resolution::Unsupported { dialect: None }));
        assert_eq!(log.events(), ["detect 10.0.0.1"]);
    }

    #[tokio::test]
    async fn test_mapped_dialect_connects_with_driver() {
        let log = CallLog::default();
        let resolution = resolver(Some("cisco_nxos"), &log)
            .resolve(&addr())
            .await
            .unwrap();

        let Resolution::Resolved(handle) = resolution else {
            panic!("expected a handle");
        };
        assert_eq!(handle.driver(), "nxos_ssh");
        assert_eq!(handle.address().as_str(), "10.0.0.1");
        assert_eq!(log.events(), ["detect 10.0.0.1", "connect 10.0.0.1 nxos_ssh"]);
    }

    #[tokio::test]
    async fn test_probe_failure_propagates() {
        let log = CallLog::default();
        let mut resolver = resolver(Some("cisco_ios"), &log);
        resolver.detector.fail = true;

        assert!(resolver.resolve(&addr()).await.is_err());
        assert_eq!(log.count("connect"), 0);
    }

    #[tokio::test]
    async fn test_connect_failure_propagates() {
        let log = CallLog::default();
        let mut resolver = resolver(Some("cisco_ios"), &log);
        resolver.connector.fail_connect = true;

        assert!(resolver.resolve(&addr()).await.is_err());
    }

    #[tokio::test]
    async fn test_handle_closes_after_retrieval() {
        let log = CallLog::default();
        let Resolution::Resolved(handle) = resolver(Some("cisco_ios"), &log)
            .resolve(&addr())
            .await
            .unwrap()
        else {
            panic!("expected a handle");
        };

        assert_eq!(handle.facts().await.unwrap(), sample_facts());
        assert_eq!(
            log.events(),
            ["detect 10.0.0.1", "connect 10.0.0.1 ios", "get_facts", "close"]
        );
    }

    #[tokio::test]
    async fn test_handle_closes_after_failed_retrieval() {
        let log = CallLog::default();
        let mut resolver = resolver(Some("cisco_ios"), &log);
        resolver.connector.fail_retrieval = true;
        let Resolution::Resolved(handle) = resolver.resolve(&addr()).await.unwrap() else {
            panic!("expected a handle");
        };

        assert!(handle.interfaces().await.is_err());
        assert_eq!(log.events()[2..], ["get_interfaces", "close"]);
    }

    #[tokio::test]
    async fn test_close_failure_does_not_mask_report() {
        let log = CallLog::default();
        let mut resolver = resolver(Some("cisco_ios"), &log);
        resolver.connector.fail_close = true;
        let Resolution::Resolved(handle) = resolver.resolve(&addr()).await.unwrap() else {
            panic!("expected a handle");
        };

        let interfaces = handle.interfaces().await.unwrap();
        assert_eq!(interfaces.len(), 3);
        assert_eq!(log.count("close"), 1);
    }
}
