//! Fact and interface collection.

use std::future::Future;
use std::sync::Arc;

use crate::address::DeviceAddress;
use crate::config::DeviceAccess;
use crate::error::Result;
use crate::report::{Facts, Interfaces};
use crate::session::{
    DeviceConnector, DialectDetector, DialectMap, Resolution, SessionResolver, SshConnector,
    SshDetector,
};

/// Result of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected<T> {
    Report(T),
    /// The device dialect has no driver.
    Unsupported,
}

/// Retrieves reports for a device address.
pub trait Collector: Send + Sync {
    /// Identity facts of the device at `address`.
    fn collect_facts(
        &self,
        address: &DeviceAddress,
    ) -> impl Future<Output = Result<Collected<Facts>>> + Send;

    /// Every interface of the device at `address`, working or not.
    fn collect_interfaces(
        &self,
        address: &DeviceAddress,
    ) -> impl Future<Output = Result<Collected<Interfaces>>> + Send;
}

/// Collector resolving a fresh session for every call.
pub struct DeviceCollector<D, C> {
    resolver: SessionResolver<D, C>,
}

impl<D: DialectDetector, C: DeviceConnector> DeviceCollector<D, C> {
    pub fn new(resolver: SessionResolver<D, C>) -> Self {
        Self { resolver }
    }
}

impl DeviceCollector<SshDetector, SshConnector> {
    /// Collector over SSH with the built-in dialect map.
    pub fn ssh(access: DeviceAccess) -> Self {
        let access = Arc::new(access);
        Self::new(SessionResolver::new(
            DialectMap::default(),
            SshDetector::new(access.clone()),
            SshConnector::new(access),
        ))
    }
}

impl<D: DialectDetector, C: DeviceConnector> Collector for DeviceCollector<D, C> {
    async fn collect_facts(&self, address: &DeviceAddress) -> Result<Collected<Facts>> {
        match self.resolver.resolve(address).await? {
            Resolution::Resolved(handle) => Ok(Collected::Report(handle.facts().await?)),
            Resolution::Unsupported { .. } => Ok(Collected::Unsupported),
        }
    }

    async fn collect_interfaces(&self, address: &DeviceAddress) -> Result<Collected<Interfaces>> {
        match self.resolver.resolve(address).await? {
            Resolution::Resolved(handle) => Ok(Collected::Report(handle.interfaces().await?)),
            Resolution::Unsupported { .. } => Ok(Collected::Unsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, FakeConnector, FakeDetector, sample_facts, sample_interfaces};

    fn collector(
        dialect: Option<&'static str>,
        log: &CallLog,
    ) -> DeviceCollector<FakeDetector, FakeConnector> {
        DeviceCollector::new(SessionResolver::new(
            DialectMap::default(),
            FakeDetector::new(dialect, log),
            FakeConnector::new(log),
        ))
    }

    fn addr() -> DeviceAddress {
        DeviceAddress::parse("192.168.0.10").unwrap()
    }

    #[tokio::test]
    async fn test_collect_facts() {
        let log = CallLog::default();
        let collected = collector(Some("cisco_ios"), &log)
            .collect_facts(&addr())
            .await
            .unwrap();

        assert_eq!(collected, Collected::Report(sample_facts()));
        assert_eq!(
            log.events(),
            [
                "detect 192.168.0.10",
                "connect 192.168.0.10 ios",
                "get_facts",
                "close"
            ]
        );
    }

    #[tokio::test]
    async fn test_collect_interfaces_returns_all() {
        let log = CallLog::default();
        let collected = collector(Some("cisco_nxos"), &log)
            .collect_interfaces(&addr())
            .await
            .unwrap();

        // Filtering for display happens downstream
        assert_eq!(collected, Collected::Report(sample_interfaces()));
    }

    #[tokio::test]
    async fn test_collect_unsupported() {
        let log = CallLog::default();
        let collector = collector(Some("juniper_junos"), &log);

        assert_eq!(
            collector.collect_facts(&addr()).await.unwrap(),
            Collected::Unsupported
        );
        assert_eq!(
            collector.collect_interfaces(&addr()).await.unwrap(),
            Collected::Unsupported
        );
        assert_eq!(log.count("connect"), 0);
    }

    #[tokio::test]
    async fn test_each_call_resolves_again() {
        let log = CallLog::default();
        let collector = collector(Some("cisco_ios"), &log);

        collector.collect_facts(&addr()).await.unwrap();
        collector.collect_facts(&addr()).await.unwrap();

        assert_eq!(log.count("detect"), 2);
        assert_eq!(log.count("connect"), 2);
        assert_eq!(log.count("close"), 2);
    }

    #[tokio::test]
    async fn test_retrieval_failure_propagates() {
        let log = CallLog::default();
        let collector = DeviceCollector::new(SessionResolver::new(
            DialectMap::default(),
            FakeDetector::new(Some("cisco_ios"), &log),
            FakeConnector {
                fail_retrieval: true,
                ..FakeConnector::new(&log)
            },
        ));

        assert!(collector.collect_facts(&addr()).await.is_err());
        assert_eq!(log.count("close"), 1);
    }
}
