//! In-memory collaborators for unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::address::DeviceAddress;
use crate::chat::{ChatId, Outbox, Reply};
use crate::collector::{Collected, Collector};
use crate::error::{ParseError, Result, TransportError};
use crate::report::{Facts, Interface, Interfaces};
use crate::session::{DeviceConnector, DeviceSession, DialectDetector};

/// Ordered record of calls made against the fakes.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

fn unreachable_device() -> crate::Error {
    TransportError::Timeout(Duration::from_secs(30)).into()
}

/// Detector answering with a fixed dialect.
pub struct FakeDetector {
    pub dialect: Option<&'static str>,
    pub fail: bool,
    pub log: CallLog,
}

impl FakeDetector {
    pub fn new(dialect: Option<&'static str>, log: &CallLog) -> Self {
        Self {
            dialect,
            fail: false,
            log: log.clone(),
        }
    }
}

impl DialectDetector for FakeDetector {
    async fn detect(&self, address: &DeviceAddress) -> Result<Option<String>> {
        self.log.push(format!("detect {address}"));
        if self.fail {
            return Err(unreachable_device());
        }
        Ok(self.dialect.map(str::to_string))
    }
}

/// Connector handing out [`FakeSession`]s.
#[derive(Default)]
pub struct FakeConnector {
    pub log: CallLog,
    pub fail_connect: bool,
    pub fail_retrieval: bool,
    pub fail_close: bool,
}

impl FakeConnector {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            ..Self::default()
        }
    }
}

impl DeviceConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, address: &DeviceAddress, driver: &str) -> Result<FakeSession> {
        self.log.push(format!("connect {address} {driver}"));
        if self.fail_connect {
            return Err(unreachable_device());
        }
        Ok(FakeSession {
            log: self.log.clone(),
            fail_retrieval: self.fail_retrieval,
            fail_close: self.fail_close,
        })
    }
}

pub struct FakeSession {
    log: CallLog,
    fail_retrieval: bool,
    fail_close: bool,
}

impl DeviceSession for FakeSession {
    async fn get_facts(&mut self) -> Result<Facts> {
        self.log.push("get_facts");
        if self.fail_retrieval {
            return Err(ParseError::MissingField {
                field: "hostname",
                command: "show version",
            }
            .into());
        }
        Ok(sample_facts())
    }

    async fn get_interfaces(&mut self) -> Result<Interfaces> {
        self.log.push("get_interfaces");
        if self.fail_retrieval {
            return Err(unreachable_device());
        }
        Ok(sample_interfaces())
    }

    async fn close(self) -> Result<()> {
        self.log.push("close");
        if self.fail_close {
            return Err(unreachable_device());
        }
        Ok(())
    }
}

/// What a [`FakeCollector`] answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Supported,
    Unsupported,
    Fail,
}

/// Collector that skips sessions entirely.
pub struct FakeCollector {
    pub outcome: Outcome,
    pub log: CallLog,
}

impl FakeCollector {
    pub fn new(outcome: Outcome, log: &CallLog) -> Self {
        Self {
            outcome,
            log: log.clone(),
        }
    }

    fn answer<T>(&self, report: impl FnOnce() -> T) -> Result<Collected<T>> {
        match self.outcome {
            Outcome::Supported => Ok(Collected::Report(report())),
            Outcome::Unsupported => Ok(Collected::Unsupported),
            Outcome::Fail => Err(unreachable_device()),
        }
    }
}

impl Collector for FakeCollector {
    async fn collect_facts(&self, address: &DeviceAddress) -> Result<Collected<Facts>> {
        self.log.push(format!("facts {address}"));
        self.answer(sample_facts)
    }

    async fn collect_interfaces(&self, address: &DeviceAddress) -> Result<Collected<Interfaces>> {
        self.log.push(format!("interfaces {address}"));
        self.answer(sample_interfaces)
    }
}

/// Outbox keeping every reply in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutbox(Arc<Mutex<Vec<(ChatId, Reply)>>>);

impl RecordingOutbox {
    pub fn sent(&self) -> Vec<(ChatId, Reply)> {
        self.0.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, reply)| reply.text).collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl Outbox for RecordingOutbox {
    async fn send(&self, chat: ChatId, reply: Reply) -> Result<()> {
        self.0.lock().unwrap().push((chat, reply));
        Ok(())
    }
}

pub fn sample_facts() -> Facts {
    Facts {
        hostname: "edge-sw01".to_string(),
        serial_number: "FOC1932X0K1".to_string(),
        vendor: "Cisco".to_string(),
        model: "WS-C2960X-48TS-L".to_string(),
        os_version: "15.2(2)E7".to_string(),
        uptime: 1_234_567,
        interface_list: vec![
            "GigabitEthernet1/0/1".to_string(),
            "GigabitEthernet1/0/2".to_string(),
            "Vlan1".to_string(),
        ],
    }
}

/// Three interfaces, only the first of which is working.
pub fn sample_interfaces() -> Interfaces {
    let mut interfaces = Interfaces::new();
    interfaces.insert(
        "GigabitEthernet1/0/1".to_string(),
        Interface {
            is_up: true,
            is_enabled: true,
            description: "uplink".to_string(),
            mac_address: "00:1A:2B:3C:4D:01".to_string(),
            speed: 1000,
            mtu: 1500,
        },
    );
    interfaces.insert(
        "GigabitEthernet1/0/2".to_string(),
        Interface {
            is_up: false,
            is_enabled: true,
            description: String::new(),
            mac_address: "00:1A:2B:3C:4D:02".to_string(),
            speed: 1000,
            mtu: 1500,
        },
    );
    interfaces.insert(
        "Vlan1".to_string(),
        Interface {
            is_up: false,
            is_enabled: false,
            description: String::new(),
            mac_address: "00:1A:2B:3C:4D:40".to_string(),
            speed: 1000,
            mtu: 1500,
        },
    );
    interfaces
}
