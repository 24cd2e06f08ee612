//! `ios` request profile for Cisco IOS and IOS-XE.

use std::sync::LazyLock;

use regex::Regex;

use super::parse::{HardwareFields, capture, interface_blocks, parse_uptime};
use super::{RequestProfile, expect_outputs};
use crate::error::{ParseError, Result};
use crate::report::{Facts, Interface, Interfaces};

const SHOW_VERSION: &str = "show version";
const SHOW_INTERFACES: &str = "show interfaces";

static UPTIME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S+) uptime is (.+?)\s*$").expect("valid pattern"));

static SERIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:Processor board ID|System serial number\s*:)\s*(\S+)")
        .expect("valid pattern")
});

static OS_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:Cisco IOS Software(?: \[[^\]]*\])?,|IOS \(tm\))\s*(.+?)\s*$")
        .expect("valid pattern")
});

static MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[Cc]isco (\S+) .*processor").expect("valid pattern"));

static INTERFACE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(\S+) is (up|down|administratively down|deleted)\s*,\s*line protocol is (\w+)",
    )
    .expect("valid pattern")
});

/// Cisco IOS profile.
pub struct Ios;

impl RequestProfile for Ios {
    fn name(&self) -> &'static str {
        "ios"
    }

    fn platform(&self) -> &'static str {
        "cisco_ios"
    }

    fn facts_commands(&self) -> &'static [&'static str] {
        &[SHOW_VERSION, SHOW_INTERFACES]
    }

    fn parse_facts(&self, outputs: &[&str]) -> Result<Facts> {
        expect_outputs(outputs, 2)?;
        let (version, interfaces) = (outputs[0], outputs[1]);

        let caps = UPTIME_LINE
            .captures(version)
            .ok_or(ParseError::MissingField {
                field: "hostname",
                command: SHOW_VERSION,
            })?;

        Ok(Facts {
            hostname: caps[1].to_string(),
            serial_number: capture(&SERIAL, version).unwrap_or("Unknown").to_string(),
            vendor: "Cisco".to_string(),
            model: capture(&MODEL, version).unwrap_or("Unknown").to_string(),
            os_version: capture(&OS_VERSION, version).unwrap_or("Unknown").to_string(),
            uptime: parse_uptime(&caps[2]),
            interface_list: INTERFACE_HEADER
                .captures_iter(interfaces)
                .map(|caps| caps[1].to_string())
                .collect(),
        })
    }

    fn interfaces_commands(&self) -> &'static [&'static str] {
        &[SHOW_INTERFACES]
    }

    fn parse_interfaces(&self, outputs: &[&str]) -> Result<Interfaces> {
        expect_outputs(outputs, 1)?;

        Ok(interface_blocks(outputs[0], &INTERFACE_HEADER)
            .into_iter()
            .map(|(caps, block)| {
                let hw = HardwareFields::from_block(block);
                let iface = Interface {
                    is_up: &caps[3] == "up",
                    is_enabled: &caps[2] != "administratively down",
                    description: hw.description,
                    mac_address: hw.mac_address,
                    speed: hw.speed,
                    mtu: hw.mtu,
                };
                (caps[1].to_string(), iface)
            })
            .collect())
    }
}
