//! `nxos_ssh` request profile for Cisco NX-OS.

use std::sync::LazyLock;

use regex::Regex;

use super::parse::{HardwareFields, capture, interface_blocks, parse_uptime};
use super::{RequestProfile, expect_outputs};
use crate::error::{ParseError, Result};
use crate::report::{Facts, Interface, Interfaces};

const SHOW_VERSION: &str = "show version";
const SHOW_HOSTNAME: &str = "show hostname";
const SHOW_INTERFACE: &str = "show interface";

static OS_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:NXOS|system):\s+version\s+(\S+)").expect("valid pattern")
});

static MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*cisco (.+?) [Cc]hassis").expect("valid pattern"));

static SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Processor [Bb]oard ID (\S+)").expect("valid pattern"));

static UPTIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Kernel uptime is (.+?)\s*$").expect("valid pattern"));

static DEVICE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Device name:\s*(\S+)").expect("valid pattern"));

static INTERFACE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\S+) is (up|down)(?:\s*\(([^)]*)\))?").expect("valid pattern")
});

static ADMIN_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"admin state is (up|down)").expect("valid pattern"));

/// Cisco NX-OS profile.
pub struct NxosSsh;

impl RequestProfile for NxosSsh {
    fn name(&self) -> &'static str {
        "nxos_ssh"
    }

    fn platform(&self) -> &'static str {
        "cisco_nxos"
    }

    fn facts_commands(&self) -> &'static [&'static str] {
        &[SHOW_VERSION, SHOW_HOSTNAME, SHOW_INTERFACE]
    }

    fn parse_facts(&self, outputs: &[&str]) -> Result<Facts> {
        expect_outputs(outputs, 3)?;
        let (version, hostname, interfaces) = (outputs[0], outputs[1], outputs[2]);

        let hostname = hostname
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .or_else(|| capture(&DEVICE_NAME, version))
            .ok_or(ParseError::MissingField {
                field: "hostname",
                command: SHOW_HOSTNAME,
            })?;

        Ok(Facts {
            hostname: hostname.to_string(),
            serial_number: capture(&SERIAL, version).unwrap_or("Unknown").to_string(),
            vendor: "Cisco".to_string(),
            model: capture(&MODEL, version).unwrap_or("Unknown").to_string(),
            os_version: capture(&OS_VERSION, version).unwrap_or("Unknown").to_string(),
            uptime: capture(&UPTIME, version).map(parse_uptime).unwrap_or(0),
            interface_list: INTERFACE_HEADER
                .captures_iter(interfaces)
                .map(|caps| caps[1].to_string())
                .collect(),
        })
    }

    fn interfaces_commands(&self) -> &'static [&'static str] {
        &[SHOW_INTERFACE]
    }

    fn parse_interfaces(&self, outputs: &[&str]) -> Result<Interfaces> {
        expect_outputs(outputs, 1)?;

        Ok(interface_blocks(outputs[0], &INTERFACE_HEADER)
            .into_iter()
            .map(|(caps, block)| {
                let is_enabled = match capture(&ADMIN_STATE, block) {
                    Some(state) => state == "up",
                    // SVIs and some logical interfaces only carry the reason
                    None => !caps
                        .get(3)
                        .is_some_and(|reason| reason.as_str().eq_ignore_ascii_case("administratively down")),
                };
                let hw = HardwareFields::from_block(block);
                let iface = Interface {
                    is_up: &caps[2] == "up",
                    is_enabled,
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
