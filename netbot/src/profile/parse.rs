//! Helpers shared by the CLI output parsers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static UPTIME_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(year|week|day|hour|minute|second)").expect("uptime pattern is valid")
});

static MAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"address(?: is|:)\s*([0-9a-fA-F]{4}\.[0-9a-fA-F]{4}\.[0-9a-fA-F]{4})")
        .expect("mac pattern is valid")
});

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Description:[ \t]*(.*?)[ \t]*$").expect("description pattern is valid")
});

static MTU: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MTU (\d+) bytes").expect("mtu pattern is valid"));

static BANDWIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BW (\d+) Kbit").expect("bandwidth pattern is valid"));

/// Convert a Cisco uptime phrase to seconds.
///
/// Understands both `1 year, 2 weeks, 3 days, 4 hours, 5 minutes` and the
/// NX-OS `12 day(s), 3 hour(s), 44 minute(s), 32 second(s)` form.
pub fn parse_uptime(text: &str) -> u64 {
    UPTIME_UNIT
        .captures_iter(text)
        .map(|caps| {
            let count: u64 = caps[1].parse().unwrap_or(0);
            let unit = match &caps[2] {
                "year" => 365 * 24 * 3600,
                "week" => 7 * 24 * 3600,
                "day" => 24 * 3600,
                "hour" => 3600,
                "minute" => 60,
                _ => 1,
            };
            count * unit
        })
        .sum()
}

/// Normalize a MAC address to upper-case colon-separated octets.
///
/// Input that does not hold exactly twelve hex digits is returned as is.
pub fn normalize_mac(text: &str) -> String {
    let hex: Vec<char> = text.chars().filter(char::is_ascii_hexdigit).collect();
    if hex.len() != 12 || text.chars().any(|c| !c.is_ascii_hexdigit() && !".:-".contains(c)) {
        return text.to_string();
    }

    hex.chunks(2)
        .map(|pair| pair.iter().collect::<String>().to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(":")
}

/// First capture group of `pattern` in `text`, trimmed.
pub fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Split `show interface` output into one block per interface.
///
/// Each item pairs the header captures with the text up to the next header.
pub fn interface_blocks<'t>(output: &'t str, header: &Regex) -> Vec<(Captures<'t>, &'t str)> {
    let headers: Vec<Captures<'t>> = header.captures_iter(output).collect();
    let starts: Vec<usize> = headers
        .iter()
        .map(|caps| caps.get(0).map_or(0, |m| m.start()))
        .collect();

    headers
        .into_iter()
        .enumerate()
        .map(|(i, caps)| {
            let body_start = caps.get(0).map_or(0, |m| m.end());
            let body_end = starts.get(i + 1).copied().unwrap_or(output.len());
            (caps, &output[body_start..body_end])
        })
        .collect()
}

/// Hardware fields common to the IOS and NX-OS interface blocks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HardwareFields {
    pub mac_address: String,
    pub description: String,
    pub mtu: u32,
    /// Mbps.
    pub speed: u64,
}

impl HardwareFields {
    pub fn from_block(block: &str) -> Self {
        let bandwidth_kbit: u64 = capture(&BANDWIDTH, block)
            .and_then(|bw| bw.parse().ok())
            .unwrap_or(0);

        Self {
            mac_address: capture(&MAC, block).map(normalize_mac).unwrap_or_default(),
            description: capture(&DESCRIPTION, block).unwrap_or_default().to_string(),
            mtu: capture(&MTU, block)
                .and_then(|mtu| mtu.parse().ok())
                .unwrap_or(0),
            speed: bandwidth_kbit / 1000,
        }
    }
}
