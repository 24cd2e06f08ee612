//! Device reports and their chat rendering.

use indexmap::IndexMap;
use serde::Serialize;

/// Identity facts of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facts {
    pub hostname: String,
    pub serial_number: String,
    pub vendor: String,
    pub model: String,
    pub os_version: String,
    /// Uptime in seconds.
    pub uptime: u64,
    /// Every interface on the device, in device order.
    pub interface_list: Vec<String>,
}

/// Operational state of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    /// Line protocol is up.
    pub is_up: bool,
    /// Not administratively shut down.
    pub is_enabled: bool,
    pub description: String,
    /// `AA:BB:CC:DD:EE:FF`, empty when the interface has no hardware address.
    pub mac_address: String,
    /// Mbps.
    pub speed: u64,
    pub mtu: u32,
}

impl Interface {
    /// Both up and enabled; only these are reported to the operator.
    pub fn is_working(&self) -> bool {
        self.is_up && self.is_enabled
    }
}

/// All interfaces of a device keyed by name, in device order.
pub type Interfaces = IndexMap<String, Interface>;

/// Longest text one chat message may carry, in characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Render facts as chat messages.
///
/// Everything fits in one message on most devices. A long interface list
/// spills over into follow-up messages, each within [`MESSAGE_LIMIT`].
pub fn render_facts(facts: &Facts) -> Vec<String> {
    let mut current = format!(
        "Here are your device facts:\n\n\
         This device's name is {}, serial number {}\n\
         It is a {} {}, running {}\n\
         This device has been up for {} seconds\n\n\
         The list of interfaces on this device:\n\n",
        facts.hostname,
        facts.serial_number,
        facts.vendor,
        facts.model,
        facts.os_version,
        facts.uptime,
    );
    let mut len = current.chars().count();
    let mut messages = Vec::new();
    let mut separator = "";

    for name in &facts.interface_list {
        let width = name.chars().count();
        if !separator.is_empty() && len + separator.len() + width > MESSAGE_LIMIT {
            messages.push(std::mem::take(&mut current));
            len = 0;
            separator = "";
        }
        current.push_str(separator);
        current.push_str(name);
        len += separator.len() + width;
        separator = ", ";
    }

    messages.push(current);
    messages
}

/// Render one message per interface that is both up and enabled.
///
/// Interfaces failing either check are left out without notice.
pub fn render_interfaces(interfaces: &Interfaces) -> Vec<String> {
    interfaces
        .iter()
        .filter(|(_, iface)| iface.is_working())
        .map(|(name, iface)| render_interface(name, iface))
        .collect()
}

fn render_interface(name: &str, iface: &Interface) -> String {
    format!(
        "About interface {}:\n\n\
         It has a burnt in address of {}\n\
         And supports a speed of {} Mbps, with an MTU of {}",
        name, iface.mac_address, iface.speed, iface.mtu,
    )
}
