//! Device address parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("dotted-quad pattern is valid")
});

/// A dotted-quad IPv4 address as typed by the operator.
///
/// Validation is by shape only: four groups of one to three digits.
/// Octet ranges are not checked, so `999.1.1.1` is accepted and left
/// for the SSH connect to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Parse a whole message as an address.
    pub fn parse(text: &str) -> Option<Self> {
        DOTTED_QUAD
            .is_match(text)
            .then(|| Self(text.to_string()))
    }

    /// The address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dotted_quads() {
        for text in ["10.0.0.1", "192.168.100.254", "1.2.3.4", "999.999.999.999"] {
            let address = DeviceAddress::parse(text).unwrap();
            assert_eq!(address.as_str(), text);
        }
    }

    #[test]
    fn test_rejects_everything_else() {
        for text in [
            "",
            "10.0.0",
            "10.0.0.1.5",
            "1000.0.0.1",
            "10.0.0.1 ",
            " 10.0.0.1",
            "router1",
            "10.0.0.a",
            "10..0.1",
            "Facts",
            "done",
            "١٠.٠.٠.١",
        ] {
            assert!(DeviceAddress::parse(text).is_none(), "accepted {:?}", text);
        }
    }
}
