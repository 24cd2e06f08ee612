//! Dialect auto-detection from probe command output.
//!
//! Each [`Signature`] names a probe command and the patterns its output
//! shows on one device family. Commands are run in table order; as soon as
//! a signature of [`CERTAIN`] priority matches, detection stops, otherwise
//! the highest-priority match seen wins.

use std::sync::LazyLock;

use regex::Regex;

/// Priority at which a match ends detection early.
pub const CERTAIN: u8 = 99;

/// Output fingerprint of one device family.
#[derive(Debug)]
pub struct Signature {
    /// Dialect identifier reported on a match.
    pub dialect: &'static str,
    /// Probe command whose output is inspected.
    pub command: &'static str,
    /// Case-insensitive patterns; any one matching is a hit.
    pub patterns: &'static [&'static str],
    pub priority: u8,
}

/// Known signatures, in probe order.
pub const SIGNATURES: &[Signature] = &[
    Signature {
        dialect: "cisco_asa",
        command: "show version",
        patterns: &[r"Cisco Adaptive Security Appliance", r"Cisco ASA"],
        priority: CERTAIN,
    },
    Signature {
        dialect: "cisco_ios",
        command: "show version",
        patterns: &[
            r"Cisco IOS Software",
            r"Cisco Internetwork Operating System Software",
        ],
        priority: CERTAIN,
    },
    Signature {
        dialect: "cisco_nxos",
        command: "show version",
        patterns: &[r"Cisco Nexus Operating System", r"NX-OS"],
        priority: CERTAIN,
    },
    Signature {
        dialect: "cisco_xr",
        command: "show version",
        patterns: &[r"Cisco IOS XR"],
        priority: CERTAIN,
    },
    Signature {
        dialect: "arista_eos",
        command: "show version",
        patterns: &[r"Arista"],
        priority: CERTAIN,
    },
    Signature {
        dialect: "juniper_junos",
        command: "show version",
        patterns: &[
            r"JUNOS Software Release",
            r"JUNOS .+ Software",
            r"JUNOS OS Kernel",
            r"JUNOS Base Version",
        ],
        priority: CERTAIN,
    },
    Signature {
        dialect: "linux",
        command: "uname -a",
        patterns: &[r"Linux"],
        priority: CERTAIN,
    },
];

static COMPILED: LazyLock<Vec<(&'static Signature, Vec<Regex>)>> = LazyLock::new(|| {
    SIGNATURES
        .iter()
        .map(|sig| {
            let patterns = sig
                .patterns
                .iter()
                .map(|p| Regex::new(&format!("(?i){p}")).expect("signature pattern is valid"))
                .collect();
            (sig, patterns)
        })
        .collect()
});

/// Distinct probe commands in the order they should be sent.
pub fn probe_commands() -> Vec<&'static str> {
    let mut commands: Vec<&'static str> = Vec::new();
    for sig in SIGNATURES {
        if !commands.contains(&sig.command) {
            commands.push(sig.command);
        }
    }
    commands
}

/// Running best guess over the outputs seen so far.
#[derive(Debug, Default)]
pub struct Autodetect {
    best: Option<(&'static str, u8)>,
}

impl Autodetect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score the output of one probe command.
    ///
    /// Returns `true` once a [`CERTAIN`] match is held; further probing is
    /// pointless after that.
    pub fn observe(&mut self, command: &str, output: &str) -> bool {
        for (sig, patterns) in COMPILED.iter() {
            if sig.command != command {
                continue;
            }
            let current = self.best.map_or(0, |(_, priority)| priority);
            if sig.priority > current && patterns.iter().any(|p| p.is_match(output)) {
                self.best = Some((sig.dialect, sig.priority));
            }
        }
        self.is_certain()
    }

    /// Whether the best guess is final.
    pub fn is_certain(&self) -> bool {
        self.best.is_some_and(|(_, priority)| priority >= CERTAIN)
    }

    /// The best dialect seen, if any matched at all.
    pub fn best(&self) -> Option<&'static str> {
        self.best.map(|(dialect, _)| dialect)
    }
}
