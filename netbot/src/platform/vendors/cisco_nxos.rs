//! Cisco NX-OS platform definition.

use crate::platform::PlatformDefinition;

/// Create the Cisco NX-OS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("cisco_nxos", r"(?m)^[\w.\-@()/:]{1,63}[>#]\s*\z")
        .expect("cisco_nxos prompt pattern is valid")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Invalid number")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_terminal_size(511, 24)
}
