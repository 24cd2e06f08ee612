//! Cisco IOS / IOS-XE platform definition.
//!
//! # Prompt Examples
//!
//! ```text
//! router>                            # user exec
//! router#                            # privileged exec
//! ```
//!
//! Only `show` commands are issued, so configuration modes are not modeled.

use crate::platform::PlatformDefinition;

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("cisco_ios", r"(?m)^[\w.\-@()/:]{1,63}[>#]\s*\z")
        .expect("cisco_ios prompt pattern is valid")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input detected")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_terminal_size(511, 24)
}
