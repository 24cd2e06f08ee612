//! Generic platform used for the detection probe.
//!
//! The device family is not known yet, so the prompt pattern accepts the
//! usual terminators of network CLIs and Unix shells. Paging is disabled on
//! a best-effort basis; devices that reject the command simply report an
//! error that the probe ignores.

use crate::platform::PlatformDefinition;

/// Create the generic probe platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("generic", r"(?m)^[\w.\-@()/:~\[\] ]{1,63}[>#$%]\s*\z")
        .expect("generic prompt pattern is valid")
        .with_on_open_command("terminal length 0")
}
