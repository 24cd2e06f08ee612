//! Platform definitions for multi-vendor support.
//!
//! This module defines vendor-specific session settings: prompt patterns,
//! failure markers and the commands run around a session.

mod definition;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use registry::PlatformRegistry;
