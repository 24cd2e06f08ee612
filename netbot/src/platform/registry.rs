//! Platform registry for looking up platform definitions.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::definition::PlatformDefinition;
use super::vendors;

/// Built-in platforms, fixed at process start.
static BUILTIN: LazyLock<PlatformRegistry> = LazyLock::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    registry
});

/// Registry for platform definitions.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    /// Get the read-only registry of built-in platforms.
    pub fn builtin() -> &'static PlatformRegistry {
        &BUILTIN
    }

    fn register_builtin_platforms(&mut self) {
        for platform in [
            vendors::generic::platform(),
            vendors::cisco_ios::platform(),
            vendors::cisco_nxos::platform(),
        ] {
            self.platforms.insert(platform.name.clone(), platform);
        }
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_platforms() {
        let registry = PlatformRegistry::builtin();
        assert!(registry.contains("generic"));
        assert!(registry.contains("cisco_ios"));
        assert!(registry.contains("cisco_nxos"));
        assert!(registry.get("juniper_junos").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = PlatformRegistry::new();
        assert!(!registry.contains("generic"));
        assert!(registry.get("cisco_ios").is_none());
    }
}
