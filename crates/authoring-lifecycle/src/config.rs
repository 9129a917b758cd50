//! Lifecycle engine configuration from environment variables.

use std::env;

/// Name the plugin registers under.
pub const DEFAULT_LIFECYCLE_NAME: &str = "Authoring publication";
/// Store capability type marking items under this lifecycle.
pub const DEFAULT_LIFECYCLE_TYPE: &str = "publication:authoringPublication";
/// Name of the root snapshot every history starts with.
pub const DEFAULT_ROOT_SNAPSHOT_NAME: &str = "jcr:rootVersion";

/// Configuration for the publication lifecycle service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Display name of this lifecycle plugin
    pub lifecycle_name: String,

    /// Capability type recorded on enrolled items
    pub lifecycle_type: String,

    /// Sentinel snapshot kept by history pruning
    pub root_snapshot_name: String,

    /// Lifecycle definition used by `enroll` when none is given
    pub default_lifecycle: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lifecycle_name: DEFAULT_LIFECYCLE_NAME.to_string(),
            lifecycle_type: DEFAULT_LIFECYCLE_TYPE.to_string(),
            root_snapshot_name: DEFAULT_ROOT_SNAPSHOT_NAME.to_string(),
            default_lifecycle: "lifecycle1".to_string(),
        }
    }
}

impl LifecycleConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AUTHORING_LIFECYCLE_NAME`: plugin name (default: Authoring publication)
    /// - `AUTHORING_LIFECYCLE_TYPE`: capability type (default: publication:authoringPublication)
    /// - `AUTHORING_ROOT_SNAPSHOT`: root snapshot name (default: jcr:rootVersion)
    /// - `AUTHORING_DEFAULT_LIFECYCLE`: default lifecycle definition (default: lifecycle1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lifecycle_name: env_or("AUTHORING_LIFECYCLE_NAME", defaults.lifecycle_name),
            lifecycle_type: env_or("AUTHORING_LIFECYCLE_TYPE", defaults.lifecycle_type),
            root_snapshot_name: env_or("AUTHORING_ROOT_SNAPSHOT", defaults.root_snapshot_name),
            default_lifecycle: env_or("AUTHORING_DEFAULT_LIFECYCLE", defaults.default_lifecycle),
        }
    }

    pub fn with_default_lifecycle(mut self, name: impl Into<String>) -> Self {
        self.default_lifecycle = name.into();
        self
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}
