//! In-memory lifecycle definition registry, loadable from JSON.

use crate::domain::LifecycleDefinition;
use crate::error::{LifecycleError, LifecycleResult};
use crate::ports::outbound::LifecycleDefinitionProvider;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// JSON document shape: `{"lifecycles": [{"name": "...", "states": [{"state": "..."}]}]}`.
#[derive(Deserialize)]
struct LifecycleDocument {
    lifecycles: Vec<LifecycleDefinition>,
}

/// Registry of lifecycle definitions keyed by name.
#[derive(Default)]
pub struct InMemoryLifecycleRegistry {
    definitions: RwLock<HashMap<String, LifecycleDefinition>>,
}

impl InMemoryLifecycleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document and register every definition in it.
    pub fn from_json(json: &str) -> LifecycleResult<Self> {
        let document: LifecycleDocument =
            serde_json::from_str(json).map_err(|e| LifecycleError::InvalidDefinition {
                reason: e.to_string(),
            })?;

        let registry = Self::new();
        for definition in document.lifecycles {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> LifecycleResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LifecycleError::InvalidDefinition {
            reason: format!("{}: {e}", path.display()),
        })?;
        let registry = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            count = registry.len(),
            "[authoring] lifecycle definitions loaded"
        );
        Ok(registry)
    }

    /// Register a definition, replacing any definition of the same name.
    pub fn register(&self, definition: LifecycleDefinition) -> LifecycleResult<()> {
        definition.validate()?;
        self.definitions
            .write()
            .insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn with_definition(self, definition: LifecycleDefinition) -> LifecycleResult<Self> {
        self.register(definition)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }
}

impl LifecycleDefinitionProvider for InMemoryLifecycleRegistry {
    fn lifecycle(&self, name: &str) -> Option<LifecycleDefinition> {
        self.definitions.read().get(name).cloned()
    }
}
