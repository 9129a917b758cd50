//! Lifecycle definitions: named, ordered lists of workflow states

use crate::error::{LifecycleError, LifecycleResult};
use serde::{Deserialize, Serialize};

/// One configured state of a lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    pub state: String,
    /// Group allowed to move content into this state, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<String>,
}

impl LifecycleState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            membership: None,
        }
    }
}

/// Externally configured lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleDefinition {
    pub name: String,
    #[serde(default)]
    pub states: Vec<LifecycleState>,
}

impl LifecycleDefinition {
    pub fn new<I, S>(name: impl Into<String>, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            states: states.into_iter().map(LifecycleState::new).collect(),
        }
    }

    /// First configured state, used when content is edited.
    pub fn first_state(&self) -> Option<&str> {
        self.states.first().map(|s| s.state.as_str())
    }

    pub fn defines(&self, state: &str) -> bool {
        self.states.iter().any(|s| s.state == state)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.state.as_str())
    }

    pub fn validate(&self) -> LifecycleResult<()> {
        if self.name.trim().is_empty() {
            return Err(LifecycleError::InvalidDefinition {
                reason: "lifecycle name is empty".to_string(),
            });
        }
        if let Some(empty) = self.states.iter().position(|s| s.state.trim().is_empty()) {
            return Err(LifecycleError::InvalidDefinition {
                reason: format!("lifecycle '{}' has an empty state at {}", self.name, empty),
            });
        }
        Ok(())
    }
}
