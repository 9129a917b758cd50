//! Single-slot audit log entry
//!
//! The item keeps only its most recent entry: each transition overwrites the
//! history property instead of appending to it.

use crate::domain::item::{PropertyValue, Timestamp};
use crate::domain::state::TransitionKind;
use crate::error::{LifecycleError, LifecycleResult};
use serde::{Deserialize, Serialize};

/// One audit record of a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLogEntry {
    /// Logical name of the affected version.
    pub name: String,
    pub state: String,
    pub author: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransitionKind>,
}

impl VersionLogEntry {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        author: impl Into<String>,
        timestamp: Timestamp,
        kind: Option<TransitionKind>,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            author: author.into(),
            timestamp,
            kind,
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode the JSON form or the legacy `name,state,author,timestamp,kind` form.
    pub fn decode(value: &str) -> LifecycleResult<Self> {
        let trimmed = value.trim();
        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).map_err(|e| LifecycleError::Decode {
                what: "version log",
                reason: e.to_string(),
            });
        }

        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields.len() < 4 || fields[0].is_empty() {
            return Err(LifecycleError::Decode {
                what: "version log",
                reason: format!("expected 'name,state,author,timestamp[,kind]', got '{trimmed}'"),
            });
        }
        let timestamp = fields[3].parse().map_err(|_| LifecycleError::Decode {
            what: "version log",
            reason: format!("invalid timestamp '{}'", fields[3]),
        })?;
        let kind = fields.get(4).and_then(|tag| TransitionKind::from_tag(tag));

        Ok(Self::new(fields[0], fields[1], fields[2], timestamp, kind))
    }

    pub fn to_property(&self) -> PropertyValue {
        PropertyValue::Text(self.encode())
    }

    /// Read the stored entry, tolerating the legacy one-element list shape.
    pub fn from_property(value: &PropertyValue) -> LifecycleResult<Self> {
        match value {
            PropertyValue::Text(text) => Self::decode(text),
            PropertyValue::TextList(values) => match values.last() {
                Some(last) => Self::decode(last),
                None => Err(LifecycleError::Decode {
                    what: "version log",
                    reason: "empty history".to_string(),
                }),
            },
            PropertyValue::Date(_) => Err(LifecycleError::Decode {
                what: "version log",
                reason: "history stored as a date".to_string(),
            }),
        }
    }
}
