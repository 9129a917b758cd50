//! Revision ledger
//!
//! One `RevisionData` per tracked revision, keyed by the revision identifier
//! (the item's own id or the id of one of its snapshots). The ledger is
//! persisted as one encoded string per entry in a multi-valued property.

use crate::domain::item::PropertyValue;
use crate::error::{LifecycleError, LifecycleResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Last known state and author of one revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionData {
    pub revision: String,
    pub state: String,
    #[serde(default)]
    pub author: String,
}

impl RevisionData {
    pub fn new(
        revision: impl Into<String>,
        state: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            revision: revision.into(),
            state: state.into(),
            author: author.into(),
        }
    }

    /// Encode as a single stored value.
    pub fn encode(&self) -> String {
        // A struct of three strings always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a stored value.
    ///
    /// Accepts the JSON form written by [`RevisionData::encode`] and the legacy
    /// `revision,state,author` form.
    pub fn decode(value: &str) -> LifecycleResult<Self> {
        let trimmed = value.trim();
        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).map_err(|e| LifecycleError::Decode {
                what: "revision data",
                reason: e.to_string(),
            });
        }

        let mut parts = trimmed.splitn(3, ',');
        match (parts.next(), parts.next()) {
            (Some(revision), Some(state)) if !revision.is_empty() && !state.is_empty() => {
                Ok(Self::new(revision, state, parts.next().unwrap_or_default()))
            }
            _ => Err(LifecycleError::Decode {
                what: "revision data",
                reason: format!("expected 'revision,state,author', got '{trimmed}'"),
            }),
        }
    }
}

/// Per-item map from revision identifier to its revision data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevisionLedger {
    entries: BTreeMap<String, RevisionData>,
}

impl RevisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict decode: any undecodable entry fails the whole ledger.
    pub fn decode(values: &[String]) -> LifecycleResult<Self> {
        let mut ledger = Self::new();
        for value in values {
            ledger.insert(RevisionData::decode(value)?);
        }
        Ok(ledger)
    }

    /// Load the ledger from the stored property value.
    ///
    /// A missing property is an empty ledger. An unreadable property is also
    /// treated as an empty ledger, but logged as a decode failure.
    pub fn from_property(item: &str, value: Option<&PropertyValue>) -> Self {
        let values = match value {
            None => return Self::new(),
            Some(PropertyValue::TextList(values)) => values.as_slice(),
            Some(PropertyValue::Text(single)) => std::slice::from_ref(single),
            Some(other) => {
                warn!(
                    item,
                    value = ?other,
                    "[authoring] revision ledger has unexpected type, treating as absent"
                );
                return Self::new();
            }
        };

        match Self::decode(values) {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(
                    item,
                    entries = values.len(),
                    error = %err,
                    "[authoring] revision ledger decode failed, treating as absent"
                );
                Self::new()
            }
        }
    }

    /// Encoded values in revision-id order.
    pub fn encode(&self) -> Vec<String> {
        self.entries.values().map(RevisionData::encode).collect()
    }

    pub fn to_property(&self) -> PropertyValue {
        PropertyValue::TextList(self.encode())
    }

    pub fn get(&self, revision: &str) -> Option<&RevisionData> {
        self.entries.get(revision)
    }

    pub fn get_mut(&mut self, revision: &str) -> Option<&mut RevisionData> {
        self.entries.get_mut(revision)
    }

    /// Insert or replace the entry keyed by `data.revision`.
    pub fn insert(&mut self, data: RevisionData) -> Option<RevisionData> {
        self.entries.insert(data.revision.clone(), data)
    }

    /// Overwrite state and author of `revision`, creating the entry if absent.
    pub fn record(&mut self, revision: &str, state: &str, author: &str) -> &RevisionData {
        let entry = self
            .entries
            .entry(revision.to_string())
            .or_insert_with(|| RevisionData::new(revision, state, author));
        entry.state = state.to_string();
        entry.author = author.to_string();
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RevisionData> {
        self.entries.values()
    }

    pub fn contains(&self, revision: &str) -> bool {
        self.entries.contains_key(revision)
    }
}
