//! Content items, snapshots and persisted property values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Persisted property keys, stable across the store.
pub mod property_keys {
    pub const CURRENT_STATE: &str = "publication:currentState";
    pub const LIVE_REVISION: &str = "publication:liveRevision";
    pub const LIVE_DATE: &str = "publication:liveDate";
    pub const REVISION_DATA: &str = "publication:revisionData";
    pub const HISTORY: &str = "publication:history";
    pub const LAST_USER: &str = "publication:lastUser";
    pub const LIFECYCLE: &str = "publication:lifecycle";
}

/// Stable identifier of a content item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Stable identifier of an immutable snapshot.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier and display name of one historical snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub id: SnapshotId,
    pub name: String,
}

/// Capabilities an item can carry in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// The item keeps a snapshot history.
    Versionable,
    /// The item is under publication lifecycle control.
    PublicationLifecycle,
}

/// Typed property value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    TextList(Vec<String>),
    Date(Timestamp),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::TextList(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Timestamp> {
        match self {
            PropertyValue::Date(value) => Some(*value),
            _ => None,
        }
    }
}

/// Frozen content captured inside a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenNode {
    pub snapshot: SnapshotRef,
    pub item: ItemId,
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Any node the store can fetch by identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredNode {
    /// A working copy.
    Item(ItemId),
    /// A historical snapshot, optionally wrapping its frozen content.
    Snapshot {
        snapshot: SnapshotRef,
        frozen: Option<FrozenNode>,
    },
}

/// What a reader is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemView {
    /// The editable working copy itself.
    WorkingCopy(ItemId),
    /// A snapshot node without unwrappable content.
    Snapshot(SnapshotRef),
    /// The frozen content of the live snapshot.
    Frozen(FrozenNode),
}
