//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the lifecycle engine requires from its host. All calls are
//! synchronous and block the calling thread.

use crate::domain::{
    Capability, ItemId, LifecycleDefinition, PropertyValue, SnapshotId, SnapshotRef, StoredNode,
    Timestamp,
};
use crate::error::{StoreError, StoreResult};
use crate::events::LifecycleEvent;

/// Versioned item/property store.
///
/// Property writes are staged on the item until [`VersionedStore::persist`];
/// [`VersionedStore::reload`] discards staged writes. There is no multi-call
/// transaction: every `persist` is durable on its own.
pub trait VersionedStore: Send + Sync {
    /// Whether the item carries `capability`.
    fn has_capability(&self, item: &ItemId, capability: Capability) -> StoreResult<bool>;

    /// Attach a capability. Attaching `Versionable` to an item without history
    /// creates the root snapshot and leaves the item checked out.
    fn add_capability(&self, item: &ItemId, capability: Capability) -> StoreResult<()>;

    /// Detach a capability. Historical snapshots can only be deleted while
    /// `Versionable` is detached.
    fn remove_capability(&self, item: &ItemId, capability: Capability) -> StoreResult<()>;

    fn is_checked_out(&self, item: &ItemId) -> StoreResult<bool>;

    fn checkout(&self, item: &ItemId) -> StoreResult<()>;

    /// Capture the current content as a new immutable snapshot; leaves the
    /// item checked in.
    fn checkin(&self, item: &ItemId) -> StoreResult<SnapshotRef>;

    /// All historical snapshots, oldest first, including the root snapshot.
    fn list_snapshots(&self, item: &ItemId) -> StoreResult<Vec<SnapshotRef>>;

    fn delete_snapshot(&self, item: &ItemId, snapshot: &SnapshotId) -> StoreResult<()>;

    /// Snapshot the working copy is currently based on.
    fn base_snapshot(&self, item: &ItemId) -> StoreResult<SnapshotRef>;

    fn get_property(&self, item: &ItemId, key: &str) -> StoreResult<Option<PropertyValue>>;

    fn set_property(&self, item: &ItemId, key: &str, value: PropertyValue) -> StoreResult<()>;

    fn persist(&self, item: &ItemId) -> StoreResult<()>;

    fn reload(&self, item: &ItemId) -> StoreResult<()>;

    /// True until the item has been persisted once.
    fn is_new(&self, item: &ItemId) -> StoreResult<bool>;

    /// Display name of the item.
    fn item_name(&self, item: &ItemId) -> StoreResult<String>;

    /// Fetch an item or snapshot by its stable identifier.
    fn fetch_by_id(&self, id: &str) -> StoreResult<Option<StoredNode>>;

    /// User bound to the raw store session.
    fn session_user(&self) -> StoreResult<String>;

    fn add_versioning_capability(&self, item: &ItemId) -> StoreResult<()> {
        self.add_capability(item, Capability::Versionable)
    }

    fn remove_versioning_capability(&self, item: &ItemId) -> StoreResult<()> {
        self.remove_capability(item, Capability::Versionable)
    }

    /// Read a single-valued text property.
    fn get_text(&self, item: &ItemId, key: &str) -> StoreResult<Option<String>> {
        match self.get_property(item, key)? {
            None => Ok(None),
            Some(PropertyValue::Text(value)) => Ok(Some(value)),
            Some(_) => Err(StoreError::PropertyType {
                id: item.to_string(),
                key: key.to_string(),
                expected: "text",
            }),
        }
    }

    fn set_text(&self, item: &ItemId, key: &str, value: &str) -> StoreResult<()> {
        self.set_property(item, key, PropertyValue::Text(value.to_string()))
    }
}

/// Lifecycle definition lookup.
pub trait LifecycleDefinitionProvider: Send + Sync {
    fn lifecycle(&self, name: &str) -> Option<LifecycleDefinition>;
}

/// Current user lookup. Never fails; returns an empty string when unknown.
pub trait UserResolver: Send + Sync {
    fn current_user(&self) -> String;
}

/// Fire-and-forget event broadcast.
pub trait EventNotifier: Send + Sync {
    fn broadcast(&self, event: &LifecycleEvent);
}

/// Decides whether an item's state changes appear in activity streams.
pub trait ActivityEligibility: Send + Sync {
    fn is_eligible(&self, item: &ItemId) -> bool;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}
