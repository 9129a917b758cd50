//! In-memory versioned store
//!
//! Production stores live outside this crate. This adapter backs tests, the
//! admin tool and embedded use: staged property writes, snapshot history with
//! a root snapshot, checkout/checkin, and fault injection.

use crate::config::DEFAULT_ROOT_SNAPSHOT_NAME;
use crate::domain::{
    Capability, FrozenNode, ItemId, PropertyValue, SnapshotId, SnapshotRef, StoredNode,
};
use crate::error::{StoreError, StoreResult};
use crate::ports::outbound::VersionedStore;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Store operations that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    GetProperty,
    SetProperty,
    Persist,
    Reload,
    Checkout,
    Checkin,
    ListSnapshots,
    DeleteSnapshot,
    BaseSnapshot,
    AddCapability,
    RemoveCapability,
    FetchById,
    SessionUser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaultMode {
    Once,
    Always,
}

struct SnapshotRecord {
    snapshot: SnapshotRef,
    frozen: Option<FrozenNode>,
}

struct ItemRecord {
    name: String,
    working: BTreeMap<String, PropertyValue>,
    saved: BTreeMap<String, PropertyValue>,
    capabilities: BTreeSet<Capability>,
    persisted: bool,
    persist_count: u64,
    checked_out: bool,
    history: Vec<SnapshotRecord>,
    base: Option<SnapshotId>,
    next_version: u64,
}

impl ItemRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            working: BTreeMap::new(),
            saved: BTreeMap::new(),
            capabilities: BTreeSet::new(),
            persisted: false,
            persist_count: 0,
            checked_out: true,
            history: Vec::new(),
            base: None,
            next_version: 0,
        }
    }

    fn is_versionable(&self) -> bool {
        self.capabilities.contains(&Capability::Versionable)
    }
}

#[derive(Default)]
struct StoreState {
    items: HashMap<ItemId, ItemRecord>,
    snapshot_owner: HashMap<SnapshotId, ItemId>,
    faults: HashMap<StoreOperation, FaultMode>,
    protected: HashSet<SnapshotId>,
}

impl StoreState {
    fn check_fault(&mut self, op: StoreOperation) -> StoreResult<()> {
        match self.faults.get(&op).copied() {
            None => Ok(()),
            Some(mode) => {
                if mode == FaultMode::Once {
                    self.faults.remove(&op);
                }
                Err(StoreError::Backend {
                    message: format!("injected failure on {op:?}"),
                })
            }
        }
    }

    fn item(&self, id: &ItemId) -> StoreResult<&ItemRecord> {
        self.items
            .get(id)
            .ok_or_else(|| StoreError::ItemNotFound { id: id.to_string() })
    }

    fn item_mut(&mut self, id: &ItemId) -> StoreResult<&mut ItemRecord> {
        self.items
            .get_mut(id)
            .ok_or_else(|| StoreError::ItemNotFound { id: id.to_string() })
    }
}

/// In-memory implementation of [`VersionedStore`].
pub struct InMemoryVersionedStore {
    state: Mutex<StoreState>,
    root_snapshot_name: String,
    session_user: String,
    capture_frozen: bool,
}

impl Default for InMemoryVersionedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVersionedStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            root_snapshot_name: DEFAULT_ROOT_SNAPSHOT_NAME.to_string(),
            session_user: String::new(),
            capture_frozen: true,
        }
    }

    pub fn with_root_snapshot_name(mut self, name: impl Into<String>) -> Self {
        self.root_snapshot_name = name.into();
        self
    }

    /// User reported by [`VersionedStore::session_user`].
    pub fn with_session_user(mut self, user: impl Into<String>) -> Self {
        self.session_user = user.into();
        self
    }

    /// Snapshots carry no frozen content; fetches return the bare snapshot.
    pub fn without_frozen_capture(mut self) -> Self {
        self.capture_frozen = false;
        self
    }

    /// Create a new, not yet persisted item.
    pub fn create_item(&self, name: &str) -> ItemId {
        let id = ItemId::new(Uuid::new_v4().to_string());
        self.insert_item(id.clone(), name);
        id
    }

    /// Create a new item under a caller-chosen identifier, replacing any item with it.
    pub fn insert_item(&self, id: ItemId, name: &str) {
        self.state.lock().items.insert(id, ItemRecord::new(name));
    }

    /// Fail every subsequent call of `op` until cleared.
    pub fn fail_always(&self, op: StoreOperation) {
        self.state.lock().faults.insert(op, FaultMode::Always);
    }

    /// Fail the next call of `op` only.
    pub fn fail_once(&self, op: StoreOperation) {
        self.state.lock().faults.insert(op, FaultMode::Once);
    }

    pub fn clear_failures(&self) {
        self.state.lock().faults.clear();
    }

    /// Refuse deletion of one snapshot.
    pub fn protect_snapshot(&self, snapshot: &SnapshotId) {
        self.state.lock().protected.insert(snapshot.clone());
    }

    /// Persisted (durable) value of a property, ignoring staged writes.
    pub fn saved_property(&self, item: &ItemId, key: &str) -> Option<PropertyValue> {
        let state = self.state.lock();
        state
            .items
            .get(item)
            .and_then(|record| record.saved.get(key).cloned())
    }

    /// Number of successful `persist` calls for the item.
    pub fn persist_count(&self, item: &ItemId) -> u64 {
        self.state
            .lock()
            .items
            .get(item)
            .map(|record| record.persist_count)
            .unwrap_or(0)
    }

    /// Snapshot history, oldest first.
    pub fn history(&self, item: &ItemId) -> Vec<SnapshotRef> {
        self.state
            .lock()
            .items
            .get(item)
            .map(|record| record.history.iter().map(|s| s.snapshot.clone()).collect())
            .unwrap_or_default()
    }
}

impl VersionedStore for InMemoryVersionedStore {
    fn has_capability(&self, item: &ItemId, capability: Capability) -> StoreResult<bool> {
        let state = self.state.lock();
        Ok(state.item(item)?.capabilities.contains(&capability))
    }

    fn add_capability(&self, item: &ItemId, capability: Capability) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::AddCapability)?;
        let root_name = self.root_snapshot_name.clone();
        let record = state.item_mut(item)?;
        record.capabilities.insert(capability);

        if capability != Capability::Versionable || !record.history.is_empty() {
            return Ok(());
        }

        let root = SnapshotRef {
            id: SnapshotId::new(Uuid::new_v4().to_string()),
            name: root_name,
        };
        let frozen = self.capture_frozen.then(|| FrozenNode {
            snapshot: root.clone(),
            item: item.clone(),
            properties: BTreeMap::new(),
        });
        record.history.push(SnapshotRecord {
            snapshot: root.clone(),
            frozen,
        });
        record.base = Some(root.id.clone());
        record.checked_out = true;
        state.snapshot_owner.insert(root.id.clone(), item.clone());
        debug!(item = %item, root = %root.id, "[authoring] root snapshot created");
        Ok(())
    }

    fn remove_capability(&self, item: &ItemId, capability: Capability) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::RemoveCapability)?;
        state.item_mut(item)?.capabilities.remove(&capability);
        Ok(())
    }

    fn is_checked_out(&self, item: &ItemId) -> StoreResult<bool> {
        let state = self.state.lock();
        let record = state.item(item)?;
        Ok(!record.is_versionable() || record.checked_out)
    }

    fn checkout(&self, item: &ItemId) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::Checkout)?;
        let record = state.item_mut(item)?;
        if !record.is_versionable() {
            return Err(StoreError::NotVersionable { id: item.to_string() });
        }
        record.checked_out = true;
        Ok(())
    }

    fn checkin(&self, item: &ItemId) -> StoreResult<SnapshotRef> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::Checkin)?;
        let record = state.item_mut(item)?;
        if !record.is_versionable() {
            return Err(StoreError::NotVersionable { id: item.to_string() });
        }
        if !record.checked_out {
            return Err(StoreError::NotCheckedOut { id: item.to_string() });
        }

        record.next_version += 1;
        let snapshot = SnapshotRef {
            id: SnapshotId::new(Uuid::new_v4().to_string()),
            name: record.next_version.to_string(),
        };
        let frozen = self.capture_frozen.then(|| FrozenNode {
            snapshot: snapshot.clone(),
            item: item.clone(),
            properties: record.working.clone(),
        });
        record.history.push(SnapshotRecord {
            snapshot: snapshot.clone(),
            frozen,
        });
        record.base = Some(snapshot.id.clone());
        record.checked_out = false;
        state
            .snapshot_owner
            .insert(snapshot.id.clone(), item.clone());

        debug!(item = %item, snapshot = %snapshot.id, name = %snapshot.name, "[authoring] checked in");
        Ok(snapshot)
    }

    fn list_snapshots(&self, item: &ItemId) -> StoreResult<Vec<SnapshotRef>> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::ListSnapshots)?;
        Ok(state
            .item(item)?
            .history
            .iter()
            .map(|s| s.snapshot.clone())
            .collect())
    }

    fn delete_snapshot(&self, item: &ItemId, snapshot: &SnapshotId) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::DeleteSnapshot)?;
        if state.protected.contains(snapshot) {
            return Err(StoreError::SnapshotDeletion {
                snapshot: snapshot.to_string(),
                reason: "snapshot is protected".to_string(),
            });
        }

        let root_name = self.root_snapshot_name.clone();
        let record = state.item_mut(item)?;
        if record.is_versionable() {
            return Err(StoreError::SnapshotDeletion {
                snapshot: snapshot.to_string(),
                reason: "versioning capability is attached".to_string(),
            });
        }
        let position = record
            .history
            .iter()
            .position(|s| &s.snapshot.id == snapshot)
            .ok_or_else(|| StoreError::SnapshotNotFound {
                id: snapshot.to_string(),
            })?;
        if record.history[position].snapshot.name == root_name {
            return Err(StoreError::SnapshotDeletion {
                snapshot: snapshot.to_string(),
                reason: "root snapshot cannot be deleted".to_string(),
            });
        }

        record.history.remove(position);
        if record.base.as_ref() == Some(snapshot) {
            record.base = record.history.last().map(|s| s.snapshot.id.clone());
        }
        state.snapshot_owner.remove(snapshot);
        Ok(())
    }

    fn base_snapshot(&self, item: &ItemId) -> StoreResult<SnapshotRef> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::BaseSnapshot)?;
        let record = state.item(item)?;
        record
            .base
            .as_ref()
            .and_then(|base| record.history.iter().find(|s| &s.snapshot.id == base))
            .map(|s| s.snapshot.clone())
            .ok_or_else(|| StoreError::NotVersionable { id: item.to_string() })
    }

    fn get_property(&self, item: &ItemId, key: &str) -> StoreResult<Option<PropertyValue>> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::GetProperty)?;
        Ok(state.item(item)?.working.get(key).cloned())
    }

    fn set_property(&self, item: &ItemId, key: &str, value: PropertyValue) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::SetProperty)?;
        state.item_mut(item)?.working.insert(key.to_string(), value);
        Ok(())
    }

    fn persist(&self, item: &ItemId) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::Persist)?;
        let record = state.item_mut(item)?;
        record.saved = record.working.clone();
        record.persisted = true;
        record.persist_count += 1;
        Ok(())
    }

    fn reload(&self, item: &ItemId) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::Reload)?;
        let record = state.item_mut(item)?;
        record.working = record.saved.clone();
        Ok(())
    }

    fn is_new(&self, item: &ItemId) -> StoreResult<bool> {
        let state = self.state.lock();
        Ok(!state.item(item)?.persisted)
    }

    fn item_name(&self, item: &ItemId) -> StoreResult<String> {
        let state = self.state.lock();
        Ok(state.item(item)?.name.clone())
    }

    fn fetch_by_id(&self, id: &str) -> StoreResult<Option<StoredNode>> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::FetchById)?;

        let item_id = ItemId::new(id);
        if state.items.contains_key(&item_id) {
            return Ok(Some(StoredNode::Item(item_id)));
        }

        let snapshot_id = SnapshotId::new(id);
        let Some(owner) = state.snapshot_owner.get(&snapshot_id) else {
            return Ok(None);
        };
        let node = state.item(owner)?.history.iter().find_map(|s| {
            (s.snapshot.id == snapshot_id).then(|| StoredNode::Snapshot {
                snapshot: s.snapshot.clone(),
                frozen: s.frozen.clone(),
            })
        });
        Ok(node)
    }

    fn session_user(&self) -> StoreResult<String> {
        let mut state = self.state.lock();
        state.check_fault(StoreOperation::SessionUser)?;
        Ok(self.session_user.clone())
    }
}
