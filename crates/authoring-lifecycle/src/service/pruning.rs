//! Snapshot history pruning
//!
//! Publishing makes the new live snapshot the only history besides the root.
//! The store refuses to delete snapshots while the item is versionable, so
//! the capability is detached for the duration of the deletes.

use super::PublicationLifecycleService;
use crate::domain::{ItemId, SnapshotRef};
use crate::error::LifecycleResult;
use crate::ports::outbound::{
    ActivityEligibility, EventNotifier, LifecycleDefinitionProvider, TimeSource, UserResolver,
    VersionedStore,
};
use tracing::{debug, warn};

impl<S, L, U, N, A, T> PublicationLifecycleService<S, L, U, N, A, T>
where
    S: VersionedStore,
    L: LifecycleDefinitionProvider,
    U: UserResolver,
    N: EventNotifier,
    A: ActivityEligibility,
    T: TimeSource,
{
    /// Delete every historical snapshot except the root one.
    ///
    /// Returns the number of snapshots deleted. A snapshot that cannot be
    /// deleted is logged and skipped.
    pub(crate) fn prune_history(&self, item: &ItemId) -> LifecycleResult<usize> {
        let doomed = self.prunable_snapshots(item)?;

        self.store.remove_versioning_capability(item)?;
        self.store.persist(item)?;
        self.store.reload(item)?;

        let mut deleted = 0;
        for snapshot in &doomed {
            match self.store.delete_snapshot(item, &snapshot.id) {
                Ok(()) => {
                    deleted += 1;
                    debug!(item = %item, snapshot = %snapshot.id, name = %snapshot.name, "[authoring] snapshot deleted");
                }
                Err(e) => {
                    warn!(
                        item = %item,
                        snapshot = %snapshot.id,
                        name = %snapshot.name,
                        error = %e,
                        "[authoring] snapshot deletion failed, continuing"
                    );
                }
            }
        }

        self.store.add_versioning_capability(item)?;
        self.store.persist(item)?;
        self.store.reload(item)?;

        debug!(item = %item, deleted, kept = doomed.len() - deleted, "[authoring] history pruned");
        Ok(deleted)
    }

    /// Snapshots to delete, newest first.
    fn prunable_snapshots(&self, item: &ItemId) -> LifecycleResult<Vec<SnapshotRef>> {
        let root = self.config.root_snapshot_name.as_str();
        let mut snapshots: Vec<SnapshotRef> = self
            .store
            .list_snapshots(item)?
            .into_iter()
            .filter(|s| s.id.as_str() != item.as_str() && s.name != root)
            .collect();
        snapshots.reverse();
        Ok(snapshots)
    }
}
