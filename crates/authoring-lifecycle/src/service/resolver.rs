//! Live-revision resolution
//!
//! Editors see the working copy. Live viewers see the frozen content of the
//! live snapshot, or nothing. Lookup failures read as nothing.

use super::PublicationLifecycleService;
use crate::domain::{property_keys, ItemId, ItemView, PublicationState, StoredNode, ViewerContext};
use crate::error::LifecycleResult;
use crate::ports::outbound::{
    ActivityEligibility, EventNotifier, LifecycleDefinitionProvider, TimeSource, UserResolver,
    VersionedStore,
};
use tracing::warn;

impl<S, L, U, N, A, T> PublicationLifecycleService<S, L, U, N, A, T>
where
    S: VersionedStore,
    L: LifecycleDefinitionProvider,
    U: UserResolver,
    N: EventNotifier,
    A: ActivityEligibility,
    T: TimeSource,
{
    pub(crate) fn resolve(&self, item: &ItemId, viewer: Option<&ViewerContext>) -> Option<ItemView> {
        match self.try_resolve(item, viewer) {
            Ok(view) => view,
            Err(e) => {
                warn!(item = %item, error = %e, "[authoring] live revision lookup failed");
                None
            }
        }
    }

    fn try_resolve(
        &self,
        item: &ItemId,
        viewer: Option<&ViewerContext>,
    ) -> LifecycleResult<Option<ItemView>> {
        let state = self.store.get_text(item, property_keys::CURRENT_STATE)?;
        let state = state.as_deref();

        // Neither editors nor the public see enrolled or unpublished content.
        if state == Some(PublicationState::Enrolled.as_str())
            || state == Some(PublicationState::Unpublished.as_str())
        {
            return Ok(None);
        }

        if viewer.map_or(true, ViewerContext::is_edit)
            || state == Some(PublicationState::Published.as_str())
        {
            return Ok(Some(ItemView::WorkingCopy(item.clone())));
        }

        let live = self
            .store
            .get_text(item, property_keys::LIVE_REVISION)?
            .unwrap_or_default();
        if live.is_empty() {
            return Ok(None);
        }

        let view = self.store.fetch_by_id(&live)?.map(|node| match node {
            StoredNode::Item(id) => ItemView::WorkingCopy(id),
            StoredNode::Snapshot {
                frozen: Some(frozen),
                ..
            } => ItemView::Frozen(frozen),
            StoredNode::Snapshot {
                snapshot,
                frozen: None,
            } => ItemView::Snapshot(snapshot),
        });
        Ok(view)
    }
}
