//! # Inbound Ports (Driving Ports)
//!
//! The API the request-handling layer calls. Callers serialize transitions
//! per item; the engine takes no lock of its own.

use crate::domain::{
    ItemId, ItemView, PublicationState, RevisionLedger, TransitionContext, VersionLogEntry,
    ViewerContext,
};
use crate::error::LifecycleResult;

/// Primary publication lifecycle API
pub trait PublicationLifecycleApi: Send + Sync {
    /// Move `item` to `target`.
    ///
    /// Store failures abort the remaining steps; writes already persisted are
    /// not rolled back.
    fn change_state(
        &self,
        item: &ItemId,
        target: &str,
        context: &TransitionContext,
    ) -> LifecycleResult<()>;

    /// Node to render for the viewer, or `None` when nothing is visible.
    /// Lookup failures are reported as `None`.
    fn resolve_viewable(&self, item: &ItemId, viewer: Option<&ViewerContext>) -> Option<ItemView>;

    /// Put an item under lifecycle control in the `enrolled` state.
    fn enroll(&self, item: &ItemId, lifecycle: Option<&str>) -> LifecycleResult<()>;

    /// Whether the item can still be enrolled.
    fn can_enroll(&self, item: &ItemId) -> LifecycleResult<bool>;

    /// Content-change hook. `None` selects the lifecycle's first state.
    /// Returns whether a transition ran.
    fn update_lifecycle_on_change_content(
        &self,
        item: &ItemId,
        new_state: Option<&str>,
    ) -> LifecycleResult<bool>;

    /// Content-change hook moving edited content back to `draft`.
    fn on_content_changed(&self, item: &ItemId) -> LifecycleResult<bool> {
        self.update_lifecycle_on_change_content(item, Some(PublicationState::Draft.as_str()))
    }

    /// States advertised to editors.
    fn possible_states(&self) -> &'static [PublicationState];

    fn lifecycle_name(&self) -> &str;

    fn lifecycle_type(&self) -> &str;

    fn current_state(&self, item: &ItemId) -> LifecycleResult<Option<String>>;

    fn revision_ledger(&self, item: &ItemId) -> LifecycleResult<RevisionLedger>;

    fn last_log_entry(&self, item: &ItemId) -> LifecycleResult<Option<VersionLogEntry>>;
}
