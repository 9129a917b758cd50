//! # Publication Lifecycle Service
//!
//! The service implementing [`PublicationLifecycleApi`].
//!
//! ## Architecture
//!
//! This service:
//! 1. Executes state transitions against the versioned store (`transitions`)
//! 2. Prunes snapshot history when content is published (`pruning`)
//! 3. Resolves the node shown to live and edit viewers (`resolver`)
//! 4. Receives every collaborator through dependency injection

mod pruning;
mod resolver;
mod transitions;

use crate::config::LifecycleConfig;
use crate::domain::{
    property_keys, Capability, ItemId, ItemView, LifecycleDefinition, PublicationState,
    RevisionLedger, TransitionContext, TransitionKind, VersionLogEntry, ViewerContext,
    POSSIBLE_STATES,
};
use crate::error::{LifecycleError, LifecycleResult};
use crate::events::LifecycleEvent;
use crate::ports::inbound::PublicationLifecycleApi;
use crate::ports::outbound::{
    ActivityEligibility, EventNotifier, LifecycleDefinitionProvider, TimeSource, UserResolver,
    VersionedStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Dependencies for [`PublicationLifecycleService`]
pub struct LifecycleDependencies<S, L, U, N, A, T> {
    pub store: Arc<S>,
    pub lifecycles: Arc<L>,
    pub users: Arc<U>,
    pub notifier: Arc<N>,
    pub eligibility: Arc<A>,
    pub clock: Arc<T>,
}

/// The publication lifecycle engine.
///
/// Holds no per-item state: everything lives in the store. Callers serialize
/// transitions on the same item.
pub struct PublicationLifecycleService<S, L, U, N, A, T>
where
    S: VersionedStore,
    L: LifecycleDefinitionProvider,
    U: UserResolver,
    N: EventNotifier,
    A: ActivityEligibility,
    T: TimeSource,
{
    pub(crate) config: LifecycleConfig,
    pub(crate) store: Arc<S>,
    pub(crate) lifecycles: Arc<L>,
    pub(crate) users: Arc<U>,
    pub(crate) notifier: Arc<N>,
    pub(crate) eligibility: Arc<A>,
    pub(crate) clock: Arc<T>,
}

impl<S, L, U, N, A, T> PublicationLifecycleService<S, L, U, N, A, T>
where
    S: VersionedStore,
    L: LifecycleDefinitionProvider,
    U: UserResolver,
    N: EventNotifier,
    A: ActivityEligibility,
    T: TimeSource,
{
    pub fn new(config: LifecycleConfig, deps: LifecycleDependencies<S, L, U, N, A, T>) -> Self {
        Self {
            config,
            store: deps.store,
            lifecycles: deps.lifecycles,
            users: deps.users,
            notifier: deps.notifier,
            eligibility: deps.eligibility,
            clock: deps.clock,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Attach the versioning capability if missing, durably.
    pub(crate) fn ensure_versionable(&self, item: &ItemId) -> LifecycleResult<()> {
        if !self.store.has_capability(item, Capability::Versionable)? {
            self.store.add_versioning_capability(item)?;
            self.store.persist(item)?;
            debug!(item = %item, "[authoring] versioning capability added");
        }
        Ok(())
    }

    /// Lifecycle definition recorded on the item, if any is registered.
    pub(crate) fn lifecycle_of(
        &self,
        item: &ItemId,
    ) -> LifecycleResult<(Option<String>, Option<LifecycleDefinition>)> {
        let name = self.store.get_text(item, property_keys::LIFECYCLE)?;
        let definition = name
            .as_deref()
            .and_then(|name| self.lifecycles.lifecycle(name));
        Ok((name, definition))
    }

    /// Load the ledger; an undecodable ledger reads as empty.
    pub(crate) fn load_ledger(&self, item: &ItemId) -> LifecycleResult<RevisionLedger> {
        let value = self.store.get_property(item, property_keys::REVISION_DATA)?;
        Ok(RevisionLedger::from_property(item.as_str(), value.as_ref()))
    }

    pub(crate) fn write_ledger(
        &self,
        item: &ItemId,
        ledger: &RevisionLedger,
    ) -> LifecycleResult<()> {
        self.store
            .set_property(item, property_keys::REVISION_DATA, ledger.to_property())?;
        debug!(item = %item, entries = ledger.len(), "[authoring] revision ledger written");
        Ok(())
    }

    /// Replace the single-slot log entry.
    pub(crate) fn write_log(
        &self,
        item: &ItemId,
        name: &str,
        state: &str,
        author: &str,
        kind: Option<TransitionKind>,
    ) -> LifecycleResult<()> {
        let entry = VersionLogEntry::new(name, state, author, self.clock.now(), kind);
        self.store
            .set_property(item, property_keys::HISTORY, entry.to_property())?;
        Ok(())
    }
}

impl<S, L, U, N, A, T> PublicationLifecycleApi for PublicationLifecycleService<S, L, U, N, A, T>
where
    S: VersionedStore,
    L: LifecycleDefinitionProvider,
    U: UserResolver,
    N: EventNotifier,
    A: ActivityEligibility,
    T: TimeSource,
{
    fn change_state(
        &self,
        item: &ItemId,
        target: &str,
        context: &TransitionContext,
    ) -> LifecycleResult<()> {
        self.execute_transition(item, target, context)
    }

    fn resolve_viewable(&self, item: &ItemId, viewer: Option<&ViewerContext>) -> Option<ItemView> {
        self.resolve(item, viewer)
    }

    fn enroll(&self, item: &ItemId, lifecycle: Option<&str>) -> LifecycleResult<()> {
        let lifecycle = lifecycle.unwrap_or(&self.config.default_lifecycle);
        if self.lifecycles.lifecycle(lifecycle).is_none() {
            return Err(LifecycleError::UnknownLifecycle {
                name: lifecycle.to_string(),
            });
        }

        let user = self.users.current_user();
        let enrolled = PublicationState::Enrolled;
        self.store
            .add_capability(item, Capability::PublicationLifecycle)?;
        self.store.add_versioning_capability(item)?;
        self.store
            .set_text(item, property_keys::LIFECYCLE, lifecycle)?;
        self.store
            .set_text(item, property_keys::CURRENT_STATE, enrolled.as_str())?;
        self.write_ledger(item, &RevisionLedger::new())?;
        let name = self.store.item_name(item)?;
        self.write_log(
            item,
            &name,
            enrolled.as_str(),
            &user,
            Some(enrolled.transition_kind()),
        )?;
        self.store.set_text(item, property_keys::LAST_USER, &user)?;
        self.store.persist(item)?;

        info!(item = %item, lifecycle, "[authoring] item enrolled");
        self.notifier.broadcast(&LifecycleEvent::PostUpdateState {
            item: item.clone(),
        });
        Ok(())
    }

    fn can_enroll(&self, item: &ItemId) -> LifecycleResult<bool> {
        Ok(!self
            .store
            .has_capability(item, Capability::PublicationLifecycle)?)
    }

    fn update_lifecycle_on_change_content(
        &self,
        item: &ItemId,
        new_state: Option<&str>,
    ) -> LifecycleResult<bool> {
        let current = self
            .store
            .get_text(item, property_keys::CURRENT_STATE)?
            .ok_or_else(|| LifecycleError::MissingProperty {
                item: item.to_string(),
                key: property_keys::CURRENT_STATE,
            })?;

        let target = match new_state {
            Some(state) => state.to_string(),
            None => {
                let (name, definition) = self.lifecycle_of(item)?;
                let name = name.ok_or_else(|| LifecycleError::MissingProperty {
                    item: item.to_string(),
                    key: property_keys::LIFECYCLE,
                })?;
                let definition =
                    definition.ok_or(LifecycleError::UnknownLifecycle { name: name.clone() })?;
                match definition.first_state() {
                    Some(first) => first.to_string(),
                    None => {
                        debug!(item = %item, lifecycle = %name, "[authoring] lifecycle has no states, content change ignored");
                        return Ok(false);
                    }
                }
            }
        };

        if current == target {
            return Ok(false);
        }
        self.change_state(item, &target, &TransitionContext::new())?;
        Ok(true)
    }

    fn possible_states(&self) -> &'static [PublicationState] {
        &POSSIBLE_STATES
    }

    fn lifecycle_name(&self) -> &str {
        &self.config.lifecycle_name
    }

    fn lifecycle_type(&self) -> &str {
        &self.config.lifecycle_type
    }

    fn current_state(&self, item: &ItemId) -> LifecycleResult<Option<String>> {
        Ok(self.store.get_text(item, property_keys::CURRENT_STATE)?)
    }

    fn revision_ledger(&self, item: &ItemId) -> LifecycleResult<RevisionLedger> {
        self.load_ledger(item)
    }

    fn last_log_entry(&self, item: &ItemId) -> LifecycleResult<Option<VersionLogEntry>> {
        self.store
            .get_property(item, property_keys::HISTORY)?
            .map(|value| VersionLogEntry::from_property(&value))
            .transpose()
    }
}
