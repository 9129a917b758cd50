//! State transitions
//!
//! A transition runs in three phases: the branch selected by the target
//! state, the last-user stamp, then notifications. A store failure aborts the
//! remaining steps; writes persisted before it stay in place.

use super::PublicationLifecycleService;
use crate::domain::{
    property_keys, ItemId, PropertyValue, PublicationState, RevisionData, RevisionLedger,
    TransitionBranch, TransitionContext, TransitionKind, TransitionTarget,
};
use crate::error::{LifecycleError, LifecycleResult};
use crate::events::LifecycleEvent;
use crate::ports::outbound::{
    ActivityEligibility, EventNotifier, LifecycleDefinitionProvider, TimeSource, UserResolver,
    VersionedStore,
};
use tracing::{debug, info, warn};

/// Inputs shared by every branch of one transition.
struct Transition<'a> {
    item: &'a ItemId,
    target: &'a TransitionTarget,
    context: &'a TransitionContext,
    user: &'a str,
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
    pub(crate) fn execute_transition(
        &self,
        item: &ItemId,
        requested: &str,
        context: &TransitionContext,
    ) -> LifecycleResult<()> {
        let target = self.resolve_target(item, requested)?;
        info!(item = %item, target = %target, "[authoring] changing state");

        self.ensure_versionable(item)?;
        let user = self.users.current_user();
        let mut ledger = self.load_ledger(item)?;

        let transition = Transition {
            item,
            target: &target,
            context,
            user: &user,
        };
        match target.branch() {
            TransitionBranch::StateOnly => self.to_simple_state(&transition, &mut ledger)?,
            TransitionBranch::Archive => self.to_archived(&transition, &mut ledger)?,
            TransitionBranch::Draft => self.to_draft(&transition, &mut ledger)?,
            TransitionBranch::Publish => self.to_published(&transition, &mut ledger)?,
        }

        self.store.set_text(item, property_keys::LAST_USER, &user)?;
        if !self.store.is_new(item)? {
            self.store.persist(item)?;
        }

        self.notify(&transition);
        info!(item = %item, target = %target, user = %user, "[authoring] state changed");
        Ok(())
    }

    /// Map the requested name to a known state or a state of the item's lifecycle.
    pub(crate) fn resolve_target(
        &self,
        item: &ItemId,
        requested: &str,
    ) -> LifecycleResult<TransitionTarget> {
        if let Some(state) = PublicationState::parse(requested) {
            return Ok(TransitionTarget::Known(state));
        }

        let (name, definition) = self.lifecycle_of(item)?;
        match definition {
            Some(definition) if definition.defines(requested) => {
                Ok(TransitionTarget::Custom(requested.to_string()))
            }
            _ => Err(LifecycleError::UnknownState {
                state: requested.to_string(),
                lifecycle: name.unwrap_or_default(),
            }),
        }
    }

    /// pending, approved, staged, enrolled, unpublished, obsolete and custom states.
    fn to_simple_state(
        &self,
        t: &Transition<'_>,
        ledger: &mut RevisionLedger,
    ) -> LifecycleResult<()> {
        let state = t.target.name();
        self.store
            .set_text(t.item, property_keys::CURRENT_STATE, state)?;

        let item_name = self.store.item_name(t.item)?;
        self.write_log(
            t.item,
            t.context.log_label(&item_name),
            state,
            t.user,
            t.target.transition_kind(),
        )?;

        ledger.record(t.item.as_str(), state, t.user);
        self.write_ledger(t.item, ledger)
    }

    fn to_archived(&self, t: &Transition<'_>, ledger: &mut RevisionLedger) -> LifecycleResult<()> {
        let state = PublicationState::Archived;
        self.store
            .set_text(t.item, property_keys::CURRENT_STATE, state.as_str())?;
        self.store.set_text(t.item, property_keys::LIVE_REVISION, "")?;

        let item_name = self.store.item_name(t.item)?;
        self.write_log(
            t.item,
            &item_name,
            state.as_str(),
            t.user,
            Some(TransitionKind::ChangeToArchived),
        )?;

        ledger.record(t.item.as_str(), state.as_str(), t.user);
        self.write_ledger(t.item, ledger)
    }

    /// The state write is persisted before the ledger is touched.
    fn to_draft(&self, t: &Transition<'_>, ledger: &mut RevisionLedger) -> LifecycleResult<()> {
        let state = PublicationState::Draft;
        self.store
            .set_text(t.item, property_keys::CURRENT_STATE, state.as_str())?;
        self.store.persist(t.item)?;

        let own = t.item.as_str();
        if ledger.contains(own) {
            let reset_to = self.first_lifecycle_state(t.item)?;
            ledger.record(own, &reset_to, t.user);
        } else {
            ledger.insert(RevisionData::new(
                own,
                PublicationState::Enrolled.as_str(),
                t.user,
            ));
        }
        self.write_ledger(t.item, ledger)?;

        let base = self.store.base_snapshot(t.item)?;
        self.write_log(
            t.item,
            &base.name,
            state.as_str(),
            t.user,
            Some(TransitionKind::ChangeToDraft),
        )
    }

    /// First state of the item's lifecycle, `enrolled` when none is configured.
    fn first_lifecycle_state(&self, item: &ItemId) -> LifecycleResult<String> {
        let (name, definition) = self.lifecycle_of(item)?;
        let first = match definition {
            Some(definition) => definition.first_state().map(str::to_string),
            None => {
                warn!(
                    item = %item,
                    lifecycle = name.as_deref().unwrap_or_default(),
                    "[authoring] lifecycle definition not found, resetting draft to enrolled"
                );
                None
            }
        };
        Ok(first.unwrap_or_else(|| PublicationState::Enrolled.as_str().to_string()))
    }

    /// Prune history and capture the new live snapshot.
    ///
    /// Afterwards the ledger holds exactly the live snapshot's entry and the
    /// item's own entry, both `published`.
    fn to_published(
        &self,
        t: &Transition<'_>,
        ledger: &mut RevisionLedger,
    ) -> LifecycleResult<()> {
        let state = PublicationState::Published.as_str();
        ledger.clear();

        self.store.set_text(t.item, property_keys::LIVE_REVISION, "")?;
        self.store.set_property(
            t.item,
            property_keys::LIVE_DATE,
            PropertyValue::Date(self.clock.now()),
        )?;
        self.store
            .set_text(t.item, property_keys::CURRENT_STATE, state)?;
        self.store.persist(t.item)?;
        self.store.reload(t.item)?;

        self.prune_history(t.item)?;

        if !self.store.is_checked_out(t.item)? {
            self.store.checkout(t.item)?;
        }
        let live = self.store.checkin(t.item)?;
        self.store.checkout(t.item)?;
        self.store.reload(t.item)?;
        debug!(item = %t.item, snapshot = %live.id, name = %live.name, "[authoring] live snapshot created");

        ledger.record(live.id.as_str(), state, t.user);
        self.write_ledger(t.item, ledger)?;

        self.store
            .set_text(t.item, property_keys::LIVE_REVISION, live.id.as_str())?;
        self.store.persist(t.item)?;

        self.write_log(
            t.item,
            &live.name,
            state,
            t.user,
            Some(TransitionKind::ChangeToLive),
        )?;

        ledger.record(t.item.as_str(), state, t.user);
        self.write_ledger(t.item, ledger)
    }

    /// `enrolled` only gets the trailing post-update event.
    fn notify(&self, t: &Transition<'_>) {
        let item = t.item.clone();
        let state = t.target.name().to_string();

        if !t.target.is(PublicationState::Enrolled) {
            if t.context.is_initial_phase {
                self.notifier.broadcast(&LifecycleEvent::InitialState {
                    item: item.clone(),
                    state,
                });
            } else {
                self.notifier.broadcast(&LifecycleEvent::StateChanged {
                    item: item.clone(),
                    state: state.clone(),
                });
                if self.eligibility.is_eligible(&item) {
                    self.notifier.broadcast(&LifecycleEvent::ActivityStateChanged {
                        item: item.clone(),
                        new_state: state,
                    });
                }
            }
        }

        self.notifier
            .broadcast(&LifecycleEvent::PostUpdateState { item });
    }
}
