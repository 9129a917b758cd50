//! Service wiring shared by the integration scenarios.

use std::sync::Arc;

use authoring_lifecycle::adapters::{
    FallbackUserResolver, FixedTimeSource, InMemoryLifecycleRegistry, InMemoryVersionedStore,
    ListenerRegistry, RecordingNotifier, StaticEligibility, StaticUser, StoreSessionUser,
};
use authoring_lifecycle::{
    property_keys, EventNotifier, ItemId, LifecycleConfig, LifecycleDependencies,
    PublicationLifecycleApi, PublicationLifecycleService, RevisionLedger, VersionedStore,
};

/// Fixed wall-clock reading used by every fixture.
pub const NOW: u64 = 1_700_000_000_000;

/// Lifecycle definitions document used by the scenarios.
pub const LIFECYCLES_JSON: &str = r#"{
    "lifecycles": [
        {"name": "lifecycle1", "states": [
            {"state": "draft"}, {"state": "pending"}, {"state": "published"}
        ]},
        {"name": "editorial", "states": [
            {"state": "review", "membership": "editors"}, {"state": "live"}
        ]},
        {"name": "bare", "states": []}
    ]
}"#;

pub type FixtureService<N> = PublicationLifecycleService<
    InMemoryVersionedStore,
    InMemoryLifecycleRegistry,
    FallbackUserResolver,
    N,
    StaticEligibility,
    FixedTimeSource,
>;

/// A lifecycle service over in-memory adapters.
pub struct Fixture<N: EventNotifier> {
    pub service: FixtureService<N>,
    pub store: Arc<InMemoryVersionedStore>,
    pub notifier: Arc<N>,
    pub eligibility: Arc<StaticEligibility>,
    pub clock: Arc<FixedTimeSource>,
}

impl Fixture<RecordingNotifier> {
    pub fn recording(user: &str) -> Self {
        Self::build(InMemoryVersionedStore::new(), user, RecordingNotifier::new())
    }
}

impl Fixture<ListenerRegistry> {
    pub fn with_listeners(user: &str) -> Self {
        Self::build(InMemoryVersionedStore::new(), user, ListenerRegistry::new())
    }
}

impl<N: EventNotifier> Fixture<N> {
    /// Users resolve as `user`, then the store session user `system`.
    pub fn build(store: InMemoryVersionedStore, user: &str, notifier: N) -> Self {
        let store = Arc::new(store.with_session_user("system"));
        let notifier = Arc::new(notifier);
        let eligibility = Arc::new(StaticEligibility::all());
        let clock = Arc::new(FixedTimeSource::new(NOW));

        let identity = if user.is_empty() {
            StaticUser::absent("identity")
        } else {
            StaticUser::new("identity", user)
        };
        let users = FallbackUserResolver::new()
            .with_source(Arc::new(identity))
            .with_source(Arc::new(StoreSessionUser::new(store.clone())));

        let lifecycles = InMemoryLifecycleRegistry::from_json(LIFECYCLES_JSON)
            .unwrap_or_else(|e| panic!("fixture lifecycles: {e}"));
        let deps = LifecycleDependencies {
            store: store.clone(),
            lifecycles: Arc::new(lifecycles),
            users: Arc::new(users),
            notifier: notifier.clone(),
            eligibility: eligibility.clone(),
            clock: clock.clone(),
        };
        Self {
            service: PublicationLifecycleService::new(LifecycleConfig::default(), deps),
            store,
            notifier,
            eligibility,
            clock,
        }
    }

    /// The service behind its driving port.
    pub fn api(&self) -> &dyn PublicationLifecycleApi {
        &self.service
    }

    /// Create and enroll an item.
    pub fn enrolled(&self, name: &str, lifecycle: &str) -> ItemId {
        let item = self.store.create_item(name);
        self.service
            .enroll(&item, Some(lifecycle))
            .unwrap_or_else(|e| panic!("enroll {name}: {e}"));
        item
    }

    pub fn state(&self, item: &ItemId) -> Option<String> {
        self.service
            .current_state(item)
            .unwrap_or_else(|e| panic!("current state: {e}"))
    }

    /// Ledger as persisted, ignoring staged writes.
    pub fn saved_ledger(&self, item: &ItemId) -> RevisionLedger {
        let saved = self.store.saved_property(item, property_keys::REVISION_DATA);
        RevisionLedger::from_property(item.as_str(), saved.as_ref())
    }

    pub fn live_revision(&self, item: &ItemId) -> String {
        self.store
            .get_text(item, property_keys::LIVE_REVISION)
            .ok()
            .flatten()
            .unwrap_or_default()
    }
}
