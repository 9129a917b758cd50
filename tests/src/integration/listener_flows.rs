//! # Listener Flow Tests
//!
//! Event delivery through the listener registry: ordering, filtering and
//! isolation of failing listeners. Also covers who gets recorded as the
//! author of a transition.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use authoring_lifecycle::adapters::{
        InMemoryVersionedStore, LifecycleListener, RecordingNotifier,
    };
    use authoring_lifecycle::{
        property_keys, EventKind, ItemId, LifecycleEvent, PropertyValue, PublicationLifecycleApi,
        TransitionContext,
    };
    use parking_lot::Mutex;

    use crate::fixtures::Fixture;

    /// Keeps `(kind, state)` pairs for accepted events.
    struct Journal {
        name: &'static str,
        only: Option<EventKind>,
        seen: Mutex<Vec<(EventKind, Option<String>)>>,
    }

    impl Journal {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                only: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn only(name: &'static str, kind: EventKind) -> Arc<Self> {
            Arc::new(Self {
                name,
                only: Some(kind),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn kinds(&self) -> Vec<EventKind> {
            self.seen.lock().iter().map(|(kind, _)| *kind).collect()
        }
    }

    impl LifecycleListener for Journal {
        fn name(&self) -> &str {
            self.name
        }

        fn accepts(&self, kind: EventKind) -> bool {
            self.only.map_or(true, |only| only == kind)
        }

        fn on_event(&self, event: &LifecycleEvent) -> Result<(), String> {
            self.seen
                .lock()
                .push((event.kind(), event.state().map(str::to_string)));
            Ok(())
        }
    }

    struct Broken;

    impl LifecycleListener for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn on_event(&self, event: &LifecycleEvent) -> Result<(), String> {
            Err(format!("cannot handle {}", event.kind()))
        }
    }

    fn change(api: &dyn PublicationLifecycleApi, item: &ItemId, target: &str) {
        api.change_state(item, target, &TransitionContext::new())
            .unwrap();
    }

    #[test]
    fn test_event_sequence_across_transitions() {
        let fx = Fixture::with_listeners("alice");
        let journal = Journal::new("journal");
        fx.notifier.register(journal.clone());

        let item = fx.enrolled("post", "lifecycle1");
        fx.api()
            .change_state(&item, "draft", &TransitionContext::initial_phase())
            .unwrap();
        change(fx.api(), &item, "published");
        change(fx.api(), &item, "enrolled");

        use EventKind::*;
        assert_eq!(
            journal.kinds(),
            vec![
                // enroll
                PostUpdateState,
                // draft, initial phase
                InitialState,
                PostUpdateState,
                // published
                StateChanged,
                ActivityStateChanged,
                PostUpdateState,
                // back to enrolled
                PostUpdateState,
            ]
        );
        let seen = journal.seen.lock();
        assert_eq!(seen[1].1.as_deref(), Some("draft"));
        assert_eq!(seen[3].1.as_deref(), Some("published"));
        assert_eq!(seen[4].1.as_deref(), Some("published"));
        assert_eq!(fx.notifier.events_dispatched(), 7);
    }

    #[test]
    fn test_failing_listener_does_not_break_transition() {
        let fx = Fixture::with_listeners("alice");
        let journal = Journal::new("journal");
        fx.notifier.register(Arc::new(Broken));
        fx.notifier.register(journal.clone());
        let item = fx.enrolled("post", "lifecycle1");

        change(fx.api(), &item, "pending");

        assert_eq!(fx.state(&item).as_deref(), Some("pending"));
        // Every event still reaches the listener behind the broken one.
        assert_eq!(journal.kinds().len(), 4);
        assert_eq!(fx.notifier.listener_failures(), 4);
    }

    #[test]
    fn test_listener_filters_event_kinds() {
        let fx = Fixture::with_listeners("alice");
        let activity = Journal::only("activity", EventKind::ActivityStateChanged);
        fx.notifier.register(activity.clone());
        let item = fx.enrolled("post", "lifecycle1");
        let quiet = fx.enrolled("quiet", "lifecycle1");
        fx.eligibility.toggle(quiet.clone());

        change(fx.api(), &item, "pending");
        change(fx.api(), &quiet, "pending");
        change(fx.api(), &item, "approved");

        let seen = activity.seen.lock();
        let states: Vec<_> = seen.iter().map(|(_, s)| s.as_deref()).collect();
        assert_eq!(states, vec![Some("pending"), Some("approved")]);
    }

    #[test]
    fn test_events_follow_durable_writes() {
        /// Reads the persisted state whenever an event arrives.
        struct StateProbe {
            store: Arc<InMemoryVersionedStore>,
            seen: Mutex<Vec<Option<PropertyValue>>>,
        }

        impl LifecycleListener for StateProbe {
            fn name(&self) -> &str {
                "probe"
            }

            fn on_event(&self, event: &LifecycleEvent) -> Result<(), String> {
                let saved = self
                    .store
                    .saved_property(event.item(), property_keys::CURRENT_STATE);
                self.seen.lock().push(saved);
                Ok(())
            }
        }

        let fx = Fixture::with_listeners("alice");
        let item = fx.enrolled("post", "lifecycle1");
        let probe = Arc::new(StateProbe {
            store: fx.store.clone(),
            seen: Mutex::new(Vec::new()),
        });
        fx.notifier.register(probe.clone());

        change(fx.api(), &item, "staged");

        let seen = probe.seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen
            .iter()
            .all(|state| state == &Some(PropertyValue::Text("staged".to_string()))));
    }

    // =============================================================================
    // AUTHORS
    // =============================================================================

    #[test]
    fn test_author_falls_back_to_session_user() {
        let fx = Fixture::recording("");
        let item = fx.enrolled("post", "lifecycle1");

        change(fx.api(), &item, "pending");

        let ledger = fx.saved_ledger(&item);
        assert_eq!(ledger.get(item.as_str()).map(|r| r.author.as_str()), Some("system"));
        let log = fx.api().last_log_entry(&item).unwrap().unwrap();
        assert_eq!(log.author, "system");
    }

    #[test]
    fn test_recording_notifier_sees_each_item_separately() {
        let fx: Fixture<RecordingNotifier> = Fixture::recording("alice");
        let first = fx.enrolled("first", "lifecycle1");
        let second = fx.enrolled("second", "lifecycle1");
        fx.notifier.clear();

        change(fx.api(), &first, "pending");
        change(fx.api(), &second, "archived");

        let items: Vec<ItemId> = fx
            .notifier
            .events()
            .iter()
            .map(|e| e.item().clone())
            .collect();
        assert_eq!(items.len(), 6);
        assert!(items[..3].iter().all(|i| i == &first));
        assert!(items[3..].iter().all(|i| i == &second));
    }
}
