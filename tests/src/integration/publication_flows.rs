//! # Publication Flow Tests
//!
//! Drives items through complete editorial journeys and checks the stored
//! state after every step:
//!
//! ```text
//! enroll → draft → pending → approved → staged → published
//!        → edit (draft) → published → archived
//! ```

#[cfg(test)]
mod tests {
    use std::io::Write;

    use authoring_lifecycle::adapters::{
        InMemoryLifecycleRegistry, InMemoryVersionedStore, RecordingNotifier,
    };
    use authoring_lifecycle::{
        ItemId, ItemView, LifecycleDefinitionProvider, PublicationState, TransitionContext,
        TransitionKind, VersionedStore, ViewerContext,
    };

    use crate::fixtures::{Fixture, LIFECYCLES_JSON, NOW};

    fn change(fx: &Fixture<RecordingNotifier>, item: &ItemId, target: &str) {
        fx.api()
            .change_state(item, target, &TransitionContext::new())
            .unwrap();
    }

    // =============================================================================
    // FULL JOURNEY
    // =============================================================================

    #[test]
    fn test_editorial_journey() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("welcome-page", "lifecycle1");
        let live_viewer = ViewerContext::live();

        assert_eq!(fx.state(&item).as_deref(), Some("enrolled"));
        assert!(fx.saved_ledger(&item).is_empty());
        assert_eq!(fx.api().resolve_viewable(&item, Some(&live_viewer)), None);

        change(&fx, &item, "draft");
        for state in ["pending", "approved", "staged"] {
            change(&fx, &item, state);
            assert_eq!(fx.state(&item).as_deref(), Some(state));
            let ledger = fx.saved_ledger(&item);
            assert_eq!(ledger.len(), 1);
            assert_eq!(ledger.get(item.as_str()).map(|r| r.state.as_str()), Some(state));
            // Nothing is live before the first publish.
            assert_eq!(fx.api().resolve_viewable(&item, Some(&live_viewer)), None);
        }

        change(&fx, &item, "published");
        let first_live = fx.live_revision(&item);
        assert!(!first_live.is_empty());
        assert_eq!(fx.store.history(&item).len(), 2);

        // Editing sends the item back to draft; the public keeps the live snapshot.
        assert!(fx.api().on_content_changed(&item).unwrap());
        match fx.api().resolve_viewable(&item, Some(&live_viewer)) {
            Some(ItemView::Frozen(frozen)) => {
                assert_eq!(frozen.snapshot.id.as_str(), first_live);
            }
            other => panic!("expected live snapshot, got {other:?}"),
        }
        assert_eq!(
            fx.api().resolve_viewable(&item, Some(&ViewerContext::edit())),
            Some(ItemView::WorkingCopy(item.clone()))
        );

        change(&fx, &item, "published");
        let second_live = fx.live_revision(&item);
        assert_ne!(first_live, second_live);
        let history = fx.store.history(&item);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].id.as_str(), second_live);

        change(&fx, &item, "archived");
        assert_eq!(fx.live_revision(&item), "");
        assert_eq!(fx.api().resolve_viewable(&item, Some(&live_viewer)), None);
        assert_eq!(
            fx.api().last_log_entry(&item).unwrap().and_then(|log| log.kind),
            Some(TransitionKind::ChangeToArchived)
        );
    }

    // =============================================================================
    // PUBLISH INVARIANTS
    // =============================================================================

    #[test]
    fn test_publish_ledger_holds_live_and_own_entries() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("news", "lifecycle1");
        change(&fx, &item, "draft");

        change(&fx, &item, "published");

        let live = fx.live_revision(&item);
        let ledger = fx.saved_ledger(&item);
        let mut revisions: Vec<&str> = ledger.entries().map(|r| r.revision.as_str()).collect();
        revisions.sort_unstable();
        let mut expected = vec![live.as_str(), item.as_str()];
        expected.sort_unstable();
        assert_eq!(revisions, expected);
        assert!(ledger
            .entries()
            .all(|r| r.state == "published" && r.author == "alice"));

        let log = fx.api().last_log_entry(&item).unwrap().unwrap();
        assert_eq!(log.timestamp, NOW);
        assert_eq!(log.kind, Some(TransitionKind::ChangeToLive));
    }

    #[test]
    fn test_republish_replaces_history() {
        // S0 = root (kept), S1 = live, Sx = older extra snapshot
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("news", "lifecycle1");
        change(&fx, &item, "published");
        let s1 = fx.live_revision(&item);
        let sx = fx.store.checkin(&item).unwrap();
        fx.store.checkout(&item).unwrap();
        assert_eq!(fx.store.history(&item).len(), 3);

        fx.clock.advance(60_000);
        change(&fx, &item, "published");

        let history = fx.store.history(&item);
        let names: Vec<&str> = history.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], "jcr:rootVersion");
        assert!(history.iter().all(|s| s.id.as_str() != s1 && s.id != sx.id));

        let s2 = fx.live_revision(&item);
        assert_eq!(history[1].id.as_str(), s2);
        assert!(!fx.saved_ledger(&item).contains(&s1));
        assert_eq!(fx.api().last_log_entry(&item).unwrap().unwrap().timestamp, NOW + 60_000);
    }

    // =============================================================================
    // DRAFT AND LIFECYCLE DEFINITIONS
    // =============================================================================

    #[test]
    fn test_redraft_resets_to_first_configured_state() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("guide", "editorial");
        change(&fx, &item, "draft");
        let first = fx.saved_ledger(&item);
        assert_eq!(first.get(item.as_str()).map(|r| r.state.as_str()), Some("enrolled"));

        change(&fx, &item, "draft");
        let second = fx.saved_ledger(&item);
        assert_eq!(second.get(item.as_str()).map(|r| r.state.as_str()), Some("review"));
        assert_eq!(second.get(item.as_str()).map(|r| r.author.as_str()), Some("alice"));

        change(&fx, &item, "draft");
        assert_eq!(fx.saved_ledger(&item), second);
    }

    #[test]
    fn test_lifecycle_states_drive_content_changes() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("guide", "editorial");

        assert!(fx.api().update_lifecycle_on_change_content(&item, None).unwrap());
        assert_eq!(fx.state(&item).as_deref(), Some("review"));

        change(&fx, &item, "live");
        assert_eq!(fx.state(&item).as_deref(), Some("live"));
        assert_eq!(fx.api().last_log_entry(&item).unwrap().unwrap().kind, None);

        assert!(fx.api().update_lifecycle_on_change_content(&item, None).unwrap());
        assert_eq!(fx.state(&item).as_deref(), Some("review"));
    }

    #[test]
    fn test_lifecycles_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LIFECYCLES_JSON.as_bytes()).unwrap();

        let registry = InMemoryLifecycleRegistry::from_json_file(file.path()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.lifecycle("editorial").and_then(|l| l.first_state().map(str::to_string)),
            Some("review".to_string())
        );
    }

    // =============================================================================
    // VIEWS
    // =============================================================================

    #[test]
    fn test_unpublished_content_is_hidden_from_everyone() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("promo", "lifecycle1");
        change(&fx, &item, "published");

        change(&fx, &item, "unpublished");

        for viewer in [None, Some(ViewerContext::live()), Some(ViewerContext::edit())] {
            assert_eq!(fx.api().resolve_viewable(&item, viewer.as_ref()), None);
        }
        // The live pointer is kept; it is the state that hides the content.
        assert!(!fx.live_revision(&item).is_empty());
    }

    #[test]
    fn test_snapshot_without_frozen_content_is_returned_as_is() {
        let fx = Fixture::build(
            InMemoryVersionedStore::new().without_frozen_capture(),
            "alice",
            RecordingNotifier::new(),
        );
        let item = fx.enrolled("promo", "lifecycle1");
        change(&fx, &item, "published");
        let live = fx.live_revision(&item);
        change(&fx, &item, "staged");

        match fx.api().resolve_viewable(&item, Some(&ViewerContext::live())) {
            Some(ItemView::Snapshot(snapshot)) => assert_eq!(snapshot.id.as_str(), live),
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_metadata_is_exposed_through_the_api() {
        let fx = Fixture::recording("alice");
        assert_eq!(fx.api().possible_states().len(), 6);
        assert!(fx
            .api()
            .possible_states()
            .contains(&PublicationState::Obsolete));
        assert_eq!(fx.api().lifecycle_name(), "Authoring publication");
    }
}
