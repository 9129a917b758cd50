//! # Failure Flow Tests
//!
//! Store faults injected through the in-memory adapter:
//!
//! - a failed step aborts the transition, earlier persisted writes stay
//! - snapshot deletion failures never fail a publish
//! - unreadable ledgers and failed lookups degrade instead of erroring

#[cfg(test)]
mod tests {
    use authoring_lifecycle::adapters::{RecordingNotifier, StoreOperation};
    use authoring_lifecycle::{
        property_keys, ItemId, ItemView, LifecycleError, PropertyValue, StoreError,
        TransitionContext, VersionedStore, ViewerContext,
    };

    use crate::fixtures::Fixture;

    fn change(fx: &Fixture<RecordingNotifier>, item: &ItemId, target: &str) {
        fx.api()
            .change_state(item, target, &TransitionContext::new())
            .unwrap();
    }

    fn saved_state(fx: &Fixture<RecordingNotifier>, item: &ItemId) -> Option<String> {
        fx.store
            .saved_property(item, property_keys::CURRENT_STATE)
            .and_then(|v| v.as_text().map(str::to_string))
    }

    // =============================================================================
    // ABORTED TRANSITIONS
    // =============================================================================

    #[test]
    fn test_failed_publish_keeps_persisted_writes_and_retries_cleanly() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        change(&fx, &item, "published");
        let first_live = fx.live_revision(&item);
        let ledger_before = fx.saved_ledger(&item);

        fx.store.fail_always(StoreOperation::Checkin);
        fx.notifier.clear();
        let err = fx
            .api()
            .change_state(&item, "published", &TransitionContext::new())
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::Backend { .. })));

        // State and cleared pointer were persisted before the check-in; the
        // pruned snapshot is gone and nothing was announced.
        assert_eq!(saved_state(&fx, &item).as_deref(), Some("published"));
        assert_eq!(fx.live_revision(&item), "");
        assert_eq!(fx.store.history(&item).len(), 1);
        assert_eq!(fx.saved_ledger(&item), ledger_before);
        assert!(fx.notifier.events().is_empty());

        fx.store.clear_failures();
        change(&fx, &item, "published");

        let live = fx.live_revision(&item);
        assert!(!live.is_empty());
        assert_ne!(live, first_live);
        assert_eq!(fx.store.history(&item).len(), 2);
        let ledger = fx.saved_ledger(&item);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(&live) && !ledger.contains(&first_live));
    }

    #[test]
    fn test_failed_persist_leaves_saved_state_and_sends_nothing() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        fx.notifier.clear();

        fx.store.fail_always(StoreOperation::Persist);
        let err = fx
            .api()
            .change_state(&item, "approved", &TransitionContext::new())
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Store(_)));
        assert_eq!(saved_state(&fx, &item).as_deref(), Some("enrolled"));
        assert!(fx.notifier.events().is_empty());
    }

    #[test]
    fn test_unknown_state_is_rejected_before_any_write() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        let persisted = fx.store.persist_count(&item);
        fx.notifier.clear();

        let err = fx
            .api()
            .change_state(&item, "Published", &TransitionContext::new())
            .unwrap_err();

        match err {
            LifecycleError::UnknownState { state, lifecycle } => {
                assert_eq!(state, "Published");
                assert_eq!(lifecycle, "lifecycle1");
            }
            other => panic!("expected unknown state, got {other}"),
        }
        assert_eq!(fx.store.persist_count(&item), persisted);
        assert!(fx.notifier.events().is_empty());
        assert_eq!(fx.state(&item).as_deref(), Some("enrolled"));
    }

    // =============================================================================
    // PRUNING
    // =============================================================================

    #[test]
    fn test_publish_survives_a_failed_snapshot_delete() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        change(&fx, &item, "published");
        let s1 = fx.live_revision(&item);
        let sx = fx.store.checkin(&item).unwrap();
        fx.store.checkout(&item).unwrap();

        // Pruning runs newest first, so only Sx survives.
        fx.store.fail_once(StoreOperation::DeleteSnapshot);
        change(&fx, &item, "published");

        let history = fx.store.history(&item);
        assert_eq!(history.len(), 3);
        assert!(history.iter().any(|s| s.id == sx.id));
        assert!(history.iter().all(|s| s.id.as_str() != s1));
        assert_eq!(history[2].id.as_str(), fx.live_revision(&item));
    }

    #[test]
    fn test_history_listing_failure_aborts_publish() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        fx.store.fail_once(StoreOperation::ListSnapshots);

        let err = fx
            .api()
            .change_state(&item, "published", &TransitionContext::new())
            .unwrap_err();

        assert!(matches!(err, LifecycleError::Store(_)));
        assert_eq!(saved_state(&fx, &item).as_deref(), Some("published"));
        assert_eq!(fx.live_revision(&item), "");
        assert_eq!(fx.store.history(&item).len(), 1);
    }

    // =============================================================================
    // DEGRADED READS
    // =============================================================================

    #[test]
    fn test_corrupt_ledger_is_rebuilt_from_scratch() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        fx.store
            .set_property(
                &item,
                property_keys::REVISION_DATA,
                PropertyValue::TextList(vec!["stale-entry".to_string()]),
            )
            .unwrap();
        fx.store.persist(&item).unwrap();

        change(&fx, &item, "pending");

        let ledger = fx.saved_ledger(&item);
        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.get(item.as_str()).map(|r| r.state.as_str()),
            Some("pending")
        );
    }

    #[test]
    fn test_ledger_with_wrong_type_is_replaced() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        fx.store
            .set_property(&item, property_keys::REVISION_DATA, PropertyValue::Date(7))
            .unwrap();

        change(&fx, &item, "draft");

        let ledger = fx.saved_ledger(&item);
        assert_eq!(
            ledger.get(item.as_str()).map(|r| r.state.as_str()),
            Some("enrolled")
        );
    }

    #[test]
    fn test_resolver_reports_lookup_failures_as_nothing() {
        let fx = Fixture::recording("alice");
        let item = fx.enrolled("report", "lifecycle1");
        change(&fx, &item, "published");
        change(&fx, &item, "staged");
        let live = ViewerContext::live();

        fx.store.fail_always(StoreOperation::FetchById);
        assert_eq!(fx.api().resolve_viewable(&item, Some(&live)), None);

        fx.store.fail_always(StoreOperation::GetProperty);
        assert_eq!(
            fx.api().resolve_viewable(&item, Some(&ViewerContext::edit())),
            None
        );

        fx.store.clear_failures();
        assert!(matches!(
            fx.api().resolve_viewable(&item, Some(&live)),
            Some(ItemView::Frozen(_))
        ));
    }

    #[test]
    fn test_unknown_user_is_recorded_as_empty() {
        let fx = Fixture::recording("");
        let item = fx.enrolled("report", "lifecycle1");
        fx.store.fail_always(StoreOperation::SessionUser);

        change(&fx, &item, "pending");

        let log = fx.api().last_log_entry(&item).unwrap().unwrap();
        assert_eq!(log.author, "");
        assert_eq!(
            fx.saved_ledger(&item)
                .get(item.as_str())
                .map(|r| r.author.as_str()),
            Some("")
        );
    }
}
