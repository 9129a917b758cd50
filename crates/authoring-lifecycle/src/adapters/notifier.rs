//! # Event Notifiers
//!
//! Implementations of [`EventNotifier`]:
//!
//! - [`ListenerRegistry`]: synchronous dispatch to registered listeners
//! - [`RecordingNotifier`]: keeps every broadcast event, for tests and tooling
//! - [`TracingNotifier`]: emits each event as a log line

use crate::events::{EventKind, LifecycleEvent};
use crate::ports::outbound::EventNotifier;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A consumer of lifecycle events.
pub trait LifecycleListener: Send + Sync {
    /// Listener name used in logs.
    fn name(&self) -> &str;

    /// Event kinds this listener wants. Defaults to every kind.
    fn accepts(&self, _kind: EventKind) -> bool {
        true
    }

    fn on_event(&self, event: &LifecycleEvent) -> Result<(), String>;
}

/// Dispatches events to listeners in registration order.
///
/// A failing listener is logged and skipped; dispatch continues with the
/// next listener and the failure never reaches the engine.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn LifecycleListener>>>,
    events_dispatched: AtomicU64,
    listener_failures: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn LifecycleListener>) {
        debug!(listener = listener.name(), "[authoring] listener registered");
        self.listeners.write().push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    pub fn listener_failures(&self) -> u64 {
        self.listener_failures.load(Ordering::Relaxed)
    }
}

impl EventNotifier for ListenerRegistry {
    fn broadcast(&self, event: &LifecycleEvent) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);

        // Snapshot the list so listeners may register others while handling.
        let listeners: Vec<_> = self.listeners.read().clone();
        for listener in listeners.iter().filter(|l| l.accepts(event.kind())) {
            if let Err(reason) = listener.on_event(event) {
                self.listener_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    listener = listener.name(),
                    event = %event.kind(),
                    item = %event.item(),
                    reason = %reason,
                    "[authoring] listener failed"
                );
            }
        }
    }
}

/// Records every broadcast event in order.
#[derive(Default)]
pub struct RecordingNotifier {
    events: RwLock<Vec<LifecycleEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.read().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.read().iter().map(LifecycleEvent::kind).collect()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventNotifier for RecordingNotifier {
    fn broadcast(&self, event: &LifecycleEvent) {
        self.events.write().push(event.clone());
    }
}

/// Logs every event at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl EventNotifier for TracingNotifier {
    fn broadcast(&self, event: &LifecycleEvent) {
        info!(
            event = %event.kind(),
            item = %event.item(),
            state = event.state().unwrap_or_default(),
            "[authoring] lifecycle event"
        );
    }
}

impl LifecycleListener for TracingNotifier {
    fn name(&self) -> &str {
        "tracing"
    }

    fn on_event(&self, event: &LifecycleEvent) -> Result<(), String> {
        self.broadcast(event);
        Ok(())
    }
}
