//! Outgoing lifecycle notifications
//!
//! Broadcast after a transition has been persisted. Delivery is
//! fire-and-forget: the engine never inspects listener outcomes.

use crate::domain::ItemId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    InitialState,
    StateChanged,
    ActivityStateChanged,
    PostUpdateState,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::InitialState => "publication.post-init-state",
            EventKind::StateChanged => "publication.post-change-state",
            EventKind::ActivityStateChanged => "activity.state-changed",
            EventKind::PostUpdateState => "publication.post-update-state",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification emitted by the transition engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// First state assignment of an item entering the lifecycle.
    InitialState { item: ItemId, state: String },
    /// Regular state change.
    StateChanged { item: ItemId, state: String },
    /// State change of an item shown in activity streams.
    ActivityStateChanged { item: ItemId, new_state: String },
    /// Unconditional trailer of every transition.
    PostUpdateState { item: ItemId },
}

impl LifecycleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::InitialState { .. } => EventKind::InitialState,
            LifecycleEvent::StateChanged { .. } => EventKind::StateChanged,
            LifecycleEvent::ActivityStateChanged { .. } => EventKind::ActivityStateChanged,
            LifecycleEvent::PostUpdateState { .. } => EventKind::PostUpdateState,
        }
    }

    pub fn item(&self) -> &ItemId {
        match self {
            LifecycleEvent::InitialState { item, .. }
            | LifecycleEvent::StateChanged { item, .. }
            | LifecycleEvent::ActivityStateChanged { item, .. }
            | LifecycleEvent::PostUpdateState { item } => item,
        }
    }

    /// State carried by the event, if any.
    pub fn state(&self) -> Option<&str> {
        match self {
            LifecycleEvent::InitialState { state, .. } | LifecycleEvent::StateChanged { state, .. } => {
                Some(state)
            }
            LifecycleEvent::ActivityStateChanged { new_state, .. } => Some(new_state),
            LifecycleEvent::PostUpdateState { .. } => None,
        }
    }
}
