//! Events emitted by the publication lifecycle

pub mod outgoing;

pub use outgoing::{EventKind, LifecycleEvent};
