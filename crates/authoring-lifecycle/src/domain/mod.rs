//! Domain module for the publication lifecycle
//!
//! - state: fixed workflow states, transition kinds, branch table
//! - item: identifiers, snapshots, property values, views
//! - revision: revision ledger and its codec
//! - version_log: single-slot audit entry
//! - lifecycle: lifecycle definitions
//! - context: transition and viewer context

pub mod context;
pub mod item;
pub mod lifecycle;
pub mod revision;
pub mod state;
pub mod version_log;

pub use context::{FilterMode, PortletMode, TransitionContext, ViewerContext};
pub use item::{
    property_keys, Capability, FrozenNode, ItemId, ItemView, PropertyValue, SnapshotId,
    SnapshotRef, StoredNode, Timestamp,
};
pub use lifecycle::{LifecycleDefinition, LifecycleState};
pub use revision::{RevisionData, RevisionLedger};
pub use state::{
    PublicationState, TransitionBranch, TransitionKind, TransitionTarget, POSSIBLE_STATES,
};
pub use version_log::VersionLogEntry;
