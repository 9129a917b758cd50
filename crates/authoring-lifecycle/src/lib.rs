//! # authoring-lifecycle
//!
//! Publication lifecycle engine for versioned content items.
//!
//! ## Overview
//!
//! This crate provides:
//! - **State transitions**: draft, pending, approved, staged, published,
//!   unpublished, archived, obsolete, enrolled, plus lifecycle-defined states
//! - **Revision ledger**: last known state and author per tracked revision
//! - **Snapshot history**: publishing prunes old snapshots and captures the
//!   new live one
//! - **Live-revision resolution**: what editors and public viewers see
//!
//! ## Architecture
//!
//! ```text
//! caller ──change_state──→ PublicationLifecycleService ──→ VersionedStore
//!                                  │
//!                                  ├── LifecycleDefinitionProvider
//!                                  ├── UserResolver
//!                                  └── EventNotifier ──→ listeners
//! ```
//!
//! ## Publish
//!
//! ```text
//! clear ledger → state=published, persist → prune history → checkin (live)
//!   → ledger {live, own} → live pointer = live → log change-to-live
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use authoring_lifecycle::{
//!     LifecycleConfig, LifecycleDependencies, PublicationLifecycleApi,
//!     PublicationLifecycleService, TransitionContext,
//! };
//!
//! let service = PublicationLifecycleService::new(LifecycleConfig::from_env(), deps);
//!
//! service.enroll(&item, Some("editorial"))?;
//! service.change_state(&item, "published", &TransitionContext::new())?;
//! let view = service.resolve_viewable(&item, Some(&ViewerContext::live()));
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;

pub use config::LifecycleConfig;
pub use domain::{
    property_keys, Capability, FilterMode, FrozenNode, ItemId, ItemView, LifecycleDefinition,
    LifecycleState, PortletMode, PropertyValue, PublicationState, RevisionData, RevisionLedger,
    SnapshotId, SnapshotRef, StoredNode, Timestamp, TransitionContext, TransitionKind,
    TransitionTarget, VersionLogEntry, ViewerContext, POSSIBLE_STATES,
};
pub use error::{LifecycleError, LifecycleResult, StoreError, StoreResult};
pub use events::{EventKind, LifecycleEvent};
pub use ports::inbound::PublicationLifecycleApi;
pub use ports::outbound::{
    ActivityEligibility, EventNotifier, LifecycleDefinitionProvider, TimeSource, UserResolver,
    VersionedStore,
};
pub use service::{LifecycleDependencies, PublicationLifecycleService};
