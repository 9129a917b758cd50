//! Ports (Hexagonal Architecture)
//!
//! - inbound: driving API implemented by the lifecycle service
//! - outbound: driven collaborators supplied by the host

pub mod inbound;
pub mod outbound;

pub use inbound::PublicationLifecycleApi;
pub use outbound::{
    ActivityEligibility, EventNotifier, LifecycleDefinitionProvider, TimeSource, UserResolver,
    VersionedStore,
};
