//! Adapters for the outbound ports
//!
//! In-process implementations used by embedders, tests and the admin tool.

pub mod clock;
pub mod lifecycle_registry;
pub mod memory_store;
pub mod notifier;
pub mod user;

pub use clock::{FixedTimeSource, StaticEligibility, SystemTimeSource};
pub use lifecycle_registry::InMemoryLifecycleRegistry;
pub use memory_store::{InMemoryVersionedStore, StoreOperation};
pub use notifier::{LifecycleListener, ListenerRegistry, RecordingNotifier, TracingNotifier};
pub use user::{FallbackUserResolver, StaticUser, StoreSessionUser, UserSource};
