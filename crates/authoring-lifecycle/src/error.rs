//! Error types for the publication lifecycle
//!
//! Only store failures abort a transition. Snapshot pruning failures, ledger
//! decode failures, user-resolution failures and live-revision lookup failures
//! are recovered where they happen and never reach the caller.

use thiserror::Error;

/// Failures raised by a versioned store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No item with this identifier exists.
    #[error("Item not found: {id}")]
    ItemNotFound { id: String },

    /// No snapshot with this identifier exists in the item's history.
    #[error("Snapshot not found: {id}")]
    SnapshotNotFound { id: String },

    /// A snapshot operation needs the versioning capability.
    #[error("Item {id} does not carry the versioning capability")]
    NotVersionable { id: String },

    /// Check-in requires a checked-out item.
    #[error("Item {id} is not checked out")]
    NotCheckedOut { id: String },

    /// Property exists with a different value shape.
    #[error("Property {key} on {id} has unexpected type: expected {expected}")]
    PropertyType {
        id: String,
        key: String,
        expected: &'static str,
    },

    /// The store refused to remove a historical snapshot.
    #[error("Snapshot {snapshot} could not be deleted: {reason}")]
    SnapshotDeletion { snapshot: String, reason: String },

    /// Backend I/O or session failure.
    #[error("Store backend error: {message}")]
    Backend { message: String },
}

/// Result type for store adapter operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Publication lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Store read/write or snapshot failure; aborts the transition without rollback.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Target state is neither a known state nor defined by the item's lifecycle.
    #[error("Unknown target state '{state}' for lifecycle '{lifecycle}'")]
    UnknownState { state: String, lifecycle: String },

    /// No lifecycle definition is registered under this name.
    #[error("Unknown lifecycle '{name}'")]
    UnknownLifecycle { name: String },

    /// A property the operation depends on is absent.
    #[error("Missing required property {key} on item {item}")]
    MissingProperty { item: String, key: &'static str },

    /// A persisted ledger or log value could not be decoded.
    #[error("Cannot decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    /// Lifecycle definition document is malformed.
    #[error("Invalid lifecycle definition: {reason}")]
    InvalidDefinition { reason: String },
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
