//! Current-user resolution chain
//!
//! Sources are tried in order; a source that errors or yields an empty name
//! hands over to the next. When every source is exhausted the user is `""`.

use crate::ports::outbound::{UserResolver, VersionedStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// One way of finding out who is acting.
pub trait UserSource: Send + Sync {
    /// Source name used in logs.
    fn name(&self) -> &str;

    /// `Ok(None)` when the source has no user to report.
    fn lookup(&self) -> Result<Option<String>, String>;
}

/// Ordered fallback over several [`UserSource`]s.
#[derive(Default)]
pub struct FallbackUserResolver {
    sources: Vec<Arc<dyn UserSource>>,
}

impl FallbackUserResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn UserSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl UserResolver for FallbackUserResolver {
    fn current_user(&self) -> String {
        for source in &self.sources {
            match source.lookup() {
                Ok(Some(user)) if !user.is_empty() => {
                    debug!(source = source.name(), user = %user, "[authoring] user resolved");
                    return user;
                }
                Ok(_) => {
                    debug!(source = source.name(), "[authoring] user source has no user");
                }
                Err(reason) => {
                    warn!(
                        source = source.name(),
                        reason = %reason,
                        "[authoring] user source failed, falling back"
                    );
                }
            }
        }
        String::new()
    }
}

/// Source returning a fixed user; stands in for an identity service or a
/// request context.
pub struct StaticUser {
    name: String,
    user: Option<String>,
}

impl StaticUser {
    pub fn new(name: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: Some(user.into()),
        }
    }

    /// A source that never knows the user.
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: None,
        }
    }
}

impl UserSource for StaticUser {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self) -> Result<Option<String>, String> {
        Ok(self.user.clone())
    }
}

impl UserResolver for StaticUser {
    fn current_user(&self) -> String {
        self.user.clone().unwrap_or_default()
    }
}

/// Falls back on the user bound to the raw store session.
pub struct StoreSessionUser<S: VersionedStore> {
    store: Arc<S>,
}

impl<S: VersionedStore> StoreSessionUser<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: VersionedStore> UserSource for StoreSessionUser<S> {
    fn name(&self) -> &str {
        "store-session"
    }

    fn lookup(&self) -> Result<Option<String>, String> {
        self.store
            .session_user()
            .map(|user| Some(user).filter(|u| !u.is_empty()))
            .map_err(|e| e.to_string())
    }
}
