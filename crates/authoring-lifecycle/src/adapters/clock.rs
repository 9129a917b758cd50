//! Time sources and activity-stream eligibility

use crate::domain::{ItemId, Timestamp};
use crate::ports::outbound::{ActivityEligibility, TimeSource};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now: AtomicU64,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Eligibility from a fixed default plus per-item overrides.
#[derive(Debug, Default)]
pub struct StaticEligibility {
    default: bool,
    overrides: RwLock<HashSet<ItemId>>,
}

impl StaticEligibility {
    /// Every item eligible unless excluded.
    pub fn all() -> Self {
        Self {
            default: true,
            overrides: RwLock::new(HashSet::new()),
        }
    }

    /// No item eligible unless included.
    pub fn none() -> Self {
        Self::default()
    }

    /// Flip the default answer for one item.
    pub fn toggle(&self, item: ItemId) {
        let mut overrides = self.overrides.write();
        if !overrides.remove(&item) {
            overrides.insert(item);
        }
    }
}

impl ActivityEligibility for StaticEligibility {
    fn is_eligible(&self, item: &ItemId) -> bool {
        self.default != self.overrides.read().contains(item)
    }
}
