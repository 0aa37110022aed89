//! Start-event bookkeeping for lifetimes and call timing.
//!
//! An entry is written by a start event and consumed exactly once by the
//! matching completion. Ids are supplied by the caller: object ids from a
//! [`CorrelationSource`], call ids from [`thread_token`] or anything more
//! precise the instrumentation can provide.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Caller-supplied token linking a start event to its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub u64);

impl From<u64> for CorrelationId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonic id generator, e.g. one id per constructed object.
#[derive(Debug)]
pub struct CorrelationSource {
    next: AtomicU64,
}

impl Default for CorrelationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationSource {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> CorrelationId {
        CorrelationId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

static NEXT_THREAD_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TOKEN: u64 = NEXT_THREAD_TOKEN.fetch_add(1, Ordering::Relaxed);
}

/// Stable id for the calling thread.
///
/// Nested or recursive calls of the same target on one thread share this id,
/// so the inner start overwrites the outer one.
pub fn thread_token() -> CorrelationId {
    CorrelationId(THREAD_TOKEN.with(|t| *t))
}

/// Pending start timestamps (milliseconds) keyed by correlation.
pub struct CorrelationMap<K: Eq + Hash> {
    starts: DashMap<K, u64>,
}

impl<K: Eq + Hash> Default for CorrelationMap<K> {
    fn default() -> Self {
        Self {
            starts: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash> CorrelationMap<K> {
    /// Record a start; returns the unconsumed start it replaced, if any.
    pub fn start(&self, key: K, at: u64) -> Option<u64> {
        self.starts.insert(key, at)
    }

    /// Consume the start for `key`. A second take for the same start misses.
    pub fn take(&self, key: &K) -> Option<u64> {
        self.starts.remove(key).map(|(_, at)| at)
    }

    /// Number of starts still waiting for a completion.
    pub fn pending(&self) -> usize {
        self.starts.len()
    }
}
