//! Keyed counter and timing records.
//!
//! Records live in `DashMap`s keyed by sanitized `MetricKey`s and are created
//! lazily on first write through the entry API, so racing first writers still
//! produce exactly one record per key. Records are never removed.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use proftool_core::MetricKey;

/// Marker for an extremum that has not observed a sample yet.
const UNSET: u64 = u64::MAX;

/// Monotonic counters keyed by metric key.
#[derive(Default)]
pub struct CounterVec {
    map: DashMap<MetricKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, key: &MetricKey) {
        self.add(key, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, key: &MetricKey, v: u64) {
        if let Some(counter) = self.map.get(key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self
            .map
            .entry(key.clone())
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current total, 0 for unknown keys.
    pub fn get(&self, key: &MetricKey) -> u64 {
        self.map
            .get(key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn contains(&self, key: &MetricKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> Vec<MetricKey> {
        self.map.iter().map(|r| r.key().clone()).collect()
    }
}

/// Running sum, completed count and optional extrema for one key.
pub struct TimingRecord {
    sum: AtomicU64,
    completed: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl Default for TimingRecord {
    fn default() -> Self {
        Self {
            sum: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            min: AtomicU64::new(UNSET),
            max: AtomicU64::new(UNSET),
        }
    }
}

impl TimingRecord {
    fn record(&self, elapsed: u64, track_min: bool, track_max: bool) {
        // The sum is published before the count; readers may briefly see a
        // sum without its completion.
        self.sum.fetch_add(elapsed, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);

        // UNSET is reserved.
        let sample = elapsed.min(UNSET - 1);
        if track_min {
            update_extremum(&self.min, sample, |candidate, current| candidate < current);
        }
        if track_max {
            update_extremum(&self.max, sample, |candidate, current| candidate > current);
        }
    }

    fn snapshot(&self) -> TimingSnapshot {
        let sum = self.sum.load(Ordering::Relaxed);
        let completed = self.completed.load(Ordering::Relaxed);
        let read = |cell: &AtomicU64| match cell.load(Ordering::Acquire) {
            UNSET => None,
            v => Some(v),
        };
        TimingSnapshot {
            sum,
            completed,
            min: read(&self.min),
            max: read(&self.max),
        }
    }
}

/// Replace `cell` with `sample` while `sample` beats the stored value.
///
/// Compare-and-retry: a writer only installs its candidate if the cell still
/// holds the value it compared against, so two racing writers cannot both win.
fn update_extremum(cell: &AtomicU64, sample: u64, beats: impl Fn(u64, u64) -> bool) {
    let mut current = cell.load(Ordering::Acquire);
    loop {
        if current != UNSET && !beats(sample, current) {
            return;
        }
        match cell.compare_exchange_weak(current, sample, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}

/// Point-in-time view of a timing record (milliseconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingSnapshot {
    pub sum: u64,
    pub completed: u64,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl TimingSnapshot {
    pub fn average(&self) -> u64 {
        super::average_of(self.sum, self.completed)
    }
}

/// Timing records keyed by metric key.
#[derive(Default)]
pub struct TimingVec {
    map: DashMap<MetricKey, TimingRecord>,
}

impl TimingVec {
    /// Fold one completed interval into the key's record.
    pub fn observe(&self, key: &MetricKey, elapsed: u64, track_min: bool, track_max: bool) {
        if let Some(rec) = self.map.get(key) {
            rec.record(elapsed, track_min, track_max);
            return;
        }
        let rec = self.map.entry(key.clone()).or_default();
        rec.record(elapsed, track_min, track_max);
    }

    pub fn get(&self, key: &MetricKey) -> Option<TimingSnapshot> {
        self.map.get(key).map(|r| r.snapshot())
    }

    pub fn contains(&self, key: &MetricKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> Vec<MetricKey> {
        self.map.iter().map(|r| r.key().clone()).collect()
    }
}
