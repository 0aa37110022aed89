//! Process-wide metrics registry fed by instrumented code paths.
//!
//! One `MetricsRegistry` is constructed at startup and shared via `Arc` for the
//! life of the process; metrics are monotonic until exit and nothing is ever
//! torn down. Every operation is safe to call from any number of threads and
//! never panics: inconsistent runtime data (a completion without a start) is
//! logged and reported, not fatal.

pub mod clock;
pub mod correlation;
pub mod record;

use std::sync::{Arc, OnceLock};

use proftool_core::{MetricKey, ProfError, RecordOptions, Result};

pub use clock::{Clock, ManualClock, SystemClock};
pub use correlation::{thread_token, CorrelationId, CorrelationMap, CorrelationSource};
pub use record::{CounterVec, TimingSnapshot, TimingVec};

/// Average that reads as 0 until something has completed.
pub fn average_of(sum: u64, completed: u64) -> u64 {
    if completed == 0 {
        return 0;
    }
    sum / completed
}

/// Metric families, one key set each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Instances,
    Lifetimes,
    Calls,
    ExecTimes,
    ExceptionExits,
}

pub struct MetricsRegistry {
    clock: Arc<dyn Clock>,
    options: OnceLock<RecordOptions>,

    instances: CounterVec,
    instances_done: CounterVec,
    lifetimes: TimingVec,
    calls: CounterVec,
    exec_times: TimingVec,
    exception_exits: CounterVec,

    births: CorrelationMap<CorrelationId>,
    call_starts: CorrelationMap<(MetricKey, CorrelationId)>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::default()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            options: OnceLock::new(),
            instances: CounterVec::default(),
            instances_done: CounterVec::default(),
            lifetimes: TimingVec::default(),
            calls: CounterVec::default(),
            exec_times: TimingVec::default(),
            exception_exits: CounterVec::default(),
            births: CorrelationMap::default(),
            call_starts: CorrelationMap::default(),
        }
    }

    /// Fix the optional bookkeeping. Only the first call takes effect;
    /// returns whether this call was it.
    pub fn configure(&self, options: RecordOptions) -> bool {
        self.options.set(options).is_ok()
    }

    /// Active options; everything optional is off until configured.
    pub fn options(&self) -> RecordOptions {
        self.options.get().copied().unwrap_or_default()
    }

    // ----- instances -----

    pub fn increment_instance_count(&self, key: &MetricKey) {
        self.instances.inc(key);
    }

    pub fn decrement_live_instance_count(&self, key: &MetricKey) {
        self.instances_done.inc(key);
    }

    /// Remember when object `id` was created. Reusing an id whose lifetime was
    /// never recorded silently replaces the earlier creation time.
    pub fn record_creation_time(&self, key: &MetricKey, id: CorrelationId) {
        let now = self.clock.now_millis();
        if self.births.start(id, now).is_some() {
            tracing::debug!(key = %key, id = id.0, "creation time overwritten before lifetime was recorded");
        }
    }

    /// Close out object `id`'s lifetime. Returns the elapsed milliseconds.
    pub fn record_instance_lifetime(&self, key: &MetricKey, id: CorrelationId) -> Result<u64> {
        let Some(born) = self.births.take(&id) else {
            return Err(self.miss(key, id));
        };
        let elapsed = self.clock.now_millis().saturating_sub(born);
        let opts = self.options();
        self.lifetimes
            .observe(key, elapsed, opts.lifetime_min, opts.lifetime_max);
        self.instances_done.inc(key);
        Ok(elapsed)
    }

    // ----- calls -----

    pub fn increment_call_count(&self, key: &MetricKey) {
        self.calls.inc(key);
    }

    pub fn record_call_start(&self, key: &MetricKey, id: CorrelationId) {
        let now = self.clock.now_millis();
        if self.call_starts.start((key.clone(), id), now).is_some() {
            tracing::debug!(key = %key, id = id.0, "re-entrant call start replaced outer start");
        }
    }

    /// Close out a call. Returns the elapsed milliseconds.
    pub fn record_call_end(&self, key: &MetricKey, id: CorrelationId) -> Result<u64> {
        self.finish_call(key, id).ok_or_else(|| self.miss(key, id))
    }

    /// Count an exceptional exit and, if the call's start is still pending,
    /// close out its timing as well. Returns the elapsed time when it did.
    pub fn increment_exception_exit(&self, key: &MetricKey, id: CorrelationId) -> Option<u64> {
        self.exception_exits.inc(key);
        self.finish_call(key, id)
    }

    fn finish_call(&self, key: &MetricKey, id: CorrelationId) -> Option<u64> {
        let started = self.call_starts.take(&(key.clone(), id))?;
        let elapsed = self.clock.now_millis().saturating_sub(started);
        let opts = self.options();
        self.exec_times
            .observe(key, elapsed, opts.exec_time_min, opts.exec_time_max);
        Some(elapsed)
    }

    fn miss(&self, key: &MetricKey, id: CorrelationId) -> ProfError {
        tracing::warn!(key = %key, id = id.0, "completion without matching start; ignored");
        ProfError::CorrelationMiss {
            key: key.to_string(),
            id: id.0,
        }
    }

    // ----- reads -----

    pub fn keys(&self, category: Category) -> Vec<MetricKey> {
        match category {
            Category::Instances => self.instances.keys(),
            Category::Lifetimes => self.lifetimes.keys(),
            Category::Calls => self.calls.keys(),
            Category::ExecTimes => self.exec_times.keys(),
            Category::ExceptionExits => self.exception_exits.keys(),
        }
    }

    pub fn contains(&self, category: Category, key: &MetricKey) -> bool {
        match category {
            Category::Instances => self.instances.contains(key),
            Category::Lifetimes => self.lifetimes.contains(key),
            Category::Calls => self.calls.contains(key),
            Category::ExecTimes => self.exec_times.contains(key),
            Category::ExceptionExits => self.exception_exits.contains(key),
        }
    }

    pub fn instance_total(&self, key: &MetricKey) -> u64 {
        self.instances.get(key)
    }

    /// Created minus finished. May dip below zero while a creation is in flight
    /// or when only completions are instrumented.
    pub fn instance_live(&self, key: &MetricKey) -> i64 {
        let total = self.instances.get(key) as i64;
        let done = self.instances_done.get(key) as i64;
        total.saturating_sub(done)
    }

    pub fn lifetime(&self, key: &MetricKey) -> Option<TimingSnapshot> {
        self.lifetimes.get(key)
    }

    pub fn call_count(&self, key: &MetricKey) -> u64 {
        self.calls.get(key)
    }

    pub fn exec_time(&self, key: &MetricKey) -> Option<TimingSnapshot> {
        self.exec_times.get(key)
    }

    pub fn exception_exit_count(&self, key: &MetricKey) -> u64 {
        self.exception_exits.get(key)
    }

    /// Lifetime starts never closed out.
    pub fn pending_creations(&self) -> usize {
        self.births.pending()
    }

    /// Call starts never closed out.
    pub fn pending_calls(&self) -> usize {
        self.call_starts.pending()
    }
}
