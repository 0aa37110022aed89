//! Feature flags selecting which metric categories are collected.

use serde::{Deserialize, Serialize};

/// Enabled metric categories, as requested by the user.
///
/// Raw flags may violate the dependency rules; call [`FeatureFlags::normalized`]
/// before compiling. The compiler does this itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureFlags {
    pub instance_counts: bool,
    pub instance_lifetime_min: bool,
    pub instance_lifetime_avg: bool,
    pub instance_lifetime_max: bool,
    pub call_counts: bool,
    pub exec_time_min: bool,
    pub exec_time_avg: bool,
    pub exec_time_max: bool,
    pub exception_exits: bool,
}

impl FeatureFlags {
    /// Close the flag set under its implications:
    /// lifetime min/max need the average bookkeeping, exec-time min/max need
    /// the exec-time average, and exec timing must close out on exceptional
    /// exit or its start entry leaks.
    pub fn normalized(mut self) -> Self {
        if self.instance_lifetime_min || self.instance_lifetime_max {
            self.instance_lifetime_avg = true;
        }
        if self.exec_time_min || self.exec_time_max {
            self.exec_time_avg = true;
        }
        if self.exec_time_avg {
            self.exception_exits = true;
        }
        self
    }

    /// Everything on.
    pub fn all() -> Self {
        Self {
            instance_counts: true,
            instance_lifetime_min: true,
            instance_lifetime_avg: true,
            instance_lifetime_max: true,
            call_counts: true,
            exec_time_min: true,
            exec_time_avg: true,
            exec_time_max: true,
            exception_exits: true,
        }
    }

    /// Runtime options derived from the normalized flags.
    pub fn record_options(&self) -> RecordOptions {
        let f = self.normalized();
        RecordOptions {
            lifetime_min: f.instance_lifetime_min,
            lifetime_max: f.instance_lifetime_max,
            exec_time_min: f.exec_time_min,
            exec_time_max: f.exec_time_max,
            exception_exits: f.exception_exits,
        }
    }
}

/// Optional bookkeeping the registry maintains, fixed at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordOptions {
    pub lifetime_min: bool,
    pub lifetime_max: bool,
    pub exec_time_min: bool,
    pub exec_time_max: bool,
    pub exception_exits: bool,
}
