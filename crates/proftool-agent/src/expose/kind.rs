//! Structured metric kinds behind the dotted attribute names.

use std::cmp::Reverse;

use proftool_core::{MetricKey, RecordOptions};

use crate::registry::Category;

/// One exposed statistic per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    InstancesCount,
    InstancesLive,
    LifetimeMinimum,
    LifetimeAverage,
    LifetimeMaximum,
    Calls,
    ExecTimeMinimum,
    ExecTimeAverage,
    ExecTimeMaximum,
    ExceptionExits,
}

impl MetricKind {
    pub const ALL: [MetricKind; 10] = [
        MetricKind::InstancesCount,
        MetricKind::InstancesLive,
        MetricKind::LifetimeMinimum,
        MetricKind::LifetimeAverage,
        MetricKind::LifetimeMaximum,
        MetricKind::Calls,
        MetricKind::ExecTimeMinimum,
        MetricKind::ExecTimeAverage,
        MetricKind::ExecTimeMaximum,
        MetricKind::ExceptionExits,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            MetricKind::InstancesCount => ".instances.count",
            MetricKind::InstancesLive => ".instances.live",
            MetricKind::LifetimeMinimum => ".lifetime.minimum",
            MetricKind::LifetimeAverage => ".lifetime.average",
            MetricKind::LifetimeMaximum => ".lifetime.maximum",
            MetricKind::Calls => ".calls",
            MetricKind::ExecTimeMinimum => ".exectime.minimum",
            MetricKind::ExecTimeAverage => ".exectime.average",
            MetricKind::ExecTimeMaximum => ".exectime.maximum",
            MetricKind::ExceptionExits => ".exit.exception",
        }
    }

    pub fn category(self) -> Category {
        match self {
            MetricKind::InstancesCount | MetricKind::InstancesLive => Category::Instances,
            MetricKind::LifetimeMinimum
            | MetricKind::LifetimeAverage
            | MetricKind::LifetimeMaximum => Category::Lifetimes,
            MetricKind::Calls => Category::Calls,
            MetricKind::ExecTimeMinimum
            | MetricKind::ExecTimeAverage
            | MetricKind::ExecTimeMaximum => Category::ExecTimes,
            MetricKind::ExceptionExits => Category::ExceptionExits,
        }
    }

    /// Whether the kind is exposed under the registry's options.
    pub fn enabled(self, opts: &RecordOptions) -> bool {
        match self {
            MetricKind::LifetimeMinimum => opts.lifetime_min,
            MetricKind::LifetimeMaximum => opts.lifetime_max,
            MetricKind::ExecTimeMinimum => opts.exec_time_min,
            MetricKind::ExecTimeMaximum => opts.exec_time_max,
            MetricKind::ExceptionExits => opts.exception_exits,
            _ => true,
        }
    }

    pub fn attribute_name(self, key: &MetricKey) -> String {
        format!("{}{}", key, self.suffix())
    }

    pub fn description(self, key: &MetricKey) -> String {
        let what = match self {
            MetricKind::InstancesCount => "Total instances of",
            MetricKind::InstancesLive => "Live instances of",
            MetricKind::LifetimeMinimum => "Minimum instance lifetime of",
            MetricKind::LifetimeAverage => "Average instance lifetime of",
            MetricKind::LifetimeMaximum => "Maximum instance lifetime of",
            MetricKind::Calls => "Call count of",
            MetricKind::ExecTimeMinimum => "Minimum execution time of",
            MetricKind::ExecTimeAverage => "Average execution time of",
            MetricKind::ExecTimeMaximum => "Maximum execution time of",
            MetricKind::ExceptionExits => "Exits via exceptions from",
        };
        format!("{what} {key}")
    }

    /// Every `(key, kind)` reading of `name`, most specific suffix first.
    ///
    /// Suffixes share substrings and keys may contain dots, so a name can have
    /// more than one reading; callers pick the first one that is live. Key parts
    /// that are not in sanitized form are never a reading.
    pub fn candidates(name: &str) -> Vec<(MetricKey, MetricKind)> {
        let mut kinds = Self::ALL;
        kinds.sort_by_key(|k| Reverse(k.suffix().len()));
        kinds
            .iter()
            .filter_map(|&kind| {
                let key = name.strip_suffix(kind.suffix())?;
                if key.is_empty() {
                    return None;
                }
                Some((MetricKey::from_sanitized(key)?, kind))
            })
            .collect()
    }
}
