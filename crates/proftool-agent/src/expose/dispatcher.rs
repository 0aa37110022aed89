//! Dynamic attribute directory over a `MetricsRegistry`.
//!
//! Names are never stored: each query derives them from the registry's live key
//! sets and options, so a key written a moment ago is visible on the next call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use proftool_core::error::{ProfError, Result};
use proftool_core::MetricKey;

use super::kind::MetricKind;
use crate::registry::MetricsRegistry;

/// Name, kind and description of one exposed attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub key: MetricKey,
    pub kind: MetricKind,
    pub description: String,
}

pub struct AttributeDispatcher {
    registry: Arc<MetricsRegistry>,
}

impl AttributeDispatcher {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    /// All currently derivable attributes, ordered by name.
    pub fn attributes(&self) -> Vec<AttributeInfo> {
        let opts = self.registry.options();
        let mut out = Vec::new();
        for kind in MetricKind::ALL {
            if !kind.enabled(&opts) {
                continue;
            }
            for key in self.registry.keys(kind.category()) {
                out.push(AttributeInfo {
                    name: kind.attribute_name(&key),
                    description: kind.description(&key),
                    key,
                    kind,
                });
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub fn list_names(&self) -> BTreeSet<String> {
        self.attributes().into_iter().map(|a| a.name).collect()
    }

    /// Resolve a name to its current value.
    pub fn get(&self, name: &str) -> Result<i64> {
        let opts = self.registry.options();
        MetricKind::candidates(name)
            .into_iter()
            .find(|(key, kind)| {
                kind.enabled(&opts) && self.registry.contains(kind.category(), key)
            })
            .map(|(key, kind)| self.value(&key, kind))
            .ok_or_else(|| ProfError::UnknownAttribute(name.to_string()))
    }

    /// Fetch several names; unknown names are skipped.
    pub fn get_many<S: AsRef<str>>(&self, names: &[S]) -> Vec<(String, i64)> {
        names
            .iter()
            .filter_map(|n| {
                let n = n.as_ref();
                match self.get(n) {
                    Ok(v) => Some((n.to_string(), v)),
                    Err(e) => {
                        tracing::debug!(attribute = n, error = %e, "skipping attribute");
                        None
                    }
                }
            })
            .collect()
    }

    /// Name -> value for everything currently listed.
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        self.attributes()
            .into_iter()
            .map(|a| {
                let v = self.value(&a.key, a.kind);
                (a.name, v)
            })
            .collect()
    }

    fn value(&self, key: &MetricKey, kind: MetricKind) -> i64 {
        let r = &self.registry;
        let v = match kind {
            MetricKind::InstancesCount => r.instance_total(key),
            MetricKind::InstancesLive => return r.instance_live(key),
            MetricKind::LifetimeMinimum => r.lifetime(key).and_then(|t| t.min).unwrap_or(0),
            MetricKind::LifetimeAverage => r.lifetime(key).map(|t| t.average()).unwrap_or(0),
            MetricKind::LifetimeMaximum => r.lifetime(key).and_then(|t| t.max).unwrap_or(0),
            MetricKind::Calls => r.call_count(key),
            MetricKind::ExecTimeMinimum => r.exec_time(key).and_then(|t| t.min).unwrap_or(0),
            MetricKind::ExecTimeAverage => r.exec_time(key).map(|t| t.average()).unwrap_or(0),
            MetricKind::ExecTimeMaximum => r.exec_time(key).and_then(|t| t.max).unwrap_or(0),
            MetricKind::ExceptionExits => r.exception_exit_count(key),
        };
        i64::try_from(v).unwrap_or(i64::MAX)
    }
}
