//! Registration point for published statistics objects.
//!
//! Plays the role of a platform management server: a name such as
//! `proftool:type=Statistics` maps to one dispatcher. Registering a name twice
//! is a no-op, and only the first registration configures the registry.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use proftool_core::error::{ProfError, Result};
use proftool_core::RecordOptions;

use super::dispatcher::AttributeDispatcher;
use crate::registry::MetricsRegistry;

#[derive(Default)]
pub struct ObjectDirectory {
    objects: DashMap<String, Arc<AttributeDispatcher>>,
}

impl ObjectDirectory {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
        }
    }

    /// Publish `registry` under `object_name`. Returns `false` if the name was
    /// already taken, in which case nothing changes.
    pub fn register(
        &self,
        object_name: &str,
        registry: &Arc<MetricsRegistry>,
        options: RecordOptions,
    ) -> Result<bool> {
        validate_object_name(object_name)?;
        match self.objects.entry(object_name.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(object = object_name, "already registered");
                Ok(false)
            }
            Entry::Vacant(slot) => {
                if !registry.configure(options) {
                    tracing::warn!(object = object_name, "registry already configured; keeping earlier options");
                }
                slot.insert(Arc::new(AttributeDispatcher::new(Arc::clone(registry))));
                tracing::info!(object = object_name, ?options, "statistics registered");
                Ok(true)
            }
        }
    }

    pub fn lookup(&self, object_name: &str) -> Option<Arc<AttributeDispatcher>> {
        self.objects.get(object_name).map(|e| Arc::clone(e.value()))
    }

    pub fn is_registered(&self, object_name: &str) -> bool {
        self.objects.contains_key(object_name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

/// Accept `domain:key=value[,key=value...]`.
pub fn validate_object_name(name: &str) -> Result<()> {
    let invalid = |why: &str| ProfError::InvalidObjectName(format!("{name:?}: {why}"));

    let (domain, props) = name
        .split_once(':')
        .ok_or_else(|| invalid("expected domain:key=value"))?;
    if domain.is_empty() {
        return Err(invalid("empty domain"));
    }
    if props.is_empty() {
        return Err(invalid("missing key properties"));
    }
    for prop in props.split(',') {
        match prop.split_once('=') {
            Some((k, v)) if !k.is_empty() && !v.is_empty() => {}
            _ => return Err(invalid("key properties must be key=value")),
        }
    }
    Ok(())
}
