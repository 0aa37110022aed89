//! In-process executor for compiled bindings.
//!
//! The instrumentation machinery that weaves bindings into a program is
//! external; `Probe` is what it calls. Given a target, a phase and the
//! invocation's correlation ids, it runs every matching binding against the
//! registry (and the directory, for registration).

use std::collections::HashMap;
use std::sync::Arc;

use proftool_core::binding::{Action, Binding, BindingSet, Phase};
use proftool_core::error::Result;
use proftool_core::Target;

use crate::expose::ObjectDirectory;
use crate::registry::{thread_token, CorrelationId, MetricsRegistry};

/// Correlation ids of one firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// Identity of the instance the operation runs on (lifetimes).
    pub object: CorrelationId,
    /// Identity of the call (exec timing).
    pub call: CorrelationId,
}

impl Invocation {
    pub fn new(object: CorrelationId, call: CorrelationId) -> Self {
        Self { object, call }
    }

    /// Use the calling thread as the call identity.
    pub fn on_current_thread(object: CorrelationId) -> Self {
        Self {
            object,
            call: thread_token(),
        }
    }
}

pub struct Probe {
    registry: Arc<MetricsRegistry>,
    directory: Arc<ObjectDirectory>,
    table: HashMap<(Target, Phase), Vec<Binding>>,
}

impl Probe {
    pub fn new(
        set: &BindingSet,
        registry: Arc<MetricsRegistry>,
        directory: Arc<ObjectDirectory>,
    ) -> Self {
        let mut table: HashMap<(Target, Phase), Vec<Binding>> = HashMap::new();
        for b in &set.bindings {
            table
                .entry((b.target.clone(), b.phase))
                .or_default()
                .push(b.clone());
        }
        Self {
            registry,
            directory,
            table,
        }
    }

    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    /// Run every binding on `(target, phase)` in compiled order. Failures are
    /// logged and do not stop the remaining bindings. Returns how many ran.
    pub fn fire(&self, target: &Target, phase: Phase, inv: Invocation) -> usize {
        let Some(bindings) = self.table.get(&(target.clone(), phase)) else {
            return 0;
        };
        for b in bindings {
            if let Err(e) = self.run(b, inv) {
                tracing::warn!(binding = %b.name, code = e.code().as_str(), error = %e, "binding failed");
            }
        }
        bindings.len()
    }

    /// Run one binding.
    pub fn run(&self, binding: &Binding, inv: Invocation) -> Result<()> {
        let target = &binding.target;
        let r = &self.registry;
        match &binding.action {
            Action::Register {
                object_name,
                options,
                ..
            } => {
                self.directory.register(object_name, r, *options)?;
            }
            Action::IncrementInstanceCount => r.increment_instance_count(&target.entity_key()),
            Action::DecrementLiveInstanceCount => {
                r.decrement_live_instance_count(&target.entity_key())
            }
            Action::RecordCreationTime => r.record_creation_time(&target.entity_key(), inv.object),
            Action::RecordInstanceLifetime => {
                r.record_instance_lifetime(&target.entity_key(), inv.object)?;
            }
            Action::IncrementCallCount => r.increment_call_count(&target.operation_key()),
            Action::RecordCallStart => r.record_call_start(&target.operation_key(), inv.call),
            Action::RecordCallEnd => {
                r.record_call_end(&target.operation_key(), inv.call)?;
            }
            Action::IncrementExceptionExit => {
                r.increment_exception_exit(&target.operation_key(), inv.call);
            }
        }
        Ok(())
    }
}
