//! Instrumentation bindings: a target, a lifecycle phase and an action.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flags::RecordOptions;
use crate::target::Target;

/// Point in a method's execution where a binding fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Entry,
    Exit,
    ExceptionExit,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Entry => "ENTRY",
            Phase::Exit => "EXIT",
            Phase::ExceptionExit => "EXCEPTION EXIT",
        }
    }
}

/// What the instrumented code path does when a binding fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Publish the statistics object and fix the registry's record options.
    Register {
        /// Helper-side entry point named in the configuration (e.g. `registerMBean`).
        call: String,
        object_name: String,
        options: RecordOptions,
    },
    IncrementInstanceCount,
    DecrementLiveInstanceCount,
    RecordCreationTime,
    RecordInstanceLifetime,
    IncrementCallCount,
    RecordCallStart,
    RecordCallEnd,
    IncrementExceptionExit,
}

impl Action {
    /// Stable action name as consumed by the script encoder.
    pub fn name(&self) -> &str {
        match self {
            Action::Register { call, .. } => call,
            Action::IncrementInstanceCount => "incrementInstanceCount",
            Action::DecrementLiveInstanceCount => "decrementLiveInstanceCount",
            Action::RecordCreationTime => "recordInstanceCreationTime",
            Action::RecordInstanceLifetime => "recordInstanceLifetime",
            Action::IncrementCallCount => "incrementMethodCallCount",
            Action::RecordCallStart => "recordMethodCallTime",
            Action::RecordCallEnd => "recordMethodExecTime",
            Action::IncrementExceptionExit => "incrementMethodExitExceptCount",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Register {
                call,
                object_name,
                options,
            } => write!(
                f,
                "{call}({object_name:?}, {}, {}, {}, {}, {})",
                options.lifetime_min,
                options.lifetime_max,
                options.exec_time_min,
                options.exec_time_max,
                options.exception_exits
            ),
            other => f.write_str(other.name()),
        }
    }
}

/// One instrumentation instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Human-readable rule name, unique within a compiled set.
    pub name: String,
    pub target: Target,
    pub phase: Phase,
    pub action: Action,
    /// Position in the compiled output (0-based).
    pub order: usize,
}

/// Compiled output: the helper the bindings call into plus the bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSet {
    pub helper: String,
    pub bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings carrying a given action kind (ignores `Register` payloads).
    pub fn count_of(&self, action: &Action) -> usize {
        self.bindings
            .iter()
            .filter(|b| std::mem::discriminant(&b.action) == std::mem::discriminant(action))
            .count()
    }
}
