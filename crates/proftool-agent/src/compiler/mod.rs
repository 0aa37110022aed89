//! Binding compiler: targets + feature flags -> ordered, deduplicated bindings.
//!
//! Output shape, in input order:
//! 1. one registration binding carrying the registry's record options;
//! 2. for each retained line, the entity's per-entity bindings (first time the
//!    entity appears only), then the line's per-operation bindings.

use std::collections::HashSet;
use std::fs;
use std::io::BufRead;

use proftool_core::binding::{Action, Binding, BindingSet, Phase};
use proftool_core::error::{ProfError, Result};
use proftool_core::{FeatureFlags, Target};

use crate::config::ProfToolConfig;

/// Where and how the statistics object gets published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub helper: String,
    pub entity: String,
    pub operation: String,
    pub action: String,
    pub object_name: String,
}

/// Operations that bound an instance's life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    pub constructor: String,
    pub completion: String,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            constructor: "<init>".into(),
            completion: "run".into(),
        }
    }
}

pub struct BindingCompiler {
    flags: FeatureFlags,
    registration: Registration,
    lifecycle: Lifecycle,
}

impl BindingCompiler {
    /// Flags are normalized here; callers may pass them raw.
    pub fn new(flags: FeatureFlags, registration: Registration) -> Self {
        Self {
            flags: flags.normalized(),
            registration,
            lifecycle: Lifecycle::default(),
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn from_config(cfg: &ProfToolConfig) -> Self {
        let registration = Registration {
            helper: cfg.compiler.helper.clone(),
            entity: cfg.registration.entity.clone(),
            operation: cfg.registration.operation.clone(),
            action: cfg.registration.action.clone(),
            object_name: cfg.registration.object_name.clone(),
        };
        Self::new(cfg.features, registration).with_lifecycle(Lifecycle {
            constructor: cfg.compiler.constructor.clone(),
            completion: cfg.compiler.lifecycle_method.clone(),
        })
    }

    /// Effective (normalized) flags.
    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn compile<I, S>(&self, lines: I) -> Result<BindingSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Emitter::default();
        out.push(
            format!("Register statistics: {}", self.registration.object_name),
            Target::new(&self.registration.entity, &self.registration.operation),
            Phase::Entry,
            Action::Register {
                call: self.registration.action.clone(),
                object_name: self.registration.object_name.clone(),
                options: self.flags.record_options(),
            },
        );

        let mut seen_lines: HashSet<String> = HashSet::new();
        let mut seen_entities: HashSet<String> = HashSet::new();
        for (idx, raw) in lines.into_iter().enumerate() {
            let line = raw.as_ref().trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            if !seen_lines.insert(line.to_string()) {
                tracing::debug!(line = idx + 1, "duplicate target ignored");
                continue;
            }
            let target = Target::parse_line(idx + 1, line)?;
            if seen_entities.insert(target.entity.clone()) {
                self.emit_entity(&mut out, &target.entity);
            }
            self.emit_operation(&mut out, &target);
        }

        tracing::info!(
            bindings = out.bindings.len(),
            targets = seen_lines.len(),
            entities = seen_entities.len(),
            "bindings compiled"
        );
        Ok(BindingSet {
            helper: self.registration.helper.clone(),
            bindings: out.bindings,
        })
    }

    pub fn compile_str(&self, input: &str) -> Result<BindingSet> {
        self.compile(input.lines())
    }

    pub fn compile_reader<R: BufRead>(&self, reader: R) -> Result<BindingSet> {
        let lines = reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| ProfError::Io(format!("read targets failed: {e}")))?;
        self.compile(lines)
    }

    fn emit_entity(&self, out: &mut Emitter, entity: &str) {
        let f = &self.flags;
        let ctor = Target::new(entity, &self.lifecycle.constructor);
        let done = Target::new(entity, &self.lifecycle.completion);

        if f.instance_counts {
            out.push(
                format!("Increment instance count: {entity}"),
                ctor.clone(),
                Phase::Exit,
                Action::IncrementInstanceCount,
            );
        }
        if f.instance_lifetime_avg {
            out.push(
                format!("Record instance creation time: {entity}"),
                ctor,
                Phase::Entry,
                Action::RecordCreationTime,
            );
            out.push(
                format!("Record instance lifetime, no exceptions: {entity}"),
                done.clone(),
                Phase::Exit,
                Action::RecordInstanceLifetime,
            );
            out.push(
                format!("Record instance lifetime, if exceptions: {entity}"),
                done,
                Phase::ExceptionExit,
                Action::RecordInstanceLifetime,
            );
        } else if f.instance_counts {
            out.push(
                format!("Decrement live instance count, no exceptions: {entity}"),
                done.clone(),
                Phase::Exit,
                Action::DecrementLiveInstanceCount,
            );
            out.push(
                format!("Decrement live instance count, if exceptions: {entity}"),
                done,
                Phase::ExceptionExit,
                Action::DecrementLiveInstanceCount,
            );
        }
    }

    fn emit_operation(&self, out: &mut Emitter, target: &Target) {
        let f = &self.flags;
        let label = format!("{} - {}", target.entity, target.operation);

        if f.call_counts {
            out.push(
                format!("Increment call count: {label}"),
                target.clone(),
                Phase::Entry,
                Action::IncrementCallCount,
            );
        }
        if f.exec_time_avg {
            out.push(
                format!("Record call time of method: {label}"),
                target.clone(),
                Phase::Entry,
                Action::RecordCallStart,
            );
            out.push(
                format!("Record execution time of method: {label}"),
                target.clone(),
                Phase::Exit,
                Action::RecordCallEnd,
            );
        }
        if f.exception_exits {
            out.push(
                format!("Exits via exceptions from method: {label}"),
                target.clone(),
                Phase::ExceptionExit,
                Action::IncrementExceptionExit,
            );
        }
    }
}

#[derive(Default)]
struct Emitter {
    bindings: Vec<Binding>,
}

impl Emitter {
    fn push(&mut self, name: String, target: Target, phase: Phase, action: Action) {
        let order = self.bindings.len();
        tracing::debug!(order, %target, phase = phase.as_str(), action = action.name(), "binding");
        self.bindings.push(Binding {
            name,
            target,
            phase,
            action,
            order,
        });
    }
}

/// Compile the configured target file and write the binding set as JSON.
pub fn run(cfg: &ProfToolConfig) -> Result<BindingSet> {
    let input = fs::read_to_string(&cfg.compiler.input_file).map_err(|e| {
        ProfError::Io(format!("read {} failed: {e}", cfg.compiler.input_file))
    })?;
    let set = BindingCompiler::from_config(cfg).compile_str(&input)?;

    let json = serde_json::to_string_pretty(&set)
        .map_err(|e| ProfError::Io(format!("encode bindings failed: {e}")))?;
    fs::write(&cfg.compiler.output_file, json).map_err(|e| {
        ProfError::Io(format!("write {} failed: {e}", cfg.compiler.output_file))
    })?;
    tracing::info!(output = %cfg.compiler.output_file, bindings = set.len(), "binding set written");
    Ok(set)
}
