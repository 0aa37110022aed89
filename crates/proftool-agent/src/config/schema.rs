use serde::Deserialize;

use proftool_core::error::{ProfError, Result};
use proftool_core::FeatureFlags;

use crate::expose::validate_object_name;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfToolConfig {
    pub version: u32,

    #[serde(default)]
    pub compiler: CompilerSection,

    #[serde(default)]
    pub registration: RegistrationSection,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl ProfToolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ProfError::UnsupportedVersion);
        }
        self.compiler.validate()?;
        self.registration.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSection {
    /// Target list, one `entity#operation` per line.
    #[serde(default = "default_input_file")]
    pub input_file: String,

    /// Where the compiled binding set is written (JSON).
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Helper the bindings call into.
    #[serde(default = "default_helper")]
    pub helper: String,

    /// Operation that creates an instance.
    #[serde(default = "default_constructor")]
    pub constructor: String,

    /// Operation whose exit ends an instance's tracked lifetime.
    #[serde(default = "default_lifecycle_method")]
    pub lifecycle_method: String,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            output_file: default_output_file(),
            helper: default_helper(),
            constructor: default_constructor(),
            lifecycle_method: default_lifecycle_method(),
        }
    }
}

impl CompilerSection {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("compiler.input_file", &self.input_file),
            ("compiler.output_file", &self.output_file),
            ("compiler.helper", &self.helper),
            ("compiler.constructor", &self.constructor),
            ("compiler.lifecycle_method", &self.lifecycle_method),
        ] {
            if value.trim().is_empty() {
                return Err(ProfError::Config(format!("{field} must not be empty")));
            }
        }
        if self.input_file == self.output_file {
            return Err(ProfError::Config(
                "compiler.output_file must differ from compiler.input_file".into(),
            ));
        }
        Ok(())
    }
}

fn default_input_file() -> String {
    "targets.txt".into()
}
fn default_output_file() -> String {
    "rules.json".into()
}
fn default_helper() -> String {
    "proftool_agent::probe::Probe".into()
}
fn default_constructor() -> String {
    "<init>".into()
}
fn default_lifecycle_method() -> String {
    "run".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationSection {
    /// Entity whose operation publishes the statistics object.
    #[serde(default = "default_register_entity")]
    pub entity: String,

    #[serde(default = "default_register_operation")]
    pub operation: String,

    /// Helper entry point invoked by the registration binding.
    #[serde(default = "default_register_action")]
    pub action: String,

    /// Published name, `domain:key=value`.
    #[serde(default = "default_object_name")]
    pub object_name: String,
}

impl Default for RegistrationSection {
    fn default() -> Self {
        Self {
            entity: default_register_entity(),
            operation: default_register_operation(),
            action: default_register_action(),
            object_name: default_object_name(),
        }
    }
}

impl RegistrationSection {
    pub fn validate(&self) -> Result<()> {
        if self.entity.is_empty() || self.operation.is_empty() || self.action.is_empty() {
            return Err(ProfError::Config(
                "registration.entity, operation and action must not be empty".into(),
            ));
        }
        validate_object_name(&self.object_name)
            .map_err(|e| ProfError::Config(format!("registration.object_name: {e}")))
    }
}

fn default_register_entity() -> String {
    "proftool.ProfTool".into()
}
fn default_register_operation() -> String {
    "main".into()
}
fn default_register_action() -> String {
    "registerMBean".into()
}
fn default_object_name() -> String {
    "proftool:type=Statistics".into()
}
