//! Compiler config loader (strict parsing).

pub mod schema;

use std::fs;

use proftool_core::error::{ProfError, Result};

pub use schema::{CompilerSection, ProfToolConfig, RegistrationSection};

pub fn load_from_file(path: &str) -> Result<ProfToolConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ProfError::Io(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ProfToolConfig> {
    let cfg: ProfToolConfig =
        serde_yaml::from_str(s).map_err(|e| ProfError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
