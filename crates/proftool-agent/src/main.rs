//! proftool: compile a target list into an instrumentation binding set.
//!
//! Usage: `proftool [config.yaml]` (default `proftool.yaml`).

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use proftool_agent::{compiler, config};

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "proftool.yaml".to_string());

    let result = config::load_from_file(&path).and_then(|cfg| compiler::run(&cfg));
    match result {
        Ok(set) => {
            tracing::info!(config = %path, bindings = set.len(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(config = %path, code = e.code().as_str(), "{e}");
            eprintln!("proftool error: {e}");
            ExitCode::FAILURE
        }
    }
}
