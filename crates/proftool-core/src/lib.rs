//! proftool core: the data model shared by the binding compiler and the
//! in-process metrics agent.
//!
//! This crate defines targets, feature flags, bindings, sanitized metric keys
//! and the error surface. It carries no runtime dependencies so the model can
//! be reused by tooling that only compiles bindings.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Instrumented code
//! paths call into this model, so every fallible path must surface as
//! `ProfError`/`Result` rather than take the host process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod binding;
pub mod error;
pub mod flags;
pub mod key;
pub mod target;

/// Shared result type.
pub use error::{ErrorCode, ProfError, Result};
pub use flags::{FeatureFlags, RecordOptions};
pub use key::MetricKey;
pub use target::Target;
