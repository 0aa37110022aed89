//! proftool agent library entry.
//!
//! This crate wires the binding compiler, the metrics registry, and the
//! attribute exposition layer together. It is consumed by the `proftool`
//! binary (`main.rs`) and by instrumented processes that link the registry.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod compiler;
pub mod config;
pub mod expose;
pub mod probe;
pub mod registry;
