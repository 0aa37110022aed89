//! Top-level facade crate for proftool.
//!
//! Re-exports the core model and the agent library so users can depend on a single crate.

pub mod core {
    pub use proftool_core::*;
}

pub mod agent {
    pub use proftool_agent::*;
}
