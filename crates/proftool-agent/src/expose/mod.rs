//! Exposition of registry contents as named attributes.
//!
//! Re-exports the dispatcher, the object directory and the dump helpers so
//! downstream consumers can depend on this module directly.

pub mod directory;
pub mod dispatcher;
pub mod dump;
pub mod kind;

pub use directory::{validate_object_name, ObjectDirectory};
pub use dispatcher::{AttributeDispatcher, AttributeInfo};
pub use dump::{render_text, write_json_snapshot, Snapshot};
pub use kind::MetricKind;
