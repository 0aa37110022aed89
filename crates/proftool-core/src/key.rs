//! Sanitized metric keys.
//!
//! Raw identifiers (class names, method signatures) contain characters that are
//! unsafe in a dotted attribute path. Keys are sanitized once, at write time, so
//! the registry's map keys are exactly the externally visible attribute prefixes.

use std::fmt;

use serde::Serialize;

/// Separator joining entity and operation before sanitization.
pub const SEPARATOR: char = '#';

/// Map a raw identifier to a namespace-safe key.
///
/// Space, `(` and `,` become `_`; `)`, `<`, `>`, `?`, `/` and `\` are dropped;
/// the internal separator becomes `.`. None of the replacement characters are
/// themselves rewritten, so the mapping is idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            ' ' | '(' | ',' => out.push('_'),
            ')' | '<' | '>' | '?' | '/' | '\\' => {}
            SEPARATOR => out.push('.'),
            other => out.push(other),
        }
    }
    out
}

/// A sanitized registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MetricKey(String);

impl MetricKey {
    /// Key for entity-scoped metrics (instances, lifetimes).
    pub fn entity(entity: &str) -> Self {
        Self(sanitize(entity))
    }

    /// Key for operation-scoped metrics (calls, exec times, exception exits).
    pub fn operation(entity: &str, operation: &str) -> Self {
        let mut raw = String::with_capacity(entity.len() + operation.len() + 1);
        raw.push_str(entity);
        raw.push(SEPARATOR);
        raw.push_str(operation);
        Self(sanitize(&raw))
    }

    /// Accept `s` as a key only if it is already in sanitized form, i.e. it
    /// could have been produced by [`sanitize`]. Raw identifiers yield `None`.
    pub fn from_sanitized(s: &str) -> Option<Self> {
        if sanitize(s) == s {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
