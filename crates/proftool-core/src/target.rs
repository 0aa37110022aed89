//! Monitoring targets (`entity#operation` lines).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProfError, Result};
use crate::key::{MetricKey, SEPARATOR};

/// A monitorable unit: an entity (e.g. a class) and one of its operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    pub entity: String,
    pub operation: String,
}

impl Target {
    pub fn new(entity: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            operation: operation.into(),
        }
    }

    /// Parse one target list line. `line_no` is 1-based and only used for errors.
    ///
    /// The first `#` splits entity from operation; later `#`s belong to the
    /// operation.
    pub fn parse_line(line_no: usize, line: &str) -> Result<Self> {
        let (entity, operation) = line.split_once(SEPARATOR).ok_or_else(|| {
            ProfError::InputFormat {
                line: line_no,
                reason: format!("missing '{SEPARATOR}' separator in {line:?}"),
            }
        })?;
        if entity.is_empty() {
            return Err(ProfError::InputFormat {
                line: line_no,
                reason: format!("empty entity in {line:?}"),
            });
        }
        if operation.is_empty() {
            return Err(ProfError::InputFormat {
                line: line_no,
                reason: format!("empty operation in {line:?}"),
            });
        }
        Ok(Self::new(entity, operation))
    }

    pub fn entity_key(&self) -> MetricKey {
        MetricKey::entity(&self.entity)
    }

    pub fn operation_key(&self) -> MetricKey {
        MetricKey::operation(&self.entity, &self.operation)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.entity, SEPARATOR, self.operation)
    }
}
