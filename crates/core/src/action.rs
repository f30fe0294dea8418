//! Actions submitted by the grid and their per-action results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ordering::OrderingChange;
use crate::types::DbId;

/// One proposed mutation of one logical field, keyed by dotted path.
///
/// A missing value deserializes as `null`, which counts as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub key: String,
    #[serde(default)]
    pub old_value: Value,
    #[serde(default)]
    pub new_value: Value,
}

impl FieldChange {
    pub fn new(key: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            key: key.into(),
            old_value,
            new_value,
        }
    }
}

/// A single grid action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataAction {
    /// Create a record. For ordered collections an ordering proposal may
    /// place the new record at `insertion_index`.
    Create {
        changes: Vec<FieldChange>,
        #[serde(default)]
        ordering: Option<OrderingChange>,
        #[serde(default)]
        insertion_index: Option<usize>,
    },
    Update {
        id: DbId,
        changes: Vec<FieldChange>,
    },
    Delete {
        id: DbId,
    },
    Reorder {
        old_ordering: Vec<DbId>,
        new_ordering: Vec<DbId>,
    },
}

impl DataAction {
    pub fn is_reorder(&self) -> bool {
        matches!(self, DataAction::Reorder { .. })
    }
}

/// Result of one action.
///
/// `processed` says whether the action was attempted at all; `success`
/// whether it fully applied. A caller can tell "never tried" from "tried and
/// rejected" from "tried and storage failed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub processed: bool,
    pub success: bool,
    pub message: String,
    /// The stored record a create produced, generated id and defaults
    /// included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Value>,
}

impl ActionResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            processed: true,
            success: true,
            message: message.into(),
            record: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            processed: true,
            success: false,
            message: message.into(),
            record: None,
        }
    }

    pub fn not_processed(message: impl Into<String>) -> Self {
        Self {
            processed: false,
            success: false,
            message: message.into(),
            record: None,
        }
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }
}

/// Results of a batch of independently applied actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// `true` only when every action succeeded.
    pub success: bool,
    pub message: String,
    pub results: Vec<ActionResult>,
}

impl BatchResult {
    pub fn from_results(results: Vec<ActionResult>) -> Self {
        let success = results.iter().all(|r| r.success);
        let message = if success {
            format!("Applied {} action(s).", results.len())
        } else {
            results
                .iter()
                .filter(|r| !r.success)
                .map(|r| r.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };
        Self {
            success,
            message,
            results,
        }
    }
}
