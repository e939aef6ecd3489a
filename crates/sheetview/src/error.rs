//! Error types for the sheetview crate.

use thiserror::Error;

use crate::condition::Condition;
use crate::kind::FieldKind;

/// Errors that can occur when evaluating, ordering or editing view rules.
///
/// Every operation in this crate is deterministic, so none of these are
/// worth retrying: the same inputs reproduce the same failure.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A stored value's shape disagrees with its field's kind.
    #[error("type mismatch on field '{field}': expected {expected} value, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: &'static str,
    },

    /// A field type name that does not map to any kind.
    #[error("unknown field type '{0}'")]
    UnknownFieldKind(String),

    /// A condition that is not part of the kind's predicate table.
    #[error("condition '{condition}' is not valid for {kind} fields")]
    UnknownCondition { kind: FieldKind, condition: String },

    /// A rule references a field the catalog does not know.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The filter operand has the wrong shape for its condition.
    #[error("condition '{condition}' expects {expected} operand")]
    InvalidOperand {
        condition: Condition,
        expected: &'static str,
    },

    /// A position outside the rule list.
    #[error("index {index} is out of range for {len} rules")]
    IndexOutOfRange { index: usize, len: usize },

    /// No rule with the given id exists in the list.
    #[error("rule '{0}' not found")]
    RuleNotFound(String),

    /// Group or sequence numbers are not contiguous from 1.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// YAML input could not be parsed.
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON input could not be parsed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sheetview operations.
pub type Result<T> = std::result::Result<T, ViewError>;
