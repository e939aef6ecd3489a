//! Field types and the evaluation kinds they reduce to.
//!
//! A collection can hold fifteen concrete [`FieldType`]s, but filtering and
//! sorting only care about six [`FieldKind`]s. Per-type configuration such as
//! a currency symbol or a date format never affects evaluation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};

/// Evaluation-level category of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Boolean,
    Text,
    Number,
    Date,
    SingleSelect,
    MultiSelect,
}

impl FieldKind {
    /// All kinds, in declaration order.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Boolean,
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::SingleSelect,
        FieldKind::MultiSelect,
    ];

    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::SingleSelect => "singleSelect",
            FieldKind::MultiSelect => "multiSelect",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Concrete field type as stored by the collection schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Checkbox,
    Currency,
    Date,
    Email,
    MultiCollaborator,
    MultiLineText,
    MultiOption,
    MultiRecordLink,
    Number,
    PhoneNumber,
    SingleCollaborator,
    SingleLineText,
    SingleOption,
    SingleRecordLink,
    Url,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 15] = [
        FieldType::Checkbox,
        FieldType::Currency,
        FieldType::Date,
        FieldType::Email,
        FieldType::MultiCollaborator,
        FieldType::MultiLineText,
        FieldType::MultiOption,
        FieldType::MultiRecordLink,
        FieldType::Number,
        FieldType::PhoneNumber,
        FieldType::SingleCollaborator,
        FieldType::SingleLineText,
        FieldType::SingleOption,
        FieldType::SingleRecordLink,
        FieldType::Url,
    ];

    /// Returns the evaluation kind of this field type.
    pub fn kind(self) -> FieldKind {
        match self {
            FieldType::Checkbox => FieldKind::Boolean,
            FieldType::SingleLineText
            | FieldType::MultiLineText
            | FieldType::Email
            | FieldType::PhoneNumber
            | FieldType::Url => FieldKind::Text,
            FieldType::Number | FieldType::Currency => FieldKind::Number,
            FieldType::Date => FieldKind::Date,
            FieldType::SingleOption
            | FieldType::SingleCollaborator
            | FieldType::SingleRecordLink => FieldKind::SingleSelect,
            FieldType::MultiOption
            | FieldType::MultiCollaborator
            | FieldType::MultiRecordLink => FieldKind::MultiSelect,
        }
    }

    /// Returns the target category for reference-valued types.
    ///
    /// Select values hold ids; sorting compares the text of whatever
    /// the id points at.
    pub fn reference(self) -> Option<Reference> {
        match self {
            FieldType::SingleOption | FieldType::MultiOption => Some(Reference::Option),
            FieldType::SingleCollaborator | FieldType::MultiCollaborator => {
                Some(Reference::Collaborator)
            }
            FieldType::SingleRecordLink | FieldType::MultiRecordLink => Some(Reference::Record),
            _ => None,
        }
    }

    /// Returns the wire name of this field type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Checkbox => "checkbox",
            FieldType::Currency => "currency",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::MultiCollaborator => "multiCollaborator",
            FieldType::MultiLineText => "multiLineText",
            FieldType::MultiOption => "multiOption",
            FieldType::MultiRecordLink => "multiRecordLink",
            FieldType::Number => "number",
            FieldType::PhoneNumber => "phoneNumber",
            FieldType::SingleCollaborator => "singleCollaborator",
            FieldType::SingleLineText => "singleLineText",
            FieldType::SingleOption => "singleOption",
            FieldType::SingleRecordLink => "singleRecordLink",
            FieldType::Url => "url",
        }
    }
}

impl FromStr for FieldType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ViewError::UnknownFieldKind(s.to_string()))
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a select-kind id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    /// An option declared on the field itself.
    Option,
    /// A workspace collaborator.
    Collaborator,
    /// A record in the linked collection.
    Record,
}
