//! Reference data owned by the storage layer.
//!
//! These types are read-only here. The engine looks fields, collaborators
//! and linked records up through a [`Catalog`](crate::Catalog) and never
//! writes them back.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kind::{FieldKind, FieldType};
use crate::value::FieldValue;

/// A column of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Declared options, for single and multi option fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl Field {
    /// Creates a field with no options.
    pub fn new(
        id: impl Into<String>,
        collection_id: impl Into<String>,
        name: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Field {
            id: id.into(),
            collection_id: collection_id.into(),
            name: name.into(),
            field_type,
            options: Vec::new(),
        }
    }

    /// Adds a declared option.
    pub fn with_option(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.field_type.kind()
    }

    /// Returns the label of a declared option.
    pub fn option_label(&self, option_id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.label.as_str())
    }
}

/// An option of a single or multi option field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

/// A collection of records sharing one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    /// Field whose value names a record when another collection links to it.
    pub primary_field_id: String,
}

/// A workspace member that collaborator fields can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A row of a collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub collection_id: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with no field values.
    pub fn new(id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Record {
            id: id.into(),
            collection_id: collection_id.into(),
            fields: HashMap::new(),
        }
    }

    /// Sets a field value.
    pub fn with(mut self, field_id: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field_id.into(), value.into());
        self
    }

    /// Returns the stored value, if any.
    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.fields.get(field_id)
    }

    /// Returns the value for `field`, checked against its kind.
    ///
    /// A field the record has never set reads as the kind's empty value.
    pub fn value(&self, field: &Field) -> Result<Cow<'_, FieldValue>> {
        match self.fields.get(&field.id) {
            Some(value) => {
                value.check_kind(&field.id, field.kind())?;
                Ok(Cow::Borrowed(value))
            }
            None => Ok(Cow::Owned(FieldValue::empty(field.kind()))),
        }
    }
}
