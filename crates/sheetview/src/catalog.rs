//! Read-only lookups into the storage layer.
//!
//! The [`Catalog`] trait is the seam between this engine and whatever owns
//! collections, fields, collaborators and records. Sorting select-kind
//! fields needs it to turn ids into text; filtering needs it to find the
//! kind of each filtered field.
//!
//! # Manual Implementation
//!
//! ```
//! use sheetview::{Catalog, Collaborator, Collection, Field, Record};
//!
//! struct OnlyFields(Vec<Field>);
//!
//! impl Catalog for OnlyFields {
//!     fn field(&self, id: &str) -> Option<&Field> {
//!         self.0.iter().find(|f| f.id == id)
//!     }
//!     fn collaborator(&self, _id: &str) -> Option<&Collaborator> {
//!         None
//!     }
//!     fn record(&self, _id: &str) -> Option<&Record> {
//!         None
//!     }
//!     fn collection(&self, _id: &str) -> Option<&Collection> {
//!         None
//!     }
//! }
//! ```

use std::collections::HashMap;

use crate::error::{Result, ViewError};
use crate::kind::Reference;
use crate::model::{Collaborator, Collection, Field, Record};
use crate::value::FieldValue;

/// Read-only access to reference data.
pub trait Catalog {
    /// Returns field metadata by id.
    fn field(&self, id: &str) -> Option<&Field>;

    /// Returns a collaborator by id.
    fn collaborator(&self, id: &str) -> Option<&Collaborator>;

    /// Returns any record by id, for resolving record links.
    fn record(&self, id: &str) -> Option<&Record>;

    /// Returns a collection by id.
    fn collection(&self, id: &str) -> Option<&Collection>;

    /// Returns field metadata or fails with `UnknownField`.
    fn require_field(&self, id: &str) -> Result<&Field> {
        self.field(id)
            .ok_or_else(|| ViewError::UnknownField(id.to_string()))
    }
}

/// In-memory [`Catalog`] backed by hash maps.
///
/// ```
/// use sheetview::{Catalog, Field, FieldType, MemoryCatalog};
///
/// let catalog = MemoryCatalog::new()
///     .with_field(Field::new("name", "people", "Name", FieldType::SingleLineText));
///
/// assert!(catalog.field("name").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    fields: HashMap<String, Field>,
    collaborators: HashMap<String, Collaborator>,
    records: HashMap<String, Record>,
    collections: HashMap<String, Collection>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        MemoryCatalog::default()
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.insert_field(field);
        self
    }

    pub fn with_collaborator(mut self, collaborator: Collaborator) -> Self {
        self.collaborators
            .insert(collaborator.id.clone(), collaborator);
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.insert_record(record);
        self
    }

    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collections.insert(collection.id.clone(), collection);
        self
    }

    pub fn insert_field(&mut self, field: Field) {
        self.fields.insert(field.id.clone(), field);
    }

    pub fn insert_record(&mut self, record: Record) {
        self.records.insert(record.id.clone(), record);
    }

    /// Adds every record of a slice, e.g. a linked collection's rows.
    pub fn extend_records<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        for record in records {
            self.insert_record(record.clone());
        }
    }
}

impl Catalog for MemoryCatalog {
    fn field(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    fn collaborator(&self, id: &str) -> Option<&Collaborator> {
        self.collaborators.get(id)
    }

    fn record(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.get(id)
    }
}

/// Returns the display text of the entity a select-kind id points at.
///
/// - Options resolve to their label on `field`.
/// - Collaborators resolve to their name.
/// - Linked records resolve to the plain text of their collection's
///   primary field.
///
/// `None` means the id dangles or `field` does not hold references.
pub fn display_text<C: Catalog + ?Sized>(catalog: &C, field: &Field, id: &str) -> Option<String> {
    match field.field_type.reference()? {
        Reference::Option => field.option_label(id).map(str::to_string),
        Reference::Collaborator => catalog.collaborator(id).map(|c| c.name.clone()),
        Reference::Record => primary_text(catalog, id),
    }
}

/// Returns the first id of `ids` that resolves, with its display text.
pub(crate) fn first_resolved<'i, C: Catalog + ?Sized>(
    catalog: &C,
    field: &Field,
    ids: &'i [String],
) -> Option<(&'i str, String)> {
    ids.iter()
        .find_map(|id| display_text(catalog, field, id).map(|text| (id.as_str(), text)))
}

/// Returns the primary-field text of a record.
fn primary_text<C: Catalog + ?Sized>(catalog: &C, record_id: &str) -> Option<String> {
    let record = catalog.record(record_id)?;
    let collection = catalog.collection(&record.collection_id)?;
    let field = catalog.field(&collection.primary_field_id)?;
    let value = record.get(&field.id)?;
    Some(plain_text(catalog, field, value))
}

/// Renders a value as plain text without following record links.
///
/// Links render as their first id so a primary field that itself links
/// elsewhere cannot recurse.
pub fn plain_text<C: Catalog + ?Sized>(catalog: &C, field: &Field, value: &FieldValue) -> String {
    match value {
        FieldValue::Boolean(b) => b.to_string(),
        FieldValue::Text(s) => s.clone().unwrap_or_default(),
        FieldValue::Number(n) => n.map(|n| n.to_string()).unwrap_or_default(),
        FieldValue::Date(d) => d
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        FieldValue::SingleSelect(_) | FieldValue::MultiSelect(_) => {
            let ids = value.selected_ids();
            let Some(first) = ids.first() else {
                return String::new();
            };
            match field.field_type.reference() {
                Some(Reference::Option) => field.option_label(first).unwrap_or_default().into(),
                Some(Reference::Collaborator) => catalog
                    .collaborator(first)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                _ => first.clone(),
            }
        }
    }
}
