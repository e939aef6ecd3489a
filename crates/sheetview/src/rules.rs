//! Sort and group-by rules.
//!
//! Both are plain ordered lists: `sequence` 1 is the primary key, 2 breaks
//! its ties, and so on. Sequences are kept contiguous by the
//! [`sequence`](crate::sequence) helpers.

use serde::{Deserialize, Serialize};

use crate::ordering::SortOrder;
use crate::sequence::Sequenced;

/// A sort rule of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub id: String,
    pub view_id: String,
    pub field_id: String,
    pub sequence: u32,
    #[serde(default)]
    pub order: SortOrder,
}

impl Sort {
    pub fn new(
        id: impl Into<String>,
        view_id: impl Into<String>,
        field_id: impl Into<String>,
        sequence: u32,
        order: SortOrder,
    ) -> Self {
        Sort {
            id: id.into(),
            view_id: view_id.into(),
            field_id: field_id.into(),
            sequence,
            order,
        }
    }

    /// Ascending sort rule.
    pub fn asc(id: impl Into<String>, field_id: impl Into<String>, sequence: u32) -> Self {
        Sort::new(id, "", field_id, sequence, SortOrder::Ascending)
    }

    /// Descending sort rule.
    pub fn desc(id: impl Into<String>, field_id: impl Into<String>, sequence: u32) -> Self {
        Sort::new(id, "", field_id, sequence, SortOrder::Descending)
    }
}

/// A row-grouping rule of a view.
///
/// Unrelated to filter groups: this buckets the visible records by the
/// value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBy {
    pub id: String,
    pub view_id: String,
    pub field_id: String,
    pub sequence: u32,
    #[serde(default)]
    pub order: SortOrder,
}

impl GroupBy {
    pub fn new(
        id: impl Into<String>,
        view_id: impl Into<String>,
        field_id: impl Into<String>,
        sequence: u32,
        order: SortOrder,
    ) -> Self {
        GroupBy {
            id: id.into(),
            view_id: view_id.into(),
            field_id: field_id.into(),
            sequence,
            order,
        }
    }
}

impl Sequenced for Sort {
    fn id(&self) -> &str {
        &self.id
    }

    fn sequence(&self) -> u32 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }
}

impl Sequenced for GroupBy {
    fn id(&self) -> &str {
        &self.id
    }

    fn sequence(&self) -> u32 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }
}
