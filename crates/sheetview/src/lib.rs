//! Sheetview - filter, sort and group resolution for spreadsheet-style views.
//!
//! Given the records of a collection and one view's rules, sheetview decides
//! which records are visible and in what order. It supports:
//!
//! - Fifteen field types reduced to six evaluation kinds
//! - Per-kind filter conditions with explicit handling of missing values
//! - Filters combined as an OR of AND-groups, encoded in group numbers
//! - Cascading, stable, null-first multi-key sorting
//! - Row grouping by one or more fields
//! - Pure editing helpers that keep group and sequence numbers contiguous
//!
//! # Quick Start
//!
//! ```rust
//! use sheetview::{
//!     Condition, Field, FieldType, Filter, MemoryCatalog, Record, Sort, ViewResolver,
//! };
//!
//! let catalog = MemoryCatalog::new()
//!     .with_field(Field::new("name", "people", "Name", FieldType::SingleLineText))
//!     .with_field(Field::new("age", "people", "Age", FieldType::Number));
//!
//! let records = vec![
//!     Record::new("r1", "people").with("name", "Maria").with("age", 28),
//!     Record::new("r2", "people").with("name", "Carl").with("age", 52),
//!     Record::new("r3", "people").with("name", "Bob").with("age", 61),
//! ];
//!
//! // name contains "a" AND age > 30
//! let filters = vec![
//!     Filter::new("f1", "grid", "name", 1, Condition::Contains, "a"),
//!     Filter::new("f2", "grid", "age", 1, Condition::GreaterThan, 30),
//! ];
//! let sorts = vec![Sort::asc("s1", "name", 1)];
//!
//! let visible = ViewResolver::new(&catalog)
//!     .resolve(&records, &filters, &sorts)
//!     .unwrap();
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].id, "r2");
//! ```
//!
//! # Filter Semantics
//!
//! Filters sharing a `group` number are ANDed; different groups are ORed:
//!
//! ```text
//! match = any group g such that every filter in g matches
//!       (no filters at all matches every record)
//! ```
//!
//! Group numbers must be contiguous from 1. [`groups::set_relation`] and
//! [`groups::delete_filter`] edit the structure while keeping them so.
//!
//! # Kinds and Conditions
//!
//! | Kind | Conditions |
//! |------|------------|
//! | Text | `contains`, `doesNotContain`, `is`, `isNot`, `isEmpty`, `isNotEmpty` |
//! | Number | `equal`, `notEqual`, `lessThan`, `greaterThan`, `lessThanOrEqual`, `greaterThanOrEqual`, `isEmpty`, `isNotEmpty` |
//! | Date | `is`, `isNot`, `isBefore`, `isAfter`, `isOnOrBefore`, `isOnOrAfter`, `isWithin`, `isEmpty`, `isNotEmpty` |
//! | SingleSelect | `is`, `isNot`, `isAnyOf`, `isNoneOf`, `isEmpty`, `isNotEmpty` |
//! | MultiSelect | `hasAnyOf`, `hasAllOf`, `hasNoneOf`, `isEmpty`, `isNotEmpty` |
//! | Boolean | `is` |
//!
//! # Sorting
//!
//! Sorts apply by ascending `sequence`. Empty values sort first ascending
//! and last descending. Select kinds sort by the display text of their
//! first entry that resolves: an option label, a collaborator name, or a
//! linked record's primary field.

mod catalog;
mod condition;
mod config;
mod error;
mod filter;
pub mod groups;
mod kind;
mod model;
mod ordering;
pub mod predicate;
mod rules;
pub mod sequence;
mod value;
mod view;

// Re-export public API
pub use catalog::{display_text, plain_text, Catalog, MemoryCatalog};
pub use condition::{conditions_for, parse_for, Condition};
pub use config::{Calendar, EngineConfig};
pub use error::{Result, ViewError};
pub use filter::{Filter, Operand};
pub use groups::{GroupUpdates, Relation};
pub use kind::{FieldKind, FieldType, Reference};
pub use model::{Collaborator, Collection, Field, Record, SelectOption};
pub use ordering::{compare_keys, sort_key, sort_records, SortKey, SortOrder};
pub use rules::{GroupBy, Sort};
pub use sequence::{SequenceUpdates, Sequenced};
pub use value::{values_equal, FieldValue};
pub use view::{resolve_view, RecordGroup, ViewResolver};
