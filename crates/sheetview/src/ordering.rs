//! Sort keys, per-kind comparators and cascading multi-key sorting.
//!
//! Each record's value is first resolved to a [`SortKey`], then keys are
//! compared with [`compare_keys`]. Empty values are the minimum for every
//! kind, so they come first in ascending order and last in descending
//! order.
//!
//! Descending order negates the comparator result instead of reversing the
//! sorted output, so records that compare equal keep their input order in
//! both directions.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{first_resolved, Catalog};
use crate::error::Result;
use crate::kind::FieldKind;
use crate::model::{Field, Record};
use crate::rules::Sort;
use crate::sequence;
use crate::value::FieldValue;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Smallest first, empty values first.
    #[default]
    Ascending,
    /// Largest first, empty values last.
    Descending,
}

impl SortOrder {
    /// Applies this direction to a comparator result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparable form of a field value.
///
/// Select kinds are resolved to the display text of their first entry
/// that resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Empty,
    Boolean(bool),
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Boolean(_) => 1,
            SortKey::Number(_) => 2,
            SortKey::Date(_) => 3,
            SortKey::Text(_) => 4,
        }
    }

    /// Returns the key as plain text. Dates render as their UTC day.
    pub fn label(&self) -> String {
        match self {
            SortKey::Empty => String::new(),
            SortKey::Boolean(b) => b.to_string(),
            SortKey::Text(s) => s.clone(),
            SortKey::Number(n) => n.to_string(),
            SortKey::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Compares two sort keys in ascending order.
///
/// - Empty is less than everything else.
/// - Text compares case-sensitively by code point.
/// - Numbers compare numerically (by IEEE total order, so NaN is stable).
/// - Dates compare chronologically.
/// - `false` sorts before `true`.
///
/// Keys from one field always share a variant; mixed variants fall back
/// to a fixed rank so the order stays total.
pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Boolean(x), SortKey::Boolean(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Resolves a record's value for `field` into a sort key.
pub fn sort_key<C: Catalog + ?Sized>(catalog: &C, field: &Field, record: &Record) -> Result<SortKey> {
    let value = record.value(field)?;
    Ok(key_of(catalog, field, &value))
}

fn key_of<C: Catalog + ?Sized>(catalog: &C, field: &Field, value: &FieldValue) -> SortKey {
    match field.kind() {
        FieldKind::Boolean => SortKey::Boolean(value.as_bool().unwrap_or(false)),
        FieldKind::Text => match value.as_text() {
            Some(s) if !s.is_empty() => SortKey::Text(s.to_string()),
            _ => SortKey::Empty,
        },
        FieldKind::Number => value.as_number().map_or(SortKey::Empty, SortKey::Number),
        FieldKind::Date => value.as_date().map_or(SortKey::Empty, SortKey::Date),
        FieldKind::SingleSelect | FieldKind::MultiSelect => {
            let ids = value.selected_ids();
            if ids.is_empty() {
                return SortKey::Empty;
            }
            let resolved = first_resolved(catalog, field, &ids);
            match resolved {
                Some((_, text)) if !text.is_empty() => SortKey::Text(text),
                Some(_) => SortKey::Empty,
                None => {
                    tracing::warn!(
                        field = %field.id,
                        references = ids.len(),
                        "unresolved references sort as empty"
                    );
                    SortKey::Empty
                }
            }
        }
    }
}

/// Sorts records by a cascade of sort rules.
///
/// Rules apply by ascending `sequence`: the first decides, later ones only
/// break ties. Records tied on every rule keep their input order. Keys are
/// resolved once per record and rule before sorting.
pub fn sort_records<'r, C: Catalog + ?Sized>(
    sorts: &[Sort],
    records: &[&'r Record],
    catalog: &C,
) -> Result<Vec<&'r Record>> {
    let mut keys = Vec::with_capacity(sorts.len());
    for sort in sequence::ordered_by_sequence(sorts)? {
        keys.push((catalog.require_field(&sort.field_id)?, sort.order));
    }
    sort_by_fields(&keys, records, catalog)
}

/// Stable sort of records by already-ordered `(field, order)` keys.
fn sort_by_fields<'r, C: Catalog + ?Sized>(
    keys: &[(&Field, SortOrder)],
    records: &[&'r Record],
    catalog: &C,
) -> Result<Vec<&'r Record>> {
    if keys.is_empty() {
        return Ok(records.to_vec());
    }

    let mut decorated: Vec<(Vec<SortKey>, &'r Record)> = Vec::with_capacity(records.len());
    for record in records {
        let mut row = Vec::with_capacity(keys.len());
        for (field, _) in keys {
            row.push(sort_key(catalog, field, record)?);
        }
        decorated.push((row, *record));
    }

    decorated.sort_by(|(a, _), (b, _)| compare_rows(a, b, keys));
    Ok(decorated.into_iter().map(|(_, record)| record).collect())
}

fn compare_rows(a: &[SortKey], b: &[SortKey], keys: &[(&Field, SortOrder)]) -> Ordering {
    for ((x, y), (_, order)) in a.iter().zip(b).zip(keys) {
        let ordering = order.apply(compare_keys(x, y));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::kind::FieldType;
    use crate::model::{Collaborator, Collection};
    use chrono::TimeZone;

    fn ids<'a>(records: &[&'a Record]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn order_apply() {
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Descending.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn empty_is_minimum() {
        for key in [
            SortKey::Boolean(false),
            SortKey::Text("".into()),
            SortKey::Number(f64::MIN),
            SortKey::Date(Utc.timestamp_opt(0, 0).unwrap()),
        ] {
            assert_eq!(compare_keys(&SortKey::Empty, &key), Ordering::Less);
            assert_eq!(compare_keys(&key, &SortKey::Empty), Ordering::Greater);
        }
        assert_eq!(compare_keys(&SortKey::Empty, &SortKey::Empty), Ordering::Equal);
    }

    #[test]
    fn text_is_case_sensitive() {
        let upper = SortKey::Text("Zebra".into());
        let lower = SortKey::Text("apple".into());
        assert_eq!(compare_keys(&upper, &lower), Ordering::Less);
    }

    #[test]
    fn booleans_false_first() {
        assert_eq!(
            compare_keys(&SortKey::Boolean(false), &SortKey::Boolean(true)),
            Ordering::Less
        );
    }

    #[test]
    fn numbers_with_null_ascending_and_descending() {
        let catalog =
            MemoryCatalog::new().with_field(Field::new("n", "c", "N", FieldType::Number));
        let records = [
            Record::new("two", "c").with("n", 2),
            Record::new("one", "c").with("n", 1),
            Record::new("none", "c"),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let asc = sort_records(&[Sort::asc("s", "n", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&asc), ["none", "one", "two"]);

        let desc = sort_records(&[Sort::desc("s", "n", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&desc), ["two", "one", "none"]);
    }

    #[test]
    fn cascade_uses_sequence_not_slice_order() {
        let catalog = MemoryCatalog::new()
            .with_field(Field::new("team", "c", "Team", FieldType::SingleLineText))
            .with_field(Field::new("score", "c", "Score", FieldType::Number));
        let records = [
            Record::new("a", "c").with("team", "red").with("score", 1),
            Record::new("b", "c").with("team", "blue").with("score", 5),
            Record::new("c", "c").with("team", "red").with("score", 9),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let sorts = [Sort::desc("s2", "score", 2), Sort::asc("s1", "team", 1)];

        let sorted = sort_records(&sorts, &refs, &catalog).unwrap();
        assert_eq!(ids(&sorted), ["b", "c", "a"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let catalog =
            MemoryCatalog::new().with_field(Field::new("done", "c", "Done", FieldType::Checkbox));
        let records = [
            Record::new("1", "c").with("done", true),
            Record::new("2", "c").with("done", false),
            Record::new("3", "c").with("done", true),
            Record::new("4", "c").with("done", false),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let asc = sort_records(&[Sort::asc("s", "done", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&asc), ["2", "4", "1", "3"]);

        let desc = sort_records(&[Sort::desc("s", "done", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&desc), ["1", "3", "2", "4"]);
    }

    #[test]
    fn select_kinds_sort_by_display_text() {
        let catalog = MemoryCatalog::new()
            .with_field(
                Field::new("prio", "c", "Priority", FieldType::SingleOption)
                    .with_option("o1", "Low")
                    .with_option("o2", "High"),
            )
            .with_field(Field::new("people", "c", "People", FieldType::MultiCollaborator))
            .with_collaborator(Collaborator {
                id: "u1".into(),
                name: "Zoe".into(),
                email: String::new(),
            })
            .with_collaborator(Collaborator {
                id: "u2".into(),
                name: "Bob".into(),
                email: String::new(),
            });

        let records = [
            Record::new("a", "c")
                .with("prio", FieldValue::select("o1"))
                .with("people", FieldValue::multi(["u1", "u2"])),
            Record::new("b", "c")
                .with("prio", FieldValue::select("o2"))
                .with("people", FieldValue::multi(["u2"])),
            Record::new("c", "c"),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let by_prio = sort_records(&[Sort::asc("s", "prio", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&by_prio), ["c", "b", "a"]);

        // only the first collaborator counts: Zoe vs Bob
        let by_people = sort_records(&[Sort::asc("s", "people", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&by_people), ["c", "b", "a"]);
    }

    #[test]
    fn record_links_sort_by_primary_field() {
        let catalog = MemoryCatalog::new()
            .with_field(Field::new("author", "books", "Author", FieldType::SingleRecordLink))
            .with_field(Field::new("name", "authors", "Name", FieldType::SingleLineText))
            .with_collection(Collection {
                id: "authors".into(),
                name: "Authors".into(),
                primary_field_id: "name".into(),
            })
            .with_record(Record::new("a1", "authors").with("name", "Woolf"))
            .with_record(Record::new("a2", "authors").with("name", "Austen"));

        let records = [
            Record::new("b1", "books").with("author", FieldValue::select("a1")),
            Record::new("b2", "books").with("author", FieldValue::select("a2")),
            Record::new("b3", "books").with("author", FieldValue::select("gone")),
        ];
        let refs: Vec<&Record> = records.iter().collect();

        let sorted = sort_records(&[Sort::asc("s", "author", 1)], &refs, &catalog).unwrap();
        assert_eq!(ids(&sorted), ["b3", "b2", "b1"]);
    }

    #[test]
    fn dangling_first_reference_falls_through_to_next() {
        let catalog = MemoryCatalog::new()
            .with_field(Field::new("people", "c", "People", FieldType::MultiCollaborator))
            .with_collaborator(Collaborator {
                id: "u1".into(),
                name: "Mia".into(),
                email: String::new(),
            });
        let field = catalog.require_field("people").unwrap();

        let record = Record::new("a", "c").with("people", FieldValue::multi(["gone", "u1"]));
        assert_eq!(
            sort_key(&catalog, field, &record).unwrap(),
            SortKey::Text("Mia".into())
        );

        let dangling = Record::new("b", "c").with("people", FieldValue::multi(["gone"]));
        assert_eq!(sort_key(&catalog, field, &dangling).unwrap(), SortKey::Empty);
    }

    #[test]
    fn rejects_gapped_sequences() {
        let catalog = MemoryCatalog::new();
        let result = sort_records(&[Sort::asc("s", "x", 2)], &[], &catalog);
        assert!(matches!(
            result,
            Err(crate::error::ViewError::InvariantViolation(_))
        ));
    }

    #[test]
    fn labels() {
        assert_eq!(SortKey::Empty.label(), "");
        assert_eq!(SortKey::Number(3.5).label(), "3.5");
        assert_eq!(SortKey::Text("x".into()).label(), "x");
    }
}
