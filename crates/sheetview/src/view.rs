//! View resolution: records in, visible ordered records out.
//!
//! [`ViewResolver`] ties the pieces together for one view:
//!
//! 1. order the filters by group and split them into OR-groups,
//! 2. keep the records that satisfy at least one group,
//! 3. sort the survivors by the view's sort rules.
//!
//! Resolution is pure. The resolver holds only borrowed reference data and a
//! calendar, so identical inputs always give identical output, order
//! included, and a resolver can be shared between threads when its catalog
//! can.

use chrono::NaiveDate;

use crate::catalog::{first_resolved, Catalog, MemoryCatalog};
use crate::config::{Calendar, EngineConfig};
use crate::error::Result;
use crate::filter::Filter;
use crate::groups;
use crate::kind::FieldKind;
use crate::model::{Field, Record};
use crate::ordering::{self, sort_key, SortKey, SortOrder};
use crate::rules::{GroupBy, Sort};
use crate::sequence;

/// Resolves the records of a view.
///
/// # Example
///
/// ```
/// use sheetview::{Condition, Field, FieldType, Filter, MemoryCatalog, Record, Sort, ViewResolver};
///
/// let catalog = MemoryCatalog::new()
///     .with_field(Field::new("name", "people", "Name", FieldType::SingleLineText))
///     .with_field(Field::new("age", "people", "Age", FieldType::Number));
///
/// let records = vec![
///     Record::new("1", "people").with("name", "Ada").with("age", 36),
///     Record::new("2", "people").with("name", "Alan").with("age", 41),
///     Record::new("3", "people").with("name", "Grace").with("age", 85),
/// ];
///
/// let filters = vec![Filter::new("f1", "grid", "name", 1, Condition::Contains, "a")];
/// let sorts = vec![Sort::desc("s1", "age", 1)];
///
/// let resolver = ViewResolver::new(&catalog);
/// let visible = resolver.resolve(&records, &filters, &sorts).unwrap();
///
/// let names: Vec<&str> = visible.iter().map(|r| r.id.as_str()).collect();
/// assert_eq!(names, ["3", "2", "1"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ViewResolver<'c, C: Catalog + ?Sized = MemoryCatalog> {
    catalog: &'c C,
    calendar: Calendar,
}

impl<'c, C: Catalog + ?Sized> ViewResolver<'c, C> {
    /// Creates a resolver using the UTC calendar.
    pub fn new(catalog: &'c C) -> Self {
        ViewResolver {
            catalog,
            calendar: Calendar::utc(),
        }
    }

    /// Creates a resolver using the calendar of `config`.
    pub fn with_config(catalog: &'c C, config: &EngineConfig) -> Result<Self> {
        Ok(ViewResolver {
            catalog,
            calendar: config.calendar()?,
        })
    }

    pub fn catalog(&self) -> &'c C {
        self.catalog
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Returns the visible records of the view, in display order.
    pub fn resolve<'r>(
        &self,
        records: &'r [Record],
        filters: &[Filter],
        sorts: &[Sort],
    ) -> Result<Vec<&'r Record>> {
        let visible = self.filter(records, filters)?;
        let sorted = ordering::sort_records(sorts, &visible, self.catalog)?;

        tracing::debug!(
            records = records.len(),
            visible = sorted.len(),
            filters = filters.len(),
            sorts = sorts.len(),
            "resolved view"
        );
        Ok(sorted)
    }

    /// Tests a single record against the view's filters.
    pub fn matches(&self, record: &Record, filters: &[Filter]) -> Result<bool> {
        let ordered = groups::order_filters(filters.to_vec());
        let groups = groups::partition_by_group(&ordered)?;
        groups::evaluate_groups(&groups, record, self.catalog, &self.calendar)
    }

    /// Counts the records that pass the view's filters.
    pub fn count(&self, records: &[Record], filters: &[Filter]) -> Result<usize> {
        Ok(self.filter(records, filters)?.len())
    }

    /// Returns the visible records bucketed by the view's group-by rules.
    ///
    /// Each group-by rule adds one nesting level, applied by sequence. Buckets
    /// of a level are ordered by their value in the rule's order; records
    /// inside a bucket follow the sort rules. Dates bucket by calendar day.
    ///
    /// Without group-by rules the result is a single group with an empty
    /// `field_id` holding every visible record.
    pub fn resolve_grouped<'r>(
        &self,
        records: &'r [Record],
        filters: &[Filter],
        group_bys: &[GroupBy],
        sorts: &[Sort],
    ) -> Result<Vec<RecordGroup<'r>>> {
        let mut levels: Vec<(&Field, SortOrder)> = Vec::new();
        for rule in sequence::ordered_by_sequence(group_bys)? {
            levels.push((self.catalog.require_field(&rule.field_id)?, rule.order));
        }

        let visible = self.filter(records, filters)?;
        let sorted = ordering::sort_records(sorts, &visible, self.catalog)?;

        tracing::debug!(
            records = records.len(),
            visible = sorted.len(),
            levels = levels.len(),
            "resolved grouped view"
        );
        if levels.is_empty() {
            return Ok(vec![RecordGroup {
                field_id: String::new(),
                label: String::new(),
                records: sorted,
                subgroups: Vec::new(),
            }]);
        }
        self.bucket(&levels, sorted)
    }

    fn filter<'r>(&self, records: &'r [Record], filters: &[Filter]) -> Result<Vec<&'r Record>> {
        let ordered = groups::order_filters(filters.to_vec());
        let groups = groups::partition_by_group(&ordered)?;

        let mut visible = Vec::with_capacity(records.len());
        for record in records {
            if groups::evaluate_groups(&groups, record, self.catalog, &self.calendar)? {
                visible.push(record);
            }
        }
        Ok(visible)
    }

    fn bucket<'r>(
        &self,
        levels: &[(&Field, SortOrder)],
        records: Vec<&'r Record>,
    ) -> Result<Vec<RecordGroup<'r>>> {
        let Some(((field, order), deeper)) = levels.split_first() else {
            return Ok(Vec::new());
        };

        let mut buckets: Vec<Bucket<'r>> = Vec::new();
        for record in records {
            let (key, rank, label) = self.bucket_of(field, record)?;
            match buckets.iter_mut().find(|b| b.key == key) {
                Some(bucket) => bucket.records.push(record),
                None => buckets.push(Bucket {
                    key,
                    rank,
                    label,
                    records: vec![record],
                }),
            }
        }
        buckets.sort_by(|a, b| order.apply(ordering::compare_keys(&a.rank, &b.rank)));

        let mut groups = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let subgroups = self.bucket(deeper, bucket.records.clone())?;
            groups.push(RecordGroup {
                field_id: field.id.clone(),
                label: bucket.label,
                records: bucket.records,
                subgroups,
            });
        }
        Ok(groups)
    }

    /// Resolves the bucket a record falls into for `field`: its identity,
    /// the key buckets are ordered by, and the label.
    fn bucket_of(&self, field: &Field, record: &Record) -> Result<(BucketKey, SortKey, String)> {
        let value = record.value(field)?;
        let bucket = match field.kind() {
            FieldKind::Date => match value.as_date() {
                Some(instant) => {
                    let day = self.calendar.day_of(&instant);
                    (
                        BucketKey::Day(day),
                        SortKey::Date(instant),
                        day.format("%Y-%m-%d").to_string(),
                    )
                }
                None => (BucketKey::Empty, SortKey::Empty, String::new()),
            },
            FieldKind::SingleSelect | FieldKind::MultiSelect => {
                let ids = value.selected_ids();
                let resolved = first_resolved(self.catalog, field, &ids);
                match resolved {
                    Some((id, text)) => {
                        let rank = if text.is_empty() {
                            SortKey::Empty
                        } else {
                            SortKey::Text(text.clone())
                        };
                        (BucketKey::Reference(id.to_string()), rank, text)
                    }
                    // unresolved references get their own bucket, labelled by id
                    None => match ids.first() {
                        Some(id) => (BucketKey::Reference(id.clone()), SortKey::Empty, id.clone()),
                        None => (BucketKey::Empty, SortKey::Empty, String::new()),
                    },
                }
            }
            _ => {
                let key = sort_key(self.catalog, field, record)?;
                let label = key.label();
                match key {
                    SortKey::Empty => (BucketKey::Empty, SortKey::Empty, label),
                    key => (BucketKey::Value(key.clone()), key, label),
                }
            }
        };
        Ok(bucket)
    }
}

/// Identity of a group-by bucket. Labels alone can collide.
#[derive(Debug, Clone, PartialEq)]
enum BucketKey {
    Empty,
    Day(NaiveDate),
    Reference(String),
    Value(SortKey),
}

struct Bucket<'r> {
    key: BucketKey,
    rank: SortKey,
    label: String,
    records: Vec<&'r Record>,
}

/// A bucket of records sharing one group-by value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordGroup<'r> {
    /// Field the bucket was formed on.
    pub field_id: String,
    /// Display text of the shared value; empty for empty values. A
    /// reference that no longer resolves is labelled with its id.
    pub label: String,
    /// Every record of the bucket, in display order.
    pub records: Vec<&'r Record>,
    /// Buckets of the next group-by level, empty at the innermost level.
    pub subgroups: Vec<RecordGroup<'r>>,
}

impl RecordGroup<'_> {
    /// Number of records in this bucket.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One-shot resolution of a view: filter, then sort.
pub fn resolve_view<'r, C: Catalog + ?Sized>(
    catalog: &C,
    records: &'r [Record],
    filters: &[Filter],
    sorts: &[Sort],
) -> Result<Vec<&'r Record>> {
    ViewResolver::new(catalog).resolve(records, filters, sorts)
}
