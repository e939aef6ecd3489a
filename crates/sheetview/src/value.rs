//! Runtime field values and their canonical equality.
//!
//! A [`FieldValue`] is what a record stores for one field. Each variant
//! belongs to exactly one [`FieldKind`]; [`FieldValue::check_kind`] rejects a
//! value whose shape disagrees with the field it is stored under.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Calendar;
use crate::error::{Result, ViewError};
use crate::kind::FieldKind;

/// Value of a single field on a record.
///
/// Absent values are explicit: `Text(None)`, `Number(None)`, `Date(None)`,
/// `SingleSelect(None)`, or an empty `MultiSelect`. A checkbox always holds
/// a boolean.
///
/// # Example
///
/// ```
/// use sheetview::{FieldKind, FieldValue};
///
/// let value = FieldValue::number(4.5);
/// assert!(value.check_kind("estimate", FieldKind::Number).is_ok());
/// assert!(value.check_kind("estimate", FieldKind::Text).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Boolean(bool),
    Text(Option<String>),
    Number(Option<f64>),
    Date(Option<DateTime<Utc>>),
    /// Id of the selected option, collaborator or linked record.
    SingleSelect(Option<String>),
    /// Ids of the selected entries; empty means no selection.
    MultiSelect(Vec<String>),
}

impl FieldValue {
    /// Text value.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(Some(s.into()))
    }

    /// Number value.
    pub fn number(n: impl Into<f64>) -> Self {
        FieldValue::Number(Some(n.into()))
    }

    /// Date value.
    pub fn date(d: DateTime<Utc>) -> Self {
        FieldValue::Date(Some(d))
    }

    /// Single-select value.
    pub fn select(id: impl Into<String>) -> Self {
        FieldValue::SingleSelect(Some(id.into()))
    }

    /// Multi-select value.
    pub fn multi<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::MultiSelect(ids.into_iter().map(Into::into).collect())
    }

    /// Returns the value a record holds for a field it has never set.
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Boolean => FieldValue::Boolean(false),
            FieldKind::Text => FieldValue::Text(None),
            FieldKind::Number => FieldValue::Number(None),
            FieldKind::Date => FieldValue::Date(None),
            FieldKind::SingleSelect => FieldValue::SingleSelect(None),
            FieldKind::MultiSelect => FieldValue::MultiSelect(Vec::new()),
        }
    }

    /// Returns the kind this value's shape belongs to.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::SingleSelect(_) => FieldKind::SingleSelect,
            FieldValue::MultiSelect(_) => FieldKind::MultiSelect,
        }
    }

    /// Returns the shape name used in error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Text(_) => "string",
            FieldValue::Number(_) => "number",
            FieldValue::Date(_) => "date",
            FieldValue::SingleSelect(_) => "id",
            FieldValue::MultiSelect(_) => "id array",
        }
    }

    /// Verifies that this value may be stored under a field of `kind`.
    pub fn check_kind(&self, field: &str, kind: FieldKind) -> Result<()> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(ViewError::TypeMismatch {
                field: field.to_string(),
                expected: kind,
                actual: self.shape_name(),
            })
        }
    }

    /// Returns `true` if the value counts as empty.
    ///
    /// An empty string is as empty as a missing one. Checkboxes are never
    /// empty: unchecked is a value.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Boolean(_) => false,
            FieldValue::Text(s) => s.as_deref().map_or(true, str::is_empty),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::SingleSelect(id) => id.is_none(),
            FieldValue::MultiSelect(ids) => ids.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => s.as_deref(),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => *n,
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => *d,
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&str> {
        match self {
            FieldValue::SingleSelect(id) => id.as_deref(),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            FieldValue::MultiSelect(ids) => Some(ids),
            _ => None,
        }
    }

    /// Returns the referenced ids, first entry first.
    ///
    /// Empty for non-select kinds and for empty selections.
    pub fn selected_ids(&self) -> Cow<'_, [String]> {
        match self {
            FieldValue::SingleSelect(Some(id)) => Cow::Owned(vec![id.clone()]),
            FieldValue::MultiSelect(ids) => Cow::Borrowed(ids),
            _ => Cow::Borrowed(&[]),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::text(s)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(Some(s))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(Some(n))
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(Some(n as f64))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(Some(d))
    }
}

/// Canonical equality of two values of the same kind.
///
/// Booleans, text, numbers and single selects compare by identity (two
/// missing values are equal). Dates are equal when they fall on the same
/// calendar day. Multi selects are equal when they hold the same set of ids,
/// in any order.
///
/// Both values must have shape `kind`; otherwise `TypeMismatch` is returned
/// for whichever one disagrees.
pub fn values_equal(
    field: &str,
    kind: FieldKind,
    a: &FieldValue,
    b: &FieldValue,
    calendar: &Calendar,
) -> Result<bool> {
    a.check_kind(field, kind)?;
    b.check_kind(field, kind)?;

    let equal = match (a, b) {
        (FieldValue::Date(Some(x)), FieldValue::Date(Some(y))) => calendar.same_day(x, y),
        (FieldValue::MultiSelect(x), FieldValue::MultiSelect(y)) => same_set(x, y),
        _ => a == b,
    };
    Ok(equal)
}

/// Set equality, ignoring order and duplicates.
pub(crate) fn same_set(a: &[String], b: &[String]) -> bool {
    let left: HashSet<&str> = a.iter().map(String::as_str).collect();
    let right: HashSet<&str> = b.iter().map(String::as_str).collect();
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn empty_values_match_their_kind() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldValue::empty(kind).kind(), kind);
        }
    }

    #[test]
    fn empty_values_are_empty_except_boolean() {
        for kind in FieldKind::ALL {
            let expected = kind != FieldKind::Boolean;
            assert_eq!(FieldValue::empty(kind).is_empty(), expected, "{kind}");
        }
    }

    #[test]
    fn empty_string_is_empty() {
        assert!(FieldValue::text("").is_empty());
        assert!(!FieldValue::text(" ").is_empty());
    }

    #[test]
    fn check_kind_reports_shapes() {
        let err = FieldValue::text("x")
            .check_kind("age", FieldKind::Number)
            .unwrap_err();
        match err {
            ViewError::TypeMismatch {
                field,
                expected,
                actual,
            } => {
                assert_eq!(field, "age");
                assert_eq!(expected, FieldKind::Number);
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identity_equality() {
        let cal = Calendar::utc();
        assert!(values_equal("f", FieldKind::Text, &"a".into(), &"a".into(), &cal).unwrap());
        assert!(!values_equal("f", FieldKind::Text, &"a".into(), &"A".into(), &cal).unwrap());
        assert!(values_equal(
            "f",
            FieldKind::Number,
            &FieldValue::Number(None),
            &FieldValue::Number(None),
            &cal
        )
        .unwrap());
        assert!(values_equal("f", FieldKind::Boolean, &true.into(), &true.into(), &cal).unwrap());
        assert!(!values_equal(
            "f",
            FieldKind::SingleSelect,
            &FieldValue::select("a"),
            &FieldValue::select("b"),
            &cal
        )
        .unwrap());
    }

    #[test]
    fn dates_equal_on_same_day() {
        let cal = Calendar::utc();
        let morning = FieldValue::date(at(2024, 5, 1, 8));
        let evening = FieldValue::date(at(2024, 5, 1, 20));
        let next = FieldValue::date(at(2024, 5, 2, 8));

        assert!(values_equal("due", FieldKind::Date, &morning, &evening, &cal).unwrap());
        assert!(!values_equal("due", FieldKind::Date, &morning, &next, &cal).unwrap());
        assert!(
            !values_equal("due", FieldKind::Date, &morning, &FieldValue::Date(None), &cal)
                .unwrap()
        );
    }

    #[test]
    fn multi_select_is_set_equality() {
        let cal = Calendar::utc();
        let ab = FieldValue::multi(["a", "b"]);
        let ba = FieldValue::multi(["b", "a"]);
        let abc = FieldValue::multi(["a", "b", "c"]);

        assert!(values_equal("tags", FieldKind::MultiSelect, &ab, &ba, &cal).unwrap());
        assert!(!values_equal("tags", FieldKind::MultiSelect, &ab, &abc, &cal).unwrap());
        assert!(!values_equal("tags", FieldKind::MultiSelect, &abc, &ab, &cal).unwrap());
    }

    #[test]
    fn equality_rejects_mismatched_shapes() {
        let cal = Calendar::utc();
        let err = values_equal(
            "tags",
            FieldKind::MultiSelect,
            &FieldValue::multi(["a"]),
            &FieldValue::select("a"),
            &cal,
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::TypeMismatch { .. }));
    }

    #[test]
    fn selected_ids() {
        assert_eq!(FieldValue::select("x").selected_ids().as_ref(), ["x"]);
        assert_eq!(FieldValue::multi(["y", "z"]).selected_ids().as_ref(), ["y", "z"]);
        assert!(FieldValue::SingleSelect(None).selected_ids().is_empty());
        assert!(FieldValue::text("x").selected_ids().is_empty());
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&FieldValue::number(3.0)).unwrap();
        assert_eq!(json, r#"{"kind":"number","value":3.0}"#);

        let parsed: FieldValue =
            serde_json::from_str(r#"{"kind":"multiSelect","value":["a","b"]}"#).unwrap();
        assert_eq!(parsed, FieldValue::multi(["a", "b"]));

        let null: FieldValue = serde_json::from_str(r#"{"kind":"text","value":null}"#).unwrap();
        assert_eq!(null, FieldValue::Text(None));
    }
}
