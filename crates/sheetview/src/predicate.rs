//! Per-kind predicate tables.
//!
//! [`evaluate`] dispatches on [`FieldKind`] to one pure function per kind.
//! Each function matches on the [`Condition`] and handles missing values
//! explicitly; a missing value never causes an error.
//!
//! | Kind | Missing value |
//! |------|---------------|
//! | Text | contains nothing, equals nothing, is empty |
//! | Number | fails every comparison except `NotEqual` |
//! | Date | fails every comparison, `IsNot` included |
//! | SingleSelect | `IsAnyOf` false, `IsNoneOf` true |
//! | MultiSelect | an empty selection |

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::condition::Condition;
use crate::config::Calendar;
use crate::error::{Result, ViewError};
use crate::filter::Operand;
use crate::kind::FieldKind;
use crate::value::FieldValue;

/// Evaluates `condition` for a value of `kind` against `operand`.
///
/// The value must have shape `kind`. An operand of the wrong shape fails
/// with `InvalidOperand`; a condition outside the kind's table fails with
/// `UnknownCondition`.
///
/// ```
/// use sheetview::{predicate, Calendar, Condition, FieldKind, FieldValue, Operand};
///
/// let hit = predicate::evaluate(
///     FieldKind::Text,
///     Condition::Contains,
///     &FieldValue::text("Grace Hopper"),
///     &Operand::Text("hop".into()),
///     &Calendar::utc(),
/// )
/// .unwrap();
/// assert!(hit);
/// ```
pub fn evaluate(
    kind: FieldKind,
    condition: Condition,
    value: &FieldValue,
    operand: &Operand,
    calendar: &Calendar,
) -> Result<bool> {
    condition.ensure_valid_for(kind)?;
    value.check_kind("<value>", kind)?;

    match kind {
        FieldKind::Boolean => boolean(condition, value.as_bool().unwrap_or(false), operand),
        FieldKind::Text => text(condition, value.as_text(), operand),
        FieldKind::Number => number(condition, value.as_number(), operand),
        FieldKind::Date => date(condition, value.as_date(), operand, calendar),
        FieldKind::SingleSelect => single_select(condition, value.as_select(), operand),
        FieldKind::MultiSelect => multi_select(condition, value.as_multi().unwrap_or(&[]), operand),
    }
}

/// Boolean table: strict equality only.
pub fn boolean(condition: Condition, value: bool, operand: &Operand) -> Result<bool> {
    match condition {
        Condition::Is => Ok(value == expect_bool(condition, operand)?),
        other => Err(unknown(FieldKind::Boolean, other)),
    }
}

/// Text table.
///
/// `Contains` and `DoesNotContain` ignore case; `Is` and `IsNot` do not.
pub fn text(condition: Condition, value: Option<&str>, operand: &Operand) -> Result<bool> {
    match condition {
        Condition::IsEmpty => return Ok(value.map_or(true, str::is_empty)),
        Condition::IsNotEmpty => return Ok(!value.map_or(true, str::is_empty)),
        _ => {}
    }

    let reference = expect_text(condition, operand)?;
    match condition {
        Condition::Contains => Ok(contains_ignore_case(value.unwrap_or(""), reference)),
        Condition::DoesNotContain => Ok(!contains_ignore_case(value.unwrap_or(""), reference)),
        Condition::Is => Ok(value == Some(reference)),
        Condition::IsNot => Ok(value != Some(reference)),
        other => Err(unknown(FieldKind::Text, other)),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Number table.
pub fn number(condition: Condition, value: Option<f64>, operand: &Operand) -> Result<bool> {
    match condition {
        Condition::IsEmpty => return Ok(value.is_none()),
        Condition::IsNotEmpty => return Ok(value.is_some()),
        _ => {}
    }

    let reference = expect_number(condition, operand)?;
    let Some(value) = value else {
        return Ok(condition == Condition::NotEqual);
    };
    match condition {
        Condition::Equal => Ok(value == reference),
        Condition::NotEqual => Ok(value != reference),
        Condition::LessThan => Ok(value < reference),
        Condition::GreaterThan => Ok(value > reference),
        Condition::LessThanOrEqual => Ok(value <= reference),
        Condition::GreaterThanOrEqual => Ok(value >= reference),
        other => Err(unknown(FieldKind::Number, other)),
    }
}

/// Date table.
///
/// Every comparison is made between calendar days in `calendar`, so
/// `IsOnOrBefore` accepts any instant of the reference day.
pub fn date(
    condition: Condition,
    value: Option<DateTime<Utc>>,
    operand: &Operand,
    calendar: &Calendar,
) -> Result<bool> {
    match condition {
        Condition::IsEmpty => return Ok(value.is_none()),
        Condition::IsNotEmpty => return Ok(value.is_some()),
        Condition::IsWithin => {
            let (start, end) = expect_range(condition, operand)?;
            let Some(value) = value else {
                return Ok(false);
            };
            let day = calendar.day_of(&value);
            return Ok(calendar.day_of(&start) <= day && day <= calendar.day_of(&end));
        }
        _ => {}
    }

    let reference = calendar.day_of(&expect_date(condition, operand)?);
    let Some(value) = value else {
        return Ok(false);
    };
    let day: NaiveDate = calendar.day_of(&value);
    match condition {
        Condition::Is => Ok(day == reference),
        Condition::IsNot => Ok(day != reference),
        Condition::IsBefore => Ok(day < reference),
        Condition::IsAfter => Ok(day > reference),
        Condition::IsOnOrBefore => Ok(day <= reference),
        Condition::IsOnOrAfter => Ok(day >= reference),
        other => Err(unknown(FieldKind::Date, other)),
    }
}

/// Single-select table.
pub fn single_select(condition: Condition, value: Option<&str>, operand: &Operand) -> Result<bool> {
    match condition {
        Condition::IsEmpty => Ok(value.is_none()),
        Condition::IsNotEmpty => Ok(value.is_some()),
        Condition::Is => Ok(value == Some(expect_id(condition, operand)?)),
        Condition::IsNot => Ok(value != Some(expect_id(condition, operand)?)),
        Condition::IsAnyOf => {
            let set = expect_ids(condition, operand)?;
            Ok(value.is_some_and(|v| set.iter().any(|id| id == v)))
        }
        Condition::IsNoneOf => {
            let set = expect_ids(condition, operand)?;
            Ok(!value.is_some_and(|v| set.iter().any(|id| id == v)))
        }
        other => Err(unknown(FieldKind::SingleSelect, other)),
    }
}

/// Multi-select table.
pub fn multi_select(condition: Condition, value: &[String], operand: &Operand) -> Result<bool> {
    match condition {
        Condition::IsEmpty => return Ok(value.is_empty()),
        Condition::IsNotEmpty => return Ok(!value.is_empty()),
        _ => {}
    }

    let reference = expect_ids(condition, operand)?;
    let held: HashSet<&str> = value.iter().map(String::as_str).collect();
    match condition {
        Condition::HasAnyOf => Ok(reference.iter().any(|id| held.contains(id.as_str()))),
        Condition::HasAllOf => Ok(reference.iter().all(|id| held.contains(id.as_str()))),
        Condition::HasNoneOf => Ok(!reference.iter().any(|id| held.contains(id.as_str()))),
        other => Err(unknown(FieldKind::MultiSelect, other)),
    }
}

fn unknown(kind: FieldKind, condition: Condition) -> ViewError {
    ViewError::UnknownCondition {
        kind,
        condition: condition.as_str().to_string(),
    }
}

fn invalid(condition: Condition, expected: &'static str) -> ViewError {
    ViewError::InvalidOperand {
        condition,
        expected,
    }
}

fn expect_bool(condition: Condition, operand: &Operand) -> Result<bool> {
    match operand {
        Operand::Boolean(b) => Ok(*b),
        _ => Err(invalid(condition, "a boolean")),
    }
}

fn expect_text(condition: Condition, operand: &Operand) -> Result<&str> {
    match operand {
        Operand::Text(s) => Ok(s),
        _ => Err(invalid(condition, "a text")),
    }
}

fn expect_number(condition: Condition, operand: &Operand) -> Result<f64> {
    match operand {
        Operand::Number(n) => Ok(*n),
        _ => Err(invalid(condition, "a number")),
    }
}

fn expect_date(condition: Condition, operand: &Operand) -> Result<DateTime<Utc>> {
    match operand {
        Operand::Date(d) => Ok(*d),
        _ => Err(invalid(condition, "a date")),
    }
}

fn expect_range(condition: Condition, operand: &Operand) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    match operand {
        Operand::DateRange { start, end } => Ok((*start, *end)),
        _ => Err(invalid(condition, "a date range")),
    }
}

fn expect_id(condition: Condition, operand: &Operand) -> Result<&str> {
    match operand {
        Operand::Id(id) => Ok(id),
        _ => Err(invalid(condition, "an id")),
    }
}

fn expect_ids(condition: Condition, operand: &Operand) -> Result<&[String]> {
    match operand {
        Operand::Ids(ids) => Ok(ids),
        _ => Err(invalid(condition, "an id list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn text_op(s: &str) -> Operand {
        Operand::Text(s.to_string())
    }

    #[test]
    fn text_contains_ignores_case() {
        assert!(text(Condition::Contains, Some("Hello World"), &text_op("WORLD")).unwrap());
        assert!(!text(Condition::Contains, Some("Hello"), &text_op("bye")).unwrap());
        assert!(text(Condition::DoesNotContain, Some("Hello"), &text_op("bye")).unwrap());
    }

    #[test]
    fn text_null_contains_nothing() {
        assert!(!text(Condition::Contains, None, &text_op("a")).unwrap());
        assert!(text(Condition::DoesNotContain, None, &text_op("a")).unwrap());
    }

    #[test]
    fn text_is_exact() {
        assert!(text(Condition::Is, Some("abc"), &text_op("abc")).unwrap());
        assert!(!text(Condition::Is, Some("abc"), &text_op("ABC")).unwrap());
        assert!(text(Condition::IsNot, Some("abc"), &text_op("ABC")).unwrap());
    }

    #[test]
    fn text_null_equals_nothing() {
        assert!(!text(Condition::Is, None, &text_op("")).unwrap());
        assert!(text(Condition::IsNot, None, &text_op("")).unwrap());
    }

    #[test]
    fn text_emptiness() {
        let none = Operand::None;
        assert!(text(Condition::IsEmpty, None, &none).unwrap());
        assert!(text(Condition::IsEmpty, Some(""), &none).unwrap());
        assert!(!text(Condition::IsEmpty, Some("x"), &none).unwrap());
        assert!(text(Condition::IsNotEmpty, Some("x"), &none).unwrap());
    }

    #[test]
    fn number_relations() {
        let ten = Operand::Number(10.0);
        assert!(number(Condition::Equal, Some(10.0), &ten).unwrap());
        assert!(number(Condition::NotEqual, Some(9.0), &ten).unwrap());
        assert!(number(Condition::LessThan, Some(9.0), &ten).unwrap());
        assert!(!number(Condition::LessThan, Some(10.0), &ten).unwrap());
        assert!(number(Condition::LessThanOrEqual, Some(10.0), &ten).unwrap());
        assert!(number(Condition::GreaterThan, Some(11.0), &ten).unwrap());
        assert!(!number(Condition::GreaterThan, Some(10.0), &ten).unwrap());
        assert!(number(Condition::GreaterThanOrEqual, Some(10.0), &ten).unwrap());
    }

    #[test]
    fn number_null_fails_all_but_not_equal() {
        let ten = Operand::Number(10.0);
        for condition in [
            Condition::Equal,
            Condition::LessThan,
            Condition::GreaterThan,
            Condition::LessThanOrEqual,
            Condition::GreaterThanOrEqual,
        ] {
            assert!(!number(condition, None, &ten).unwrap(), "{condition}");
        }
        assert!(number(Condition::NotEqual, None, &ten).unwrap());
        assert!(number(Condition::IsEmpty, None, &Operand::None).unwrap());
        assert!(number(Condition::IsNotEmpty, Some(0.0), &Operand::None).unwrap());
    }

    #[test]
    fn date_compares_calendar_days() {
        let cal = Calendar::utc();
        let morning = Utc.with_ymd_and_hms(2024, 6, 1, 1, 0, 0).unwrap();
        let reference = Operand::Date(day(2024, 6, 1));

        assert!(date(Condition::Is, Some(morning), &reference, &cal).unwrap());
        assert!(!date(Condition::IsNot, Some(morning), &reference, &cal).unwrap());
        assert!(!date(Condition::IsBefore, Some(morning), &reference, &cal).unwrap());
        assert!(date(Condition::IsOnOrBefore, Some(morning), &reference, &cal).unwrap());
        assert!(date(Condition::IsOnOrAfter, Some(morning), &reference, &cal).unwrap());
        assert!(date(Condition::IsBefore, Some(day(2024, 5, 31)), &reference, &cal).unwrap());
        assert!(date(Condition::IsAfter, Some(day(2024, 6, 2)), &reference, &cal).unwrap());
    }

    #[test]
    fn date_within_is_inclusive() {
        let cal = Calendar::utc();
        let range = Operand::range(day(2024, 1, 10), day(2024, 1, 20));

        assert!(date(Condition::IsWithin, Some(day(2024, 1, 10)), &range, &cal).unwrap());
        assert!(date(Condition::IsWithin, Some(day(2024, 1, 20)), &range, &cal).unwrap());
        assert!(!date(Condition::IsWithin, Some(day(2024, 1, 21)), &range, &cal).unwrap());
        assert!(!date(Condition::IsWithin, None, &range, &cal).unwrap());
    }

    #[test]
    fn date_null_fails_comparisons() {
        let cal = Calendar::utc();
        let reference = Operand::Date(day(2024, 6, 1));
        for condition in [
            Condition::Is,
            Condition::IsNot,
            Condition::IsBefore,
            Condition::IsAfter,
            Condition::IsOnOrBefore,
            Condition::IsOnOrAfter,
        ] {
            assert!(!date(condition, None, &reference, &cal).unwrap(), "{condition}");
        }
        assert!(date(Condition::IsEmpty, None, &Operand::None, &cal).unwrap());
    }

    #[test]
    fn single_select_membership() {
        let set = Operand::ids(["a", "b"]);
        assert!(single_select(Condition::IsAnyOf, Some("a"), &set).unwrap());
        assert!(!single_select(Condition::IsAnyOf, Some("c"), &set).unwrap());
        assert!(!single_select(Condition::IsAnyOf, None, &set).unwrap());
        assert!(single_select(Condition::IsNoneOf, None, &set).unwrap());
        assert!(!single_select(Condition::IsNoneOf, Some("b"), &set).unwrap());
    }

    #[test]
    fn single_select_identity() {
        let a = Operand::Id("a".into());
        assert!(single_select(Condition::Is, Some("a"), &a).unwrap());
        assert!(!single_select(Condition::Is, None, &a).unwrap());
        assert!(single_select(Condition::IsNot, None, &a).unwrap());
    }

    #[test]
    fn multi_select_set_semantics() {
        let held = vec!["a".to_string(), "b".to_string()];
        let ab = Operand::ids(["a", "b"]);
        let bc = Operand::ids(["b", "c"]);
        let cd = Operand::ids(["c", "d"]);

        assert!(multi_select(Condition::HasAnyOf, &held, &bc).unwrap());
        assert!(!multi_select(Condition::HasAnyOf, &held, &cd).unwrap());
        assert!(multi_select(Condition::HasAllOf, &held, &ab).unwrap());
        assert!(!multi_select(Condition::HasAllOf, &held, &bc).unwrap());
        assert!(multi_select(Condition::HasNoneOf, &held, &cd).unwrap());
        assert!(!multi_select(Condition::HasNoneOf, &held, &bc).unwrap());
        assert!(multi_select(Condition::HasNoneOf, &[], &ab).unwrap());
    }

    #[test]
    fn boolean_is_strict() {
        assert!(boolean(Condition::Is, true, &Operand::Boolean(true)).unwrap());
        assert!(!boolean(Condition::Is, false, &Operand::Boolean(true)).unwrap());
        assert!(matches!(
            boolean(Condition::Is, true, &Operand::Text("true".into())),
            Err(ViewError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn wrong_operand_names_the_expected_shape() {
        let err = date(
            Condition::IsWithin,
            None,
            &Operand::Date(day(2024, 1, 1)),
            &Calendar::utc(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "condition 'isWithin' expects a date range operand");

        let err = single_select(Condition::IsAnyOf, Some("a"), &Operand::Id("a".into())).unwrap_err();
        assert_eq!(err.to_string(), "condition 'isAnyOf' expects an id list operand");
    }

    #[test]
    fn evaluate_rejects_foreign_conditions() {
        let err = evaluate(
            FieldKind::Boolean,
            Condition::IsEmpty,
            &FieldValue::Boolean(true),
            &Operand::None,
            &Calendar::utc(),
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::UnknownCondition { .. }));
    }

    #[test]
    fn evaluate_rejects_mismatched_values() {
        let err = evaluate(
            FieldKind::Number,
            Condition::Equal,
            &FieldValue::text("1"),
            &Operand::Number(1.0),
            &Calendar::utc(),
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::TypeMismatch { .. }));
    }

    #[test]
    fn operand_shape_is_checked() {
        let err = number(Condition::Equal, Some(1.0), &Operand::Text("1".into())).unwrap_err();
        assert_eq!(err.to_string(), "condition 'equal' expects a number operand");
    }
}
