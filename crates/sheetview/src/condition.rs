//! Filter conditions.
//!
//! The [`Condition`] enum names every condition a filter can carry. Which
//! conditions a filter may use depends on the [`FieldKind`] of its field:
//! see [`conditions_for`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::kind::FieldKind;

/// Condition of a filter rule.
///
/// Conditions are grouped by the kinds that support them:
/// - **Text**: `Contains`, `DoesNotContain`, `Is`, `IsNot`
/// - **Number**: `Equal`, `NotEqual`, `LessThan`, `GreaterThan`,
///   `LessThanOrEqual`, `GreaterThanOrEqual`
/// - **Date**: `Is`, `IsNot`, `IsBefore`, `IsAfter`, `IsOnOrBefore`,
///   `IsOnOrAfter`, `IsWithin`
/// - **SingleSelect**: `Is`, `IsNot`, `IsAnyOf`, `IsNoneOf`
/// - **MultiSelect**: `HasAnyOf`, `HasAllOf`, `HasNoneOf`
/// - **Boolean**: `Is`
///
/// Every kind except Boolean also supports `IsEmpty` and `IsNotEmpty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    // Text
    Contains,
    DoesNotContain,

    // Shared by text, date, single select and boolean
    Is,
    IsNot,

    // Number
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,

    // Date
    IsBefore,
    IsAfter,
    IsOnOrBefore,
    IsOnOrAfter,
    /// Reference is an inclusive date range.
    IsWithin,

    // Single select
    IsAnyOf,
    IsNoneOf,

    // Multi select
    HasAnyOf,
    HasAllOf,
    HasNoneOf,

    // Emptiness
    IsEmpty,
    IsNotEmpty,
}

const TEXT: &[Condition] = &[
    Condition::Contains,
    Condition::DoesNotContain,
    Condition::Is,
    Condition::IsNot,
    Condition::IsEmpty,
    Condition::IsNotEmpty,
];

const NUMBER: &[Condition] = &[
    Condition::Equal,
    Condition::NotEqual,
    Condition::LessThan,
    Condition::GreaterThan,
    Condition::LessThanOrEqual,
    Condition::GreaterThanOrEqual,
    Condition::IsEmpty,
    Condition::IsNotEmpty,
];

const DATE: &[Condition] = &[
    Condition::Is,
    Condition::IsNot,
    Condition::IsBefore,
    Condition::IsAfter,
    Condition::IsOnOrBefore,
    Condition::IsOnOrAfter,
    Condition::IsWithin,
    Condition::IsEmpty,
    Condition::IsNotEmpty,
];

const SINGLE_SELECT: &[Condition] = &[
    Condition::Is,
    Condition::IsNot,
    Condition::IsAnyOf,
    Condition::IsNoneOf,
    Condition::IsEmpty,
    Condition::IsNotEmpty,
];

const MULTI_SELECT: &[Condition] = &[
    Condition::HasAnyOf,
    Condition::HasAllOf,
    Condition::HasNoneOf,
    Condition::IsEmpty,
    Condition::IsNotEmpty,
];

const BOOLEAN: &[Condition] = &[Condition::Is];

/// Returns the conditions a field of `kind` supports.
pub fn conditions_for(kind: FieldKind) -> &'static [Condition] {
    match kind {
        FieldKind::Boolean => BOOLEAN,
        FieldKind::Text => TEXT,
        FieldKind::Number => NUMBER,
        FieldKind::Date => DATE,
        FieldKind::SingleSelect => SINGLE_SELECT,
        FieldKind::MultiSelect => MULTI_SELECT,
    }
}

impl Condition {
    /// All conditions, in declaration order.
    pub const ALL: [Condition; 22] = [
        Condition::Contains,
        Condition::DoesNotContain,
        Condition::Is,
        Condition::IsNot,
        Condition::Equal,
        Condition::NotEqual,
        Condition::LessThan,
        Condition::GreaterThan,
        Condition::LessThanOrEqual,
        Condition::GreaterThanOrEqual,
        Condition::IsBefore,
        Condition::IsAfter,
        Condition::IsOnOrBefore,
        Condition::IsOnOrAfter,
        Condition::IsWithin,
        Condition::IsAnyOf,
        Condition::IsNoneOf,
        Condition::HasAnyOf,
        Condition::HasAllOf,
        Condition::HasNoneOf,
        Condition::IsEmpty,
        Condition::IsNotEmpty,
    ];

    /// Returns `true` if fields of `kind` support this condition.
    pub fn is_valid_for(self, kind: FieldKind) -> bool {
        conditions_for(kind).contains(&self)
    }

    /// Fails with `UnknownCondition` unless `kind` supports this condition.
    pub fn ensure_valid_for(self, kind: FieldKind) -> Result<()> {
        if self.is_valid_for(kind) {
            Ok(())
        } else {
            Err(ViewError::UnknownCondition {
                kind,
                condition: self.as_str().to_string(),
            })
        }
    }

    /// Returns `true` if evaluating this condition needs an operand.
    pub fn needs_operand(self) -> bool {
        !matches!(self, Condition::IsEmpty | Condition::IsNotEmpty)
    }

    /// Returns the wire name of this condition.
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Contains => "contains",
            Condition::DoesNotContain => "doesNotContain",
            Condition::Is => "is",
            Condition::IsNot => "isNot",
            Condition::Equal => "equal",
            Condition::NotEqual => "notEqual",
            Condition::LessThan => "lessThan",
            Condition::GreaterThan => "greaterThan",
            Condition::LessThanOrEqual => "lessThanOrEqual",
            Condition::GreaterThanOrEqual => "greaterThanOrEqual",
            Condition::IsBefore => "isBefore",
            Condition::IsAfter => "isAfter",
            Condition::IsOnOrBefore => "isOnOrBefore",
            Condition::IsOnOrAfter => "isOnOrAfter",
            Condition::IsWithin => "isWithin",
            Condition::IsAnyOf => "isAnyOf",
            Condition::IsNoneOf => "isNoneOf",
            Condition::HasAnyOf => "hasAnyOf",
            Condition::HasAllOf => "hasAllOf",
            Condition::HasNoneOf => "hasNoneOf",
            Condition::IsEmpty => "isEmpty",
            Condition::IsNotEmpty => "isNotEmpty",
        }
    }
}

/// Parses a wire name for a field of `kind`.
///
/// Fails with `UnknownCondition` both for names that do not exist and for
/// names that `kind` does not support.
pub fn parse_for(kind: FieldKind, name: &str) -> Result<Condition> {
    let unknown = || ViewError::UnknownCondition {
        kind,
        condition: name.to_string(),
    };
    let condition = Condition::ALL
        .iter()
        .copied()
        .find(|c| c.as_str() == name)
        .ok_or_else(unknown)?;
    if condition.is_valid_for(kind) {
        Ok(condition)
    } else {
        Err(unknown())
    }
}

impl FromStr for Condition {
    type Err = ViewError;

    /// Parses a wire name regardless of kind.
    ///
    /// Unknown names are reported against the text kind; use [`parse_for`]
    /// when the field kind is known.
    fn from_str(s: &str) -> Result<Self> {
        Condition::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ViewError::UnknownCondition {
                kind: FieldKind::Text,
                condition: s.to_string(),
            })
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_tables() {
        assert!(Condition::Contains.is_valid_for(FieldKind::Text));
        assert!(!Condition::Contains.is_valid_for(FieldKind::Number));

        assert!(Condition::GreaterThan.is_valid_for(FieldKind::Number));
        assert!(!Condition::GreaterThan.is_valid_for(FieldKind::Date));

        assert!(Condition::IsWithin.is_valid_for(FieldKind::Date));
        assert!(Condition::Is.is_valid_for(FieldKind::Date));

        assert!(Condition::IsAnyOf.is_valid_for(FieldKind::SingleSelect));
        assert!(!Condition::IsAnyOf.is_valid_for(FieldKind::MultiSelect));

        assert!(Condition::HasAllOf.is_valid_for(FieldKind::MultiSelect));
        assert!(!Condition::Is.is_valid_for(FieldKind::MultiSelect));

        assert_eq!(conditions_for(FieldKind::Boolean), &[Condition::Is]);
    }

    #[test]
    fn every_condition_belongs_to_some_kind() {
        for condition in Condition::ALL {
            assert!(
                FieldKind::ALL.iter().any(|k| condition.is_valid_for(*k)),
                "{condition} is unreachable"
            );
        }
    }

    #[test]
    fn emptiness_everywhere_but_boolean() {
        for kind in FieldKind::ALL {
            let expected = kind != FieldKind::Boolean;
            assert_eq!(Condition::IsEmpty.is_valid_for(kind), expected);
            assert_eq!(Condition::IsNotEmpty.is_valid_for(kind), expected);
        }
    }

    #[test]
    fn ensure_valid_reports_kind() {
        let err = Condition::HasAnyOf
            .ensure_valid_for(FieldKind::Boolean)
            .unwrap_err();
        assert_eq!(err.to_string(), "condition 'hasAnyOf' is not valid for boolean fields");
    }

    #[test]
    fn parse_wire_names() {
        for condition in Condition::ALL {
            assert_eq!(condition.as_str().parse::<Condition>().unwrap(), condition);
        }
        assert!("startsWith".parse::<Condition>().is_err());
    }

    #[test]
    fn parse_for_kind() {
        assert_eq!(
            parse_for(FieldKind::Number, "lessThan").unwrap(),
            Condition::LessThan
        );
        assert!(matches!(
            parse_for(FieldKind::Number, "contains"),
            Err(ViewError::UnknownCondition { kind: FieldKind::Number, .. })
        ));
        assert!(parse_for(FieldKind::Number, "bogus").is_err());
    }

    #[test]
    fn serde_matches_wire_names() {
        for condition in Condition::ALL {
            let json = serde_json::to_string(&condition).unwrap();
            assert_eq!(json, format!("\"{}\"", condition.as_str()));
        }
    }

    #[test]
    fn operand_requirements() {
        assert!(!Condition::IsEmpty.needs_operand());
        assert!(!Condition::IsNotEmpty.needs_operand());
        assert!(Condition::Is.needs_operand());
        assert!(Condition::HasNoneOf.needs_operand());
    }
}
