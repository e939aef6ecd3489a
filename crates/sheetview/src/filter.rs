//! Filter rules.
//!
//! A [`Filter`] is a single predicate: a field, a [`Condition`] and an
//! [`Operand`]. Filters of a view are combined by their `group` number; see
//! [`groups`](crate::groups) for the AND/OR structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::condition::Condition;
use crate::config::Calendar;
use crate::error::Result;
use crate::model::Record;
use crate::predicate;

/// A single filter rule of a view.
///
/// # Example
///
/// ```
/// use sheetview::{Condition, Filter, Operand};
///
/// let filter = Filter::new("f1", "grid", "name", 1, Condition::Contains, "ann");
/// assert_eq!(filter.operand, Operand::Text("ann".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: String,
    pub view_id: String,
    pub field_id: String,
    /// OR-compartment of this filter. Filters sharing a group are ANDed.
    pub group: u32,
    pub condition: Condition,
    #[serde(default)]
    pub operand: Operand,
}

impl Filter {
    /// Creates a filter.
    pub fn new(
        id: impl Into<String>,
        view_id: impl Into<String>,
        field_id: impl Into<String>,
        group: u32,
        condition: Condition,
        operand: impl Into<Operand>,
    ) -> Self {
        Filter {
            id: id.into(),
            view_id: view_id.into(),
            field_id: field_id.into(),
            group,
            condition,
            operand: operand.into(),
        }
    }

    /// Returns `false` when the condition still waits for an operand.
    ///
    /// Incomplete filters accept every record.
    pub fn is_complete(&self) -> bool {
        !self.condition.needs_operand() || !self.operand.is_none()
    }

    /// Evaluates this filter against one record.
    pub fn matches<C: Catalog + ?Sized>(
        &self,
        record: &Record,
        catalog: &C,
        calendar: &Calendar,
    ) -> Result<bool> {
        let field = catalog.require_field(&self.field_id)?;
        let kind = field.kind();
        self.condition.ensure_valid_for(kind)?;
        if !self.is_complete() {
            return Ok(true);
        }
        let value = record.value(field)?;
        predicate::evaluate(kind, self.condition, &value, &self.operand, calendar)
    }
}

/// Reference value a filter compares against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Operand {
    /// No reference value yet.
    #[default]
    None,
    Boolean(bool),
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    /// Inclusive range of calendar days.
    DateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// A single option, collaborator or record id.
    Id(String),
    /// A set of ids.
    Ids(Vec<String>),
}

impl Operand {
    /// Returns `true` if this is the `None` operand.
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }

    /// Builds an id-set operand.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Operand::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Builds an inclusive date range operand.
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Operand::DateRange { start, end }
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Boolean(b)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Text(s)
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Number(n as f64)
    }
}

impl From<DateTime<Utc>> for Operand {
    fn from(d: DateTime<Utc>) -> Self {
        Operand::Date(d)
    }
}

impl From<Vec<String>> for Operand {
    fn from(ids: Vec<String>) -> Self {
        Operand::Ids(ids)
    }
}

impl From<()> for Operand {
    fn from(_: ()) -> Self {
        Operand::None
    }
}
