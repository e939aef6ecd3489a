//! AND/OR structure of a view's filters.
//!
//! A view's filters form an OR of AND-groups. There are no parentheses: the
//! structure lives entirely in each filter's `group` number, read left to
//! right in stored order.
//!
//! ```text
//! groups:    1     1     2     3     3
//! filters:   a AND b  OR c  OR d AND e      =  (a ∧ b) ∨ c ∨ (d ∧ e)
//! ```
//!
//! Equivalently, each filter after the first carries a [`Relation`] to its
//! predecessor: same group means `And`, different group means `Or`. The
//! group numbers are a run-length encoding of that relation list, and
//! [`relations`] / [`groups_from_relations`] convert between the two.
//!
//! Editing functions never mutate their input. They return an id → group
//! map that the caller merges into its store (see [`apply_group_updates`]).
//!
//! Every function that reads group numbers first checks that, in stored
//! order, they start at 1 and only ever stay the same or step up by one.
//! Anything else fails with `InvariantViolation`.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::config::Calendar;
use crate::error::{Result, ViewError};
use crate::filter::Filter;
use crate::model::Record;

/// Id → new group number.
pub type GroupUpdates = BTreeMap<String, u32>;

/// How a filter combines with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    And,
    Or,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::And => "and",
            Relation::Or => "or",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orders filters by group, keeping stored order within a group.
pub fn order_filters(mut filters: Vec<Filter>) -> Vec<Filter> {
    filters.sort_by_key(|f| f.group);
    filters
}

/// Checks that group numbers are contiguous from 1 in stored order.
pub fn ensure_contiguous(filters: &[Filter]) -> Result<()> {
    let mut previous = 0;
    for (position, filter) in filters.iter().enumerate() {
        let group = filter.group;
        if group != previous && group != previous + 1 {
            return Err(ViewError::InvariantViolation(format!(
                "filter '{}' at position {position} has group {group} after group {previous}",
                filter.id
            )));
        }
        previous = group;
    }
    Ok(())
}

/// Splits ordered filters into runs sharing a group number.
pub fn partition_by_group(filters: &[Filter]) -> Result<Vec<&[Filter]>> {
    ensure_contiguous(filters)?;
    Ok(filters.chunk_by(|a, b| a.group == b.group).collect())
}

/// Returns `true` if the record satisfies every filter of at least one group.
///
/// No groups at all accepts every record.
pub fn evaluate_groups<C: Catalog + ?Sized>(
    groups: &[&[Filter]],
    record: &Record,
    catalog: &C,
    calendar: &Calendar,
) -> Result<bool> {
    if groups.is_empty() {
        return Ok(true);
    }
    for group in groups {
        if group_matches(group, record, catalog, calendar)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn group_matches<C: Catalog + ?Sized>(
    group: &[Filter],
    record: &Record,
    catalog: &C,
    calendar: &Calendar,
) -> Result<bool> {
    for filter in group {
        if !filter.matches(record, catalog, calendar)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Highest group number, or 0 for no filters.
pub fn group_max(filters: &[Filter]) -> u32 {
    filters.iter().map(|f| f.group).max().unwrap_or(0)
}

/// Group number for a newly added filter: ORed with everything existing.
pub fn next_group(filters: &[Filter]) -> u32 {
    group_max(filters) + 1
}

/// Returns the relation between `filters[index - 1]` and `filters[index]`.
pub fn relation_at(filters: &[Filter], index: usize) -> Result<Relation> {
    check_index(filters, index)?;
    Ok(relation_between(&filters[index - 1], &filters[index]))
}

fn relation_between(previous: &Filter, current: &Filter) -> Relation {
    if previous.group == current.group {
        Relation::And
    } else {
        Relation::Or
    }
}

/// Derives the relation of each filter to its predecessor.
///
/// The result has one entry per filter after the first.
pub fn relations(filters: &[Filter]) -> Result<Vec<Relation>> {
    ensure_contiguous(filters)?;
    Ok(filters
        .windows(2)
        .map(|pair| relation_between(&pair[0], &pair[1]))
        .collect())
}

/// Rebuilds contiguous group numbers from a relation list.
///
/// `relations[i]` links filter `i + 1` to filter `i`, so the result is one
/// longer than the input.
pub fn groups_from_relations(relations: &[Relation]) -> Vec<u32> {
    let mut groups = Vec::with_capacity(relations.len() + 1);
    let mut current = 1;
    groups.push(current);
    for relation in relations {
        if *relation == Relation::Or {
            current += 1;
        }
        groups.push(current);
    }
    groups
}

/// Changes only the relation between `filters[index - 1]` and
/// `filters[index]`.
///
/// Every other adjacent pair keeps its relation. Filters from `index` on
/// are renumbered so groups stay contiguous, and the returned map holds
/// the group of each of them, changed or not. Filters before `index` keep
/// their groups and are not in the map.
///
/// ```
/// use sheetview::{groups, Condition, Filter, Relation};
///
/// let filters: Vec<Filter> = [1, 2, 3]
///     .iter()
///     .enumerate()
///     .map(|(i, g)| Filter::new(format!("f{i}"), "v", "name", *g, Condition::IsNotEmpty, ()))
///     .collect();
///
/// let updates = groups::set_relation(&filters, 1, Relation::And).unwrap();
/// assert_eq!(updates["f1"], 1);
/// assert_eq!(updates["f2"], 2);
/// ```
pub fn set_relation(filters: &[Filter], index: usize, relation: Relation) -> Result<GroupUpdates> {
    ensure_contiguous(filters)?;
    check_index(filters, index)?;

    let base = filters[index - 1].group;
    let mut previous = match relation {
        Relation::And => base,
        Relation::Or => base + 1,
    };

    let mut updates = GroupUpdates::new();
    updates.insert(filters[index].id.clone(), previous);

    for k in index + 1..filters.len() {
        let group = match relation_between(&filters[k - 1], &filters[k]) {
            Relation::And => previous,
            Relation::Or => previous + 1,
        };
        updates.insert(filters[k].id.clone(), group);
        previous = group;
    }

    tracing::debug!(
        filter = %filters[index].id,
        %relation,
        renumbered = updates.len(),
        "set filter relation"
    );
    Ok(updates)
}

/// Removes a filter and renumbers every remaining filter.
///
/// The returned map holds the group of every remaining filter so that
/// groups are contiguous from 1 again. A group that loses its last member
/// disappears and the groups after it move down.
pub fn delete_filter(filter_id: &str, filters: &[Filter]) -> Result<GroupUpdates> {
    ensure_contiguous(filters)?;
    let position = filters
        .iter()
        .position(|f| f.id == filter_id)
        .ok_or_else(|| ViewError::RuleNotFound(filter_id.to_string()))?;

    let mut updates = GroupUpdates::new();
    let mut previous_old: Option<u32> = None;
    let mut current = 0;
    for (i, filter) in filters.iter().enumerate() {
        if i == position {
            continue;
        }
        if previous_old != Some(filter.group) {
            current += 1;
        }
        previous_old = Some(filter.group);
        updates.insert(filter.id.clone(), current);
    }

    tracing::debug!(
        filter = filter_id,
        remaining = updates.len(),
        "deleted filter"
    );
    Ok(updates)
}

/// Writes group updates into a filter list.
///
/// Ids absent from `updates` keep their group; unknown ids are ignored.
pub fn apply_group_updates(filters: &mut [Filter], updates: &GroupUpdates) {
    for filter in filters.iter_mut() {
        if let Some(group) = updates.get(&filter.id) {
            filter.group = *group;
        }
    }
}

fn check_index(filters: &[Filter], index: usize) -> Result<()> {
    if index == 0 || index >= filters.len() {
        return Err(ViewError::IndexOutOfRange {
            index,
            len: filters.len(),
        });
    }
    Ok(())
}
