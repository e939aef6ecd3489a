//! Sequence bookkeeping for sort and group-by rules.
//!
//! Sequences must read 1, 2, .., n in some order. Creating a rule appends
//! it at `n + 1`; deleting one shifts every later rule down by one. Like the
//! filter group helpers, the edit functions return an id → sequence map
//! and leave applying it to the caller.

use std::collections::BTreeMap;

use crate::error::{Result, ViewError};

/// Id → new sequence number.
pub type SequenceUpdates = BTreeMap<String, u32>;

/// A rule positioned by a sequence number.
pub trait Sequenced {
    fn id(&self) -> &str;
    fn sequence(&self) -> u32;
    fn set_sequence(&mut self, sequence: u32);
}

/// Checks that sequences are exactly 1..=n, in any order.
pub fn ensure_contiguous<R: Sequenced>(rules: &[R]) -> Result<()> {
    let mut seen = vec![false; rules.len()];
    for rule in rules {
        let sequence = rule.sequence() as usize;
        if sequence == 0 || sequence > rules.len() || seen[sequence - 1] {
            return Err(ViewError::InvariantViolation(format!(
                "rule '{}' has sequence {sequence} among {} rules",
                rule.id(),
                rules.len()
            )));
        }
        seen[sequence - 1] = true;
    }
    Ok(())
}

/// Highest sequence, or 0 for no rules.
pub fn sequence_max<R: Sequenced>(rules: &[R]) -> u32 {
    rules.iter().map(Sequenced::sequence).max().unwrap_or(0)
}

/// Sequence for a newly created rule.
pub fn next_sequence<R: Sequenced>(rules: &[R]) -> u32 {
    sequence_max(rules) + 1
}

/// Returns the rules sorted by sequence, primary first.
pub fn ordered_by_sequence<R: Sequenced>(rules: &[R]) -> Result<Vec<&R>> {
    ensure_contiguous(rules)?;
    let mut ordered: Vec<&R> = rules.iter().collect();
    ordered.sort_by_key(|r| r.sequence());
    Ok(ordered)
}

/// Removes a rule and closes the gap it leaves.
///
/// Every remaining rule with a higher sequence moves down by one; the
/// returned map holds only those rules.
pub fn compact_after_delete<R: Sequenced>(deleted_id: &str, rules: &[R]) -> Result<SequenceUpdates> {
    ensure_contiguous(rules)?;
    let deleted = rules
        .iter()
        .find(|r| r.id() == deleted_id)
        .ok_or_else(|| ViewError::RuleNotFound(deleted_id.to_string()))?;
    let removed = deleted.sequence();

    let updates: SequenceUpdates = rules
        .iter()
        .filter(|r| r.sequence() > removed)
        .map(|r| (r.id().to_string(), r.sequence() - 1))
        .collect();

    tracing::debug!(
        rule = deleted_id,
        sequence = removed,
        shifted = updates.len(),
        "compacted sequences"
    );
    Ok(updates)
}

/// Writes sequence updates into a rule list.
pub fn apply_sequence_updates<R: Sequenced>(rules: &mut [R], updates: &SequenceUpdates) {
    for rule in rules.iter_mut() {
        if let Some(sequence) = updates.get(rule.id()) {
            rule.set_sequence(*sequence);
        }
    }
}
