//! Dense `1..N` ordering of a rundown collection.
//!
//! The canonical ordering is the sequence of ids sorted by stored order
//! number. A client proposes a reordering as `(old, new)`: the id sequence
//! it last saw and the sequence it wants. [`adjudicate_ordering`] applies
//! the same three-way compare-and-swap idea as single-field edits, to the
//! whole list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::store::OrderedRecord;
use crate::types::DbId;

/// A client's before/after view of one rundown's id sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingChange {
    pub old_ordering: Vec<DbId>,
    pub new_ordering: Vec<DbId>,
}

/// Outcome of adjudicating an [`OrderingChange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingVerdict {
    /// Write this sequence as orders `1..N`.
    Accept(Vec<DbId>),
    /// No change, or the proposal is already the canonical ordering.
    Nop,
    /// The canonical ordering changed since the client fetched it.
    Reject,
    /// The proposal is not a permutation of the canonical ids.
    Malformed,
}

/// Canonical id sequence: order ascending, id as tiebreak.
pub fn canonical_ids<R: OrderedRecord>(records: &[R]) -> Vec<DbId> {
    let mut keyed: Vec<(i32, DbId)> = records.iter().map(|r| (r.order(), r.id())).collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, id)| id).collect()
}

/// Whether stored orders are exactly `1..N` in canonical sequence.
pub fn is_dense<R: OrderedRecord>(records: &[R]) -> bool {
    let mut orders: Vec<i32> = records.iter().map(|r| r.order()).collect();
    orders.sort_unstable();
    orders.iter().zip(1..).all(|(order, expected)| *order == expected)
}

/// Order writes that repair a non-dense collection. Records already at their
/// position are skipped.
pub fn normalization_assignments<R: OrderedRecord>(records: &[R]) -> Vec<(DbId, i32)> {
    let mut keyed: Vec<(i32, DbId)> = records.iter().map(|r| (r.order(), r.id())).collect();
    keyed.sort_unstable();
    keyed
        .into_iter()
        .zip(1..)
        .filter(|((order, _), position)| order != position)
        .map(|((_, id), position)| (id, position))
        .collect()
}

/// `(id, order)` pairs assigning `1..N` along `ordering`.
pub fn order_assignments(ordering: &[DbId]) -> Vec<(DbId, i32)> {
    ordering.iter().copied().zip(1..).collect()
}

/// Three-way check of a proposed reordering against the canonical one.
///
/// Ids the client mentions that no longer exist (deleted concurrently) are
/// dropped before comparing.
pub fn adjudicate_ordering(change: &OrderingChange, canonical: &[DbId]) -> OrderingVerdict {
    let known: HashSet<DbId> = canonical.iter().copied().collect();
    let old: Vec<DbId> = change
        .old_ordering
        .iter()
        .copied()
        .filter(|id| known.contains(id))
        .collect();
    let new: Vec<DbId> = change
        .new_ordering
        .iter()
        .copied()
        .filter(|id| known.contains(id))
        .collect();

    if old == new {
        return OrderingVerdict::Nop;
    }
    if new == canonical {
        return OrderingVerdict::Nop;
    }
    if old != canonical {
        return OrderingVerdict::Reject;
    }
    if !is_permutation(&new, canonical) {
        return OrderingVerdict::Malformed;
    }
    OrderingVerdict::Accept(new)
}

/// Substitute a freshly created id into a proposal made before the id
/// existed: append it to the old ordering, and place it at
/// `insertion_index` of the new ordering, replacing the client's
/// placeholder. An index past the end appends.
pub fn splice_created_id(change: &mut OrderingChange, id: DbId, insertion_index: usize) {
    change.old_ordering.push(id);
    match change.new_ordering.get_mut(insertion_index) {
        Some(slot) => *slot = id,
        None => change.new_ordering.push(id),
    }
}

fn is_permutation(candidate: &[DbId], canonical: &[DbId]) -> bool {
    if candidate.len() != canonical.len() {
        return false;
    }
    let mut a = candidate.to_vec();
    let mut b = canonical.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use crate::types::Timestamp;
    use chrono::Utc;

    #[derive(Clone, serde::Serialize)]
    struct Row {
        id: DbId,
        order: i32,
    }

    impl Record for Row {
        const ENTITY: &'static str = "Row";
        fn id(&self) -> DbId {
            self.id
        }
        fn updated_at(&self) -> Timestamp {
            Utc::now()
        }
    }

    impl OrderedRecord for Row {
        fn order(&self) -> i32 {
            self.order
        }
    }

    fn rows(pairs: &[(DbId, i32)]) -> Vec<Row> {
        pairs.iter().map(|&(id, order)| Row { id, order }).collect()
    }

    fn change(old: &[DbId], new: &[DbId]) -> OrderingChange {
        OrderingChange {
            old_ordering: old.to_vec(),
            new_ordering: new.to_vec(),
        }
    }

    // -----------------------------------------------------------------------
    // Density
    // -----------------------------------------------------------------------

    #[test]
    fn empty_collection_is_dense() {
        assert!(is_dense::<Row>(&[]));
        assert!(normalization_assignments::<Row>(&[]).is_empty());
    }

    #[test]
    fn detects_gap() {
        let records = rows(&[(1, 1), (3, 3)]);
        assert!(!is_dense(&records));
        assert_eq!(normalization_assignments(&records), vec![(3, 2)]);
    }

    #[test]
    fn detects_duplicate_orders() {
        let records = rows(&[(5, 1), (4, 1), (6, 2)]);
        assert!(!is_dense(&records));
        assert_eq!(canonical_ids(&records), vec![4, 5, 6]);
        assert_eq!(normalization_assignments(&records), vec![(5, 2), (6, 3)]);
    }

    #[test]
    fn canonical_sorts_by_order() {
        let records = rows(&[(7, 2), (8, 1), (9, 3)]);
        assert!(is_dense(&records));
        assert_eq!(canonical_ids(&records), vec![8, 7, 9]);
    }

    // -----------------------------------------------------------------------
    // Adjudication
    // -----------------------------------------------------------------------

    #[test]
    fn swap_on_current_baseline_accepts() {
        let verdict = adjudicate_ordering(&change(&[1, 2, 3], &[2, 1, 3]), &[1, 2, 3]);
        assert_eq!(verdict, OrderingVerdict::Accept(vec![2, 1, 3]));
    }

    #[test]
    fn identical_proposal_is_nop() {
        let verdict = adjudicate_ordering(&change(&[1, 2], &[1, 2]), &[2, 1]);
        assert_eq!(verdict, OrderingVerdict::Nop);
    }

    #[test]
    fn retry_of_applied_reorder_is_nop() {
        let verdict = adjudicate_ordering(&change(&[1, 2, 3], &[2, 1, 3]), &[2, 1, 3]);
        assert_eq!(verdict, OrderingVerdict::Nop);
    }

    #[test]
    fn stale_baseline_rejects() {
        let verdict = adjudicate_ordering(&change(&[1, 2, 3], &[1, 3, 2]), &[3, 1, 2]);
        assert_eq!(verdict, OrderingVerdict::Reject);
    }

    #[test]
    fn concurrently_deleted_ids_are_ignored() {
        let verdict = adjudicate_ordering(&change(&[1, 2, 3], &[3, 2, 1]), &[1, 3]);
        assert_eq!(verdict, OrderingVerdict::Accept(vec![3, 1]));
    }

    #[test]
    fn unknown_new_slot_rejects() {
        // Someone appended slot 4 the client has not seen.
        let verdict = adjudicate_ordering(&change(&[1, 2, 3], &[2, 1, 3]), &[1, 2, 3, 4]);
        assert_eq!(verdict, OrderingVerdict::Reject);
    }

    #[test]
    fn duplicated_id_is_malformed() {
        let verdict = adjudicate_ordering(&change(&[1, 2, 3], &[1, 1, 3]), &[1, 2, 3]);
        assert_eq!(verdict, OrderingVerdict::Malformed);
    }

    #[test]
    fn empty_collection_is_nop() {
        let verdict = adjudicate_ordering(&change(&[], &[]), &[]);
        assert_eq!(verdict, OrderingVerdict::Nop);
    }

    // -----------------------------------------------------------------------
    // Splicing
    // -----------------------------------------------------------------------

    #[test]
    fn splice_replaces_placeholder() {
        let mut c = change(&[1, 3], &[1, -1, 3]);
        splice_created_id(&mut c, 9, 1);
        assert_eq!(c.old_ordering, vec![1, 3, 9]);
        assert_eq!(c.new_ordering, vec![1, 9, 3]);
    }

    #[test]
    fn splice_past_end_appends() {
        let mut c = change(&[1], &[1]);
        splice_created_id(&mut c, 9, 5);
        assert_eq!(c.new_ordering, vec![1, 9]);
    }

    #[test]
    fn assignments_are_one_based() {
        assert_eq!(order_assignments(&[5, 3]), vec![(5, 1), (3, 2)]);
    }
}
