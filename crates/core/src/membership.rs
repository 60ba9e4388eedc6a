// SPDX-License-Identifier: MIT

//!
//! Ordered parent → child memberships (lecture → videos, curriculum →
//! lectures) and the in-memory working copy edited in the admin screens.
//!
//! Position in the sequence *is* the order.  The `order` stored against each
//! row is only recomputed (from the sequence index) when the edits are
//! reconciled with the database.
//!

use crate::reorder::{self, DragState, DropPosition};
use crate::{LecternId, OrderUpdate, OrderWrites, PendingInsert, ReconcilePlan};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Implementing types are read-only snapshots of a child entity (the thing
/// being ordered).  Only the child's ID matters to the membership logic.
pub trait ChildSnapshot: Clone {
    /// The ID of the referenced child entity
    fn child_id(&self) -> LecternId;
}

/// A bare child ID is the smallest possible snapshot (used when the edits
/// arrive over the API and nothing needs displaying)
impl ChildSnapshot for LecternId {
    fn child_id(&self) -> LecternId {
        *self
    }
}

/// Errors that can arise when building an [`OrderedMembers`]
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MembershipError {
    #[error("Child '{0}' appears more than once")]
    DuplicateChild(LecternId),

    #[error("Member '{0}' appears more than once")]
    DuplicateMember(LecternId),

    #[error("Member '{0}' wasn't part of the loaded membership")]
    NotInBaseline(LecternId),
}

/// Session-local key of a member that hasn't been saved yet.  `batch` is
/// bumped on every append, `index` is the position within that append.
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(derive_more::Display, Serialize, Deserialize)]
#[display("pending-{batch}-{index}")]
pub struct PendingKey {
    batch: u64,
    index: usize,
}

impl PendingKey {
    pub(crate) fn new(batch: u64, index: usize) -> Self {
        Self { batch, index }
    }
}

/// Identifies one member within an [`OrderedMembers`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKey {
    Persisted(LecternId),
    Pending(PendingKey),
}

/// One parent → child association
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Member<C> {
    /// Saved, with a database-assigned ID
    Persisted {
        id: LecternId,

        /// The order the row had when last read/written, if known
        loaded_order: Option<u32>,

        child: C,
    },

    /// Added during this edit session, not yet saved
    Pending { key: PendingKey, child: C },
}

impl<C: ChildSnapshot> Member<C> {
    pub fn key(&self) -> MemberKey {
        match self {
            Member::Persisted { id, .. } => MemberKey::Persisted(*id),
            Member::Pending { key, .. } => MemberKey::Pending(*key),
        }
    }

    pub fn child(&self) -> &C {
        match self {
            Member::Persisted { child, .. } | Member::Pending { child, .. } => child,
        }
    }

    pub fn child_id(&self) -> LecternId {
        self.child().child_id()
    }

    /// The member's database ID, if it has one
    pub fn persisted_id(&self) -> Option<LecternId> {
        match self {
            Member::Persisted { id, .. } => Some(*id),
            Member::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Member::Pending { .. })
    }
}

/// A membership row as stored in (and read from) the database, including a
/// snapshot of the child
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipRow<C> {
    pub id: LecternId,
    pub parent_id: LecternId,
    pub order: u32,
    pub child: C,
}

/// The working copy of one parent's children.  Owned by a single edit session;
/// nothing else writes to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedMembers<C> {
    /// The parent aggregate that owns the children
    parent_id: LecternId,

    /// The desired children, in the desired order
    items: Vec<Member<C>>,

    /// The persisted member IDs, used to work out what to delete
    baseline: BTreeSet<LecternId>,

    /// Used to build unique [`PendingKey`]s
    next_batch: u64,
}

impl<C: ChildSnapshot> OrderedMembers<C> {
    /// A parent with no children
    pub fn new(parent_id: LecternId) -> Self {
        Self {
            parent_id,
            items: Vec::new(),
            baseline: BTreeSet::new(),
            next_batch: 0,
        }
    }

    /// Build from the rows read from the database.  The rows are sorted by
    /// their order, and their IDs become the baseline.
    pub fn from_rows(parent_id: LecternId, mut rows: Vec<MembershipRow<C>>) -> Self {
        rows.sort_by_key(|row| row.order);
        let baseline = rows.iter().map(|row| row.id).collect();
        let items = rows
            .into_iter()
            .map(|row| Member::Persisted {
                id: row.id,
                loaded_order: Some(row.order),
                child: row.child,
            })
            .collect();
        Self {
            parent_id,
            items,
            baseline,
            next_batch: 0,
        }
    }

    /// Rebuild a working copy that was edited elsewhere (e.g. received over
    /// the API).  Every persisted member must be part of the baseline, and no
    /// child or member may appear twice.
    pub fn from_edit(
        parent_id: LecternId,
        baseline: BTreeSet<LecternId>,
        items: Vec<Member<C>>,
    ) -> Result<Self, MembershipError> {
        let mut child_ids = BTreeSet::new();
        let mut member_ids = BTreeSet::new();
        let mut next_batch = 0;
        for item in &items {
            if !child_ids.insert(item.child_id()) {
                return Err(MembershipError::DuplicateChild(item.child_id()));
            }
            match item {
                Member::Persisted { id, .. } => {
                    if !baseline.contains(id) {
                        return Err(MembershipError::NotInBaseline(*id));
                    }
                    if !member_ids.insert(*id) {
                        return Err(MembershipError::DuplicateMember(*id));
                    }
                }
                Member::Pending { key, .. } => next_batch = next_batch.max(key.batch + 1),
            }
        }
        Ok(Self {
            parent_id,
            items,
            baseline,
            next_batch,
        })
    }

    pub fn parent_id(&self) -> LecternId {
        self.parent_id
    }

    /// The members in order
    pub fn items(&self) -> &[Member<C>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn baseline(&self) -> &BTreeSet<LecternId> {
        &self.baseline
    }

    pub fn contains_child(&self, child_id: LecternId) -> bool {
        self.items.iter().any(|item| item.child_id() == child_id)
    }

    pub fn child_ids(&self) -> BTreeSet<LecternId> {
        self.items.iter().map(Member::child_id).collect()
    }

    /// Whether anything differs from what was last persisted
    pub fn has_changes(&self) -> bool {
        !self.plan(OrderWrites::Changed).is_empty()
    }

    /// Append new (pending) members to the end.  Children that are already
    /// members are skipped.
    pub fn append<I: IntoIterator<Item = C>>(&mut self, children: I) {
        let batch = self.next_batch;
        self.next_batch += 1;
        for (index, child) in children.into_iter().enumerate() {
            if self.contains_child(child.child_id()) {
                warn!(
                    "Not adding child {} to {}: already a member",
                    child.child_id(),
                    self.parent_id
                );
                continue;
            }
            self.items.push(Member::Pending {
                key: PendingKey::new(batch, index),
                child,
            });
        }
    }

    /// Remove a member.  Orders are not renumbered until the next save.
    pub fn remove(&mut self, key: &MemberKey) -> Option<Member<C>> {
        let index = self.items.iter().position(|item| &item.key() == key)?;
        Some(self.items.remove(index))
    }

    /// Move the member at `from_index` so it sits above or below the member
    /// at `to_index`.  Panics if either index is out of bounds.
    pub fn move_item(&mut self, from_index: usize, to_index: usize, position: DropPosition) {
        reorder::move_item(&mut self.items, from_index, to_index, position);
    }

    /// Finish a drag gesture, applying the move if it ended over a row.
    /// Returns whether a move was applied.
    pub fn apply_drop(&mut self, drag: &mut DragState) -> bool {
        match drag.drop() {
            Some(drag_move) => {
                self.move_item(drag_move.from_index, drag_move.to_index, drag_move.position);
                true
            }
            None => false,
        }
    }

    /// Work out the database operations needed to make the persisted state
    /// match this working copy
    pub fn plan(&self, order_writes: OrderWrites) -> ReconcilePlan {
        let current_ids: BTreeSet<LecternId> =
            self.items.iter().filter_map(Member::persisted_id).collect();

        let to_delete = self.baseline.difference(&current_ids).copied().collect();

        let mut to_insert = Vec::new();
        let mut to_reorder = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            let order = index as u32;
            match item {
                Member::Pending { key, child } => to_insert.push(PendingInsert {
                    key: *key,
                    child_id: child.child_id(),
                    order,
                }),
                Member::Persisted {
                    id, loaded_order, ..
                } => {
                    let unchanged = *loaded_order == Some(order);
                    if order_writes == OrderWrites::All || !unchanged {
                        to_reorder.push(OrderUpdate { id: *id, order });
                    }
                }
            }
        }

        ReconcilePlan {
            to_delete,
            to_insert,
            to_reorder,
        }
    }

    /// Record that a member row has been deleted from the database
    pub fn mark_deleted(&mut self, id: LecternId) {
        self.baseline.remove(&id);
    }

    /// Record that a pending member has been saved, and given an ID
    pub fn mark_inserted(&mut self, key: PendingKey, id: LecternId, order: u32) {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.key() == MemberKey::Pending(key))
        else {
            return;
        };
        let child = item.child().clone();
        *item = Member::Persisted {
            id,
            loaded_order: Some(order),
            child,
        };
        self.baseline.insert(id);
    }

    /// Record that a member's order has been written to the database
    pub fn mark_order_written(&mut self, id: LecternId, order: u32) {
        for item in &mut self.items {
            if let Member::Persisted {
                id: item_id,
                loaded_order,
                ..
            } = item
            {
                if *item_id == id {
                    *loaded_order = Some(order);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// A tiny snapshot for tests
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Child(LecternId, &'static str);

    impl ChildSnapshot for Child {
        fn child_id(&self) -> LecternId {
            self.0
        }
    }

    fn child(name: &'static str) -> Child {
        Child(LecternId::new(), name)
    }

    fn names(members: &OrderedMembers<Child>) -> Vec<&'static str> {
        members.items().iter().map(|item| item.child().1).collect()
    }

    fn rows(parent_id: LecternId, names: &[&'static str]) -> Vec<MembershipRow<Child>> {
        names
            .iter()
            .enumerate()
            .map(|(order, name)| MembershipRow {
                id: LecternId::new(),
                parent_id,
                order: order as u32,
                child: child(name),
            })
            .collect()
    }

    #[test]
    fn from_rows_sorts_and_captures_baseline() {
        let parent_id = LecternId::new();
        let mut loaded = rows(parent_id, &["a", "b", "c"]);
        loaded.reverse();
        let members = OrderedMembers::from_rows(parent_id, loaded.clone());
        assert_eq!(names(&members), vec!["a", "b", "c"]);
        assert_eq!(members.baseline().len(), 3);
        assert!(loaded.iter().all(|row| members.baseline().contains(&row.id)));
        assert!(!members.has_changes());
    }

    #[test]
    fn append_creates_unique_pending_keys() {
        let mut members = OrderedMembers::new(LecternId::new());
        members.append(vec![child("a"), child("b")]);
        members.append(vec![child("c")]);
        let keys: BTreeSet<MemberKey> = members.items().iter().map(Member::key).collect();
        assert_eq!(keys.len(), 3);
        assert!(members.items().iter().all(Member::is_pending));
        assert_eq!(names(&members), vec!["a", "b", "c"]);
    }

    #[test]
    fn append_skips_existing_children() {
        let mut members = OrderedMembers::new(LecternId::new());
        let a = child("a");
        members.append(vec![a.clone(), child("b")]);
        members.append(vec![a.clone(), a.clone()]);
        assert_eq!(names(&members), vec!["a", "b"]);
    }

    #[test]
    fn no_duplicates_after_append_and_remove() {
        let mut members = OrderedMembers::new(LecternId::new());
        let a = child("a");
        let b = child("b");
        for _ in 0..3 {
            members.append(vec![a.clone(), b.clone(), a.clone()]);
            let key = members.items()[0].key();
            members.remove(&key);
            members.append(vec![a.clone(), b.clone()]);
        }
        assert_eq!(members.child_ids().len(), members.len());
    }

    #[test]
    fn remove_by_key() {
        let parent_id = LecternId::new();
        let mut members = OrderedMembers::from_rows(parent_id, rows(parent_id, &["a", "b"]));
        members.append(vec![child("c")]);

        let pending = members.items()[2].key();
        assert!(members.remove(&pending).is_some());
        assert!(members.remove(&pending).is_none());

        let persisted = members.items()[0].key();
        members.remove(&persisted);
        assert_eq!(names(&members), vec!["b"]);
    }

    // Baseline {m1, m2, m3}; remove m2, reorder to [m3, m1], append p1
    #[test]
    fn plan_after_remove_reorder_append() {
        let parent_id = LecternId::new();
        let loaded = rows(parent_id, &["m1", "m2", "m3"]);
        let (m1, m2, m3) = (loaded[0].id, loaded[1].id, loaded[2].id);
        let mut members = OrderedMembers::from_rows(parent_id, loaded);

        members.remove(&MemberKey::Persisted(m2));
        members.move_item(1, 0, DropPosition::Above);
        let p1 = child("p1");
        members.append(vec![p1.clone()]);
        assert_eq!(names(&members), vec!["m3", "m1", "p1"]);

        let plan = members.plan(OrderWrites::All);
        assert_eq!(plan.to_delete, vec![m2]);
        assert_eq!(plan.to_insert.len(), 1);
        assert_eq!(plan.to_insert[0].child_id, p1.0);
        assert_eq!(plan.to_insert[0].order, 2);
        assert_eq!(
            plan.to_reorder,
            vec![OrderUpdate { id: m3, order: 0 }, OrderUpdate { id: m1, order: 1 }]
        );
    }

    #[test]
    fn plan_changed_only_skips_noop_writes() {
        let parent_id = LecternId::new();
        let loaded = rows(parent_id, &["a", "b", "c"]);
        let (a, b) = (loaded[0].id, loaded[1].id);
        let mut members = OrderedMembers::from_rows(parent_id, loaded);

        assert_eq!(members.plan(OrderWrites::All).to_reorder.len(), 3);
        assert!(members.plan(OrderWrites::Changed).is_empty());

        members.move_item(0, 1, DropPosition::Below);
        let plan = members.plan(OrderWrites::Changed);
        assert_eq!(
            plan.to_reorder,
            vec![OrderUpdate { id: b, order: 0 }, OrderUpdate { id: a, order: 1 }]
        );
    }

    #[test]
    fn marks_rebase_the_working_copy() {
        let parent_id = LecternId::new();
        let loaded = rows(parent_id, &["a", "b"]);
        let b = loaded[1].id;
        let mut members = OrderedMembers::from_rows(parent_id, loaded);
        members.remove(&MemberKey::Persisted(b));
        members.append(vec![child("c")]);

        let plan = members.plan(OrderWrites::All);
        for id in &plan.to_delete {
            members.mark_deleted(*id);
        }
        let new_id = LecternId::new();
        for insert in &plan.to_insert {
            members.mark_inserted(insert.key, new_id, insert.order);
        }

        assert!(!members.baseline().contains(&b));
        assert!(members.baseline().contains(&new_id));
        assert!(members.items().iter().all(|item| !item.is_pending()));

        let plan = members.plan(OrderWrites::All);
        assert!(plan.to_delete.is_empty());
        assert!(plan.to_insert.is_empty());
        assert!(!members.has_changes());
    }

    #[test]
    fn apply_drop_and_cancel() {
        let parent_id = LecternId::new();
        let mut members = OrderedMembers::from_rows(parent_id, rows(parent_id, &["a", "b", "c"]));
        let before = members.clone();

        let mut drag = DragState::default();
        drag.start(0);
        drag.hover(2, 90.0, 80.0, 40.0);
        drag.cancel();
        assert!(!members.apply_drop(&mut drag));
        assert_eq!(members, before);

        drag.start(0);
        drag.hover(2, 90.0, 80.0, 40.0);
        assert!(members.apply_drop(&mut drag));
        assert_eq!(names(&members), vec!["b", "a", "c"]);
    }

    #[test]
    fn from_edit_validation() {
        let parent_id = LecternId::new();
        let id = LecternId::new();
        let a = child("a");
        let persisted = |id, child: Child| Member::Persisted {
            id,
            loaded_order: None,
            child,
        };

        let result = OrderedMembers::from_edit(
            parent_id,
            BTreeSet::new(),
            vec![persisted(id, a.clone())],
        );
        assert_eq!(result, Err(MembershipError::NotInBaseline(id)));

        let result = OrderedMembers::from_edit(
            parent_id,
            BTreeSet::from([id]),
            vec![persisted(id, child("a")), persisted(id, child("b"))],
        );
        assert_eq!(result, Err(MembershipError::DuplicateMember(id)));

        let mut members = OrderedMembers::new(parent_id);
        members.append(vec![a.clone()]);
        let mut items = members.items().to_vec();
        items.push(persisted(id, a.clone()));
        let result = OrderedMembers::from_edit(parent_id, BTreeSet::from([id]), items);
        assert_eq!(result, Err(MembershipError::DuplicateChild(a.0)));
    }
}
