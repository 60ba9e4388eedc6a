// SPDX-License-Identifier: MIT

//!
//! The "add videos"/"add lectures" picker.  It only ever offers children that
//! aren't already members, which is what keeps duplicates out.
//!

use crate::{ChildSnapshot, LecternId, OrderedMembers};
use std::collections::BTreeSet;

/// An open picker.  Dropping it (or calling [`Selection::cancel`]) discards the
/// selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection<C> {
    /// Candidates that aren't already members, in candidate order
    available: Vec<C>,

    /// IDs of the ticked candidates
    selected: BTreeSet<LecternId>,
}

impl<C: ChildSnapshot> Selection<C> {
    /// Open the picker over all `candidates`, hiding the ones already in
    /// `members`
    pub fn open(candidates: Vec<C>, members: &OrderedMembers<C>) -> Self {
        let current = members.child_ids();
        let available = candidates
            .into_iter()
            .filter(|candidate| !current.contains(&candidate.child_id()))
            .collect();
        Self {
            available,
            selected: BTreeSet::new(),
        }
    }

    pub fn available(&self) -> &[C] {
        &self.available
    }

    pub fn is_selected(&self, child_id: LecternId) -> bool {
        self.selected.contains(&child_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Tick or untick a candidate, returning whether it's now selected.  IDs
    /// that aren't on offer are ignored.
    pub fn toggle(&mut self, child_id: LecternId) -> bool {
        if !self.available.iter().any(|c| c.child_id() == child_id) {
            return false;
        }
        if !self.selected.remove(&child_id) {
            self.selected.insert(child_id);
        }
        self.is_selected(child_id)
    }

    /// Append the selected candidates (in candidate order) to `members` and
    /// close the picker.  Returns how many were selected.
    pub fn confirm(self, members: &mut OrderedMembers<C>) -> usize {
        let Self {
            available,
            selected,
        } = self;
        let chosen: Vec<C> = available
            .into_iter()
            .filter(|candidate| selected.contains(&candidate.child_id()))
            .collect();
        let count = chosen.len();
        members.append(chosen);
        count
    }

    /// Close the picker without changing anything
    pub fn cancel(self) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MembershipRow;

    fn ids(n: usize) -> Vec<LecternId> {
        (0..n).map(|_| LecternId::new()).collect()
    }

    #[test]
    fn offers_only_non_members() {
        let parent_id = LecternId::new();
        let candidates = ids(4);
        let rows = vec![MembershipRow {
            id: LecternId::new(),
            parent_id,
            order: 0,
            child: candidates[1],
        }];
        let members = OrderedMembers::from_rows(parent_id, rows);
        let selection = Selection::open(candidates.clone(), &members);
        assert_eq!(
            selection.available(),
            &[candidates[0], candidates[2], candidates[3]]
        );
    }

    #[test]
    fn confirm_appends_in_candidate_order() {
        let parent_id = LecternId::new();
        let candidates = ids(3);
        let mut members = OrderedMembers::new(parent_id);
        let mut selection = Selection::open(candidates.clone(), &members);

        assert!(selection.toggle(candidates[2]));
        assert!(selection.toggle(candidates[0]));
        assert!(selection.toggle(candidates[1]));
        assert!(!selection.toggle(candidates[1]));
        assert!(!selection.toggle(LecternId::new()));
        assert_eq!(selection.selected_count(), 2);

        assert_eq!(selection.confirm(&mut members), 2);
        let added: Vec<LecternId> = members.items().iter().map(|m| m.child_id()).collect();
        assert_eq!(added, vec![candidates[0], candidates[2]]);
        assert!(members.items().iter().all(|m| m.is_pending()));

        // Re-opening no longer offers what was just added
        let selection = Selection::open(candidates.clone(), &members);
        assert_eq!(selection.available(), &[candidates[1]]);
    }

    #[test]
    fn cancel_leaves_members_alone() {
        let parent_id = LecternId::new();
        let candidates = ids(2);
        let members = OrderedMembers::new(parent_id);
        let before = members.clone();
        let mut selection = Selection::open(candidates.clone(), &members);
        selection.toggle(candidates[0]);
        selection.cancel();
        assert_eq!(members, before);
    }
}
