// SPDX-License-Identifier: MIT

//!
//! The JSON form of an edited membership, as sent by an admin front end when
//! it saves
//!

use crate::{
    ChildSnapshot, LecternId, Member, MembershipError, OrderedMembers, ParentFields, PendingKey,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One member of an edited list
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemberEdit {
    /// An existing membership row (kept, possibly moved)
    Persisted { id: LecternId, child_id: LecternId },

    /// A child added since the list was loaded
    Pending { child_id: LecternId },
}

/// The desired children of a parent, in order, along with the member IDs that
/// were persisted when editing began
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MembershipEdit {
    pub baseline: BTreeSet<LecternId>,
    pub members: Vec<MemberEdit>,

    /// The parent's own attributes, if they've been edited too
    #[serde(default)]
    pub fields: Option<ParentFields>,
}

impl MembershipEdit {
    /// Rebuild the working copy for `parent_id`.  Only child IDs survive the
    /// trip (no snapshots).
    pub fn into_members(
        self,
        parent_id: LecternId,
    ) -> Result<OrderedMembers<LecternId>, MembershipError> {
        let items = self
            .members
            .into_iter()
            .enumerate()
            .map(|(index, member)| match member {
                MemberEdit::Persisted { id, child_id } => Member::Persisted {
                    id,
                    loaded_order: None,
                    child: child_id,
                },
                MemberEdit::Pending { child_id } => Member::Pending {
                    key: PendingKey::new(0, index),
                    child: child_id,
                },
            })
            .collect();
        OrderedMembers::from_edit(parent_id, self.baseline, items)
    }
}

impl<C: ChildSnapshot> OrderedMembers<C> {
    /// Describe this working copy in its JSON form
    pub fn to_edit(&self, fields: Option<ParentFields>) -> MembershipEdit {
        let members = self
            .items()
            .iter()
            .map(|item| match item.persisted_id() {
                Some(id) => MemberEdit::Persisted {
                    id,
                    child_id: item.child_id(),
                },
                None => MemberEdit::Pending {
                    child_id: item.child_id(),
                },
            })
            .collect();
        MembershipEdit {
            baseline: self.baseline().clone(),
            members,
            fields,
        }
    }
}
