// SPDX-License-Identifier: MIT

//!
//! The set of database operations that brings the persisted membership in
//! line with an edited [`crate::OrderedMembers`]
//!

use crate::{LecternId, PendingKey};
use serde::{Deserialize, Serialize};

/// Which surviving members get their order re-written on save
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderWrites {
    /// Every surviving member, whether or not it moved
    #[default]
    All,

    /// Only the members whose position differs from the one last persisted
    Changed,
}

/// A pending member to be inserted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PendingInsert {
    pub key: PendingKey,
    pub child_id: LecternId,
    pub order: u32,
}

/// A persisted member whose order is to be (re-)written
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderUpdate {
    pub id: LecternId,
    pub order: u32,
}

/// Operations, to be run in field order (deletes, inserts, order updates)
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReconcilePlan {
    pub to_delete: Vec<LecternId>,
    pub to_insert: Vec<PendingInsert>,
    pub to_reorder: Vec<OrderUpdate>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty() && self.to_reorder.is_empty()
    }

    /// Total number of database operations
    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_insert.len() + self.to_reorder.len()
    }
}
