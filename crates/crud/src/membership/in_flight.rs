// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! At most one save per parent at a time
//!

use lectern_core::LecternId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The parents that currently have a save running.  Clones share the same
/// registry.
#[derive(Clone, Debug, Default)]
pub struct InFlightSaves {
    parents: Arc<Mutex<HashSet<LecternId>>>,
}

impl InFlightSaves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a save as started for the parent.  Returns `None` if one is already
    /// running.  The save is finished when the ticket is dropped.
    pub fn try_begin(&self, parent_id: LecternId) -> Option<SaveTicket> {
        if !lock(&self.parents).insert(parent_id) {
            return None;
        }
        Some(SaveTicket {
            parents: Arc::clone(&self.parents),
            parent_id,
        })
    }

    pub fn is_in_flight(&self, parent_id: LecternId) -> bool {
        lock(&self.parents).contains(&parent_id)
    }
}

/// Held for the duration of one save
#[derive(Debug)]
pub struct SaveTicket {
    parents: Arc<Mutex<HashSet<LecternId>>>,
    parent_id: LecternId,
}

impl SaveTicket {
    pub fn parent_id(&self) -> LecternId {
        self.parent_id
    }
}

impl Drop for SaveTicket {
    fn drop(&mut self) {
        lock(&self.parents).remove(&self.parent_id);
    }
}

// A panic while holding the lock can't leave the set half-updated
fn lock(parents: &Mutex<HashSet<LecternId>>) -> MutexGuard<'_, HashSet<LecternId>> {
    parents.lock().unwrap_or_else(PoisonError::into_inner)
}
