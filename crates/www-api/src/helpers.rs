// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Generic helpers
//!

use crate::ApiError;
use axum::Json;
use lectern_core::{
    LecternId, MembershipEdit, MembershipError, MembershipRow, OrderWrites, OrderedMembers,
    Selection,
};
use lectern_crud::{
    CandidateFilter, CrudError, InFlightSaves, MembershipStore, SessionError, reconcile,
};
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
pub struct ErrorMsg {
    pub error_msg: String,
}

async fn ensure_parent_exists<S: MembershipStore>(
    store: &S,
    parent_id: LecternId,
) -> Result<(), ApiError> {
    if !store.parent_exists(parent_id).await? {
        Err(CrudError::IdNotInDb)?
    }
    Ok(())
}

/// The ordered members of a parent
pub async fn members<S: MembershipStore>(
    store: S,
    parent_id: LecternId,
) -> Result<Json<Vec<MembershipRow<S::Child>>>, ApiError> {
    ensure_parent_exists(&store, parent_id).await?;
    Ok(Json(store.list_members(parent_id).await?))
}

/// The children that could be added to a parent (those that aren't already
/// members)
pub async fn candidates<S: MembershipStore>(
    store: S,
    parent_id: LecternId,
    filter: CandidateFilter,
) -> Result<Json<Vec<S::Child>>, ApiError> {
    ensure_parent_exists(&store, parent_id).await?;
    let current = OrderedMembers::from_rows(parent_id, store.list_members(parent_id).await?);
    let candidates = store.list_candidates(filter).await?;
    Ok(Json(Selection::open(candidates, &current).available().to_vec()))
}

/// Reconcile an edited member list (and optionally the parent's own fields)
/// with the database, returning the members as now persisted
pub async fn save_members<S: MembershipStore>(
    store: S,
    in_flight: &InFlightSaves,
    parent_id: LecternId,
    edit: MembershipEdit,
) -> Result<Json<Vec<MembershipRow<S::Child>>>, ApiError> {
    ensure_parent_exists(&store, parent_id).await?;
    let fields = edit.fields.clone();
    let mut edited = edit.into_members(parent_id)?;

    let _ticket = in_flight
        .try_begin(parent_id)
        .ok_or(SessionError::SaveInFlight)?;

    // The baseline may only name this parent's rows
    let persisted: BTreeSet<LecternId> = store
        .list_members(parent_id)
        .await?
        .into_iter()
        .map(|row| row.id)
        .collect();
    if let Some(id) = edited.baseline().difference(&persisted).next() {
        Err(MembershipError::NotInBaseline(*id))?
    }

    if let Some(fields) = &fields {
        store.update_parent(parent_id, fields).await?;
    }
    let report = reconcile(&store, &mut edited, OrderWrites::default()).await?;
    info!("Saved the members of {parent_id}: {report:?}");

    Ok(Json(store.list_members(parent_id).await?))
}
