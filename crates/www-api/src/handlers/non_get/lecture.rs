// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Web API for a single lecture and its videos
//!

use crate::helpers::save_members;
use crate::{ApiError, SharedState};
use axum::Json;
use axum::extract::{Path, State};
use lectern_core::{
    HasIdAndTitle, Lecture, LecternId, MembershipEdit, MembershipRow, VideoSummary,
};
use lectern_crud::{Create, CrudError, DeleteById, FetchById, LectureVideoStore, Update};

/// Handle a request to create a lecture (with no videos)
pub async fn handle_put_lecture(
    State(state): State<SharedState>,
    Json(mut payload): Json<Lecture>,
) -> Result<Json<Lecture>, ApiError> {
    let mut transaction = state.pool.begin().await?;

    // New lectures always get a fresh ID
    payload.clear_id();
    payload.create(&mut transaction).await?;
    let id = payload
        .id()
        .ok_or_else(|| CrudError::IdNotSet(payload.title().clone()))?;
    let created = Lecture::fetch_by_id(&mut transaction, &id).await?;

    transaction.commit().await?;
    Ok(Json(created))
}

/// Handle a request to update a lecture's own fields
pub async fn handle_patch_lecture(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Json(mut payload): Json<Lecture>,
) -> Result<Json<Lecture>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    payload.set_id(id);
    payload.update(&mut transaction).await?;
    let updated = Lecture::fetch_by_id(&mut transaction, &id).await?;
    transaction.commit().await?;
    Ok(Json(updated))
}

/// Handle a request to delete a lecture (and remove it from every curriculum)
pub async fn handle_delete_lecture(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<()>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Lecture::delete_by_id(&mut transaction, &id).await?;
    transaction.commit().await?;
    Ok(Json(()))
}

/// Handle a request to save an edited list of a lecture's videos
pub async fn handle_put_lecture_videos(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Json(payload): Json<MembershipEdit>,
) -> Result<Json<Vec<MembershipRow<VideoSummary>>>, ApiError> {
    let store = LectureVideoStore::new(state.pool.clone());
    save_members(store, &state.in_flight, id, payload).await
}
