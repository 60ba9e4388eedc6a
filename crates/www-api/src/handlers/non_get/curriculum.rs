// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Web API for a single curriculum and its lectures
//!

use crate::helpers::save_members;
use crate::{ApiError, SharedState};
use axum::Json;
use axum::extract::{Path, State};
use lectern_core::{
    Curriculum, HasIdAndTitle, LectureSummary, LecternId, MembershipEdit, MembershipRow,
};
use lectern_crud::{Create, CrudError, CurriculumLectureStore, DeleteById, FetchById, Update};

/// Handle a request to create a curriculum (with no lectures)
pub async fn handle_put_curriculum(
    State(state): State<SharedState>,
    Json(mut payload): Json<Curriculum>,
) -> Result<Json<Curriculum>, ApiError> {
    let mut transaction = state.pool.begin().await?;

    // New curriculums always get a fresh ID
    payload.clear_id();
    payload.create(&mut transaction).await?;
    let id = payload
        .id()
        .ok_or_else(|| CrudError::IdNotSet(payload.title().clone()))?;
    let created = Curriculum::fetch_by_id(&mut transaction, &id).await?;

    transaction.commit().await?;
    Ok(Json(created))
}

pub async fn handle_patch_curriculum(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Json(mut payload): Json<Curriculum>,
) -> Result<Json<Curriculum>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    payload.set_id(id);
    payload.update(&mut transaction).await?;
    let updated = Curriculum::fetch_by_id(&mut transaction, &id).await?;
    transaction.commit().await?;
    Ok(Json(updated))
}

/// Handle a request to delete a curriculum (its lectures are kept)
pub async fn handle_delete_curriculum(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<()>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Curriculum::delete_by_id(&mut transaction, &id).await?;
    transaction.commit().await?;
    Ok(Json(()))
}

/// Handle a request to save an edited list of a curriculum's lectures
pub async fn handle_put_curriculum_lectures(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Json(payload): Json<MembershipEdit>,
) -> Result<Json<Vec<MembershipRow<LectureSummary>>>, ApiError> {
    let store = CurriculumLectureStore::new(state.pool.clone());
    save_members(store, &state.in_flight, id, payload).await
}
