// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Web API for a single video
//!

use crate::{ApiError, SharedState};
use axum::Json;
use axum::extract::{Path, State};
use lectern_core::{HasIdAndTitle, LecternId, Video};
use lectern_crud::{Create, CrudError, DeleteById, FetchById, Update};

/// Handle a request to create a video
pub async fn handle_put_video(
    State(state): State<SharedState>,
    Json(mut payload): Json<Video>,
) -> Result<Json<Video>, ApiError> {
    let mut transaction = state.pool.begin().await?;

    // New videos always get a fresh ID
    payload.clear_id();
    payload.create(&mut transaction).await?;
    let id = payload
        .id()
        .ok_or_else(|| CrudError::IdNotSet(payload.title().clone()))?;
    let created = Video::fetch_by_id(&mut transaction, &id).await?;

    transaction.commit().await?;
    Ok(Json(created))
}

/// Handle a request to update a video
pub async fn handle_patch_video(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Json(mut payload): Json<Video>,
) -> Result<Json<Video>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    payload.set_id(id);
    payload.update(&mut transaction).await?;
    let updated = Video::fetch_by_id(&mut transaction, &id).await?;
    transaction.commit().await?;
    Ok(Json(updated))
}

/// Handle a request to delete a video (and remove it from every lecture)
pub async fn handle_delete_video(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<()>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Video::delete_by_id(&mut transaction, &id).await?;
    transaction.commit().await?;
    Ok(Json(()))
}
