// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Web API for fetching curriculums & their lectures
//!

use crate::helpers::{candidates, members};
use crate::{ApiError, PublishedOnlyQueryParams, SharedState};
use axum::Json;
use axum::extract::{Path, Query, State};
use lectern_core::{Curriculum, LectureSummary, LecternId, MembershipRow};
use lectern_crud::{CurriculumLectureStore, FetchAll, FetchById};

pub async fn handle_get_curriculums(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Curriculum>>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Ok(Json(Curriculum::fetch_all(&mut transaction).await?))
}

pub async fn handle_get_curriculum(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<Curriculum>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Ok(Json(Curriculum::fetch_by_id(&mut transaction, &id).await?))
}

/// Handle a request to fetch a curriculum's lectures, in order
pub async fn handle_get_curriculum_lectures(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<Vec<MembershipRow<LectureSummary>>>, ApiError> {
    members(CurriculumLectureStore::new(state.pool.clone()), id).await
}

/// Handle a request to fetch the lectures that could be added to a curriculum
pub async fn handle_get_curriculum_candidates(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Query(params): Query<PublishedOnlyQueryParams>,
) -> Result<Json<Vec<LectureSummary>>, ApiError> {
    candidates(CurriculumLectureStore::new(state.pool.clone()), id, params.into()).await
}
