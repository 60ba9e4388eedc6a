// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Web API for fetching lectures & their videos
//!

use crate::helpers::{candidates, members};
use crate::{ApiError, PublishedOnlyQueryParams, SharedState, VisibleOnlyQueryParams};
use axum::Json;
use axum::extract::{Path, Query, State};
use lectern_core::{Lecture, LectureSummary, LecternId, MembershipRow, VideoSummary};
use lectern_crud::{FetchById, LectureVideoStore, fetch_lecture_summaries};

/// Handle a request to fetch all lecture summaries
pub async fn handle_get_lectures(
    State(state): State<SharedState>,
    Query(params): Query<PublishedOnlyQueryParams>,
) -> Result<Json<Vec<LectureSummary>>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Ok(Json(
        fetch_lecture_summaries(&mut transaction, params.published_only).await?,
    ))
}

/// Handle a request to fetch a lecture (without its videos)
pub async fn handle_get_lecture(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<Lecture>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Ok(Json(Lecture::fetch_by_id(&mut transaction, &id).await?))
}

/// Handle a request to fetch a lecture's videos, in order
pub async fn handle_get_lecture_videos(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<Vec<MembershipRow<VideoSummary>>>, ApiError> {
    members(LectureVideoStore::new(state.pool.clone()), id).await
}

/// Handle a request to fetch the videos that could be added to a lecture
pub async fn handle_get_lecture_candidates(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
    Query(params): Query<VisibleOnlyQueryParams>,
) -> Result<Json<Vec<VideoSummary>>, ApiError> {
    candidates(LectureVideoStore::new(state.pool.clone()), id, params.into()).await
}
