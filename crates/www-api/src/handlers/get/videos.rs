// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Web API for fetching videos
//!

use crate::{ApiError, SharedState, VisibleOnlyQueryParams};
use axum::Json;
use axum::extract::{Path, Query, State};
use lectern_core::{LecternId, Video, VideoSummary};
use lectern_crud::{FetchById, fetch_video_summaries};

/// Handle a request to fetch all video summaries
pub async fn handle_get_videos(
    State(state): State<SharedState>,
    Query(params): Query<VisibleOnlyQueryParams>,
) -> Result<Json<Vec<VideoSummary>>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Ok(Json(
        fetch_video_summaries(&mut transaction, params.visible_only).await?,
    ))
}

/// Handle a request to fetch a video
pub async fn handle_get_video(
    State(state): State<SharedState>,
    Path(id): Path<LecternId>,
) -> Result<Json<Video>, ApiError> {
    let mut transaction = state.pool.begin().await?;
    Ok(Json(Video::fetch_by_id(&mut transaction, &id).await?))
}
