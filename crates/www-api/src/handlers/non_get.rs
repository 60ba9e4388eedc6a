// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! All requests that aren't GET requests
//!

pub mod curriculum;
pub mod lecture;
pub mod video;

use crate::SharedState;
use axum::{
    Router,
    routing::{patch, put},
};
pub use curriculum::*;
pub use lecture::*;
pub use video::*;

pub fn router() -> Router<SharedState> {
    // Non-GET request routes for API v1
    #[rustfmt::skip]
    let apiv1 = Router::new()
        .route("/video",                    put(handle_put_video))
        .route("/video/{id}",               patch(handle_patch_video)
                                                .delete(handle_delete_video))
        .route("/lecture",                  put(handle_put_lecture))
        .route("/lecture/{id}",             patch(handle_patch_lecture)
                                                .delete(handle_delete_lecture))
        .route("/lecture/{id}/videos",      put(handle_put_lecture_videos))
        .route("/curriculum",               put(handle_put_curriculum))
        .route("/curriculum/{id}",          patch(handle_patch_curriculum)
                                                .delete(handle_delete_curriculum))
        .route("/curriculum/{id}/lectures", put(handle_put_curriculum_lectures));

    apiv1
}
