// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! All GET requests
//!

use crate::SharedState;
use axum::{Router, routing::get};

pub mod curriculums;
pub mod lectures;
pub mod videos;

pub fn router() -> Router<SharedState> {
    #[rustfmt::skip]
    let apiv1 = Router::new()
        .route("/videos",                     get(videos::handle_get_videos))
        .route("/video/{id}",                 get(videos::handle_get_video))
        .route("/lectures",                   get(lectures::handle_get_lectures))
        .route("/lecture/{id}",               get(lectures::handle_get_lecture))
        .route("/lecture/{id}/videos",        get(lectures::handle_get_lecture_videos))
        .route("/lecture/{id}/candidates",    get(lectures::handle_get_lecture_candidates))
        .route("/curriculums",                get(curriculums::handle_get_curriculums))
        .route("/curriculum/{id}",            get(curriculums::handle_get_curriculum))
        .route("/curriculum/{id}/lectures",   get(curriculums::handle_get_curriculum_lectures))
        .route("/curriculum/{id}/candidates", get(curriculums::handle_get_curriculum_candidates));
    apiv1
}
