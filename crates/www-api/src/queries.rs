// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! All query parameter structs
//!

use lectern_crud::CandidateFilter;
use serde::Deserialize;

/// `?visible-only=<bool>`
#[derive(Deserialize, Default, Debug, Clone, Copy)]
pub struct VisibleOnlyQueryParams {
    #[serde(rename = "visible-only", default)]
    pub visible_only: bool,
}

/// `?published-only=<bool>`
#[derive(Deserialize, Default, Debug, Clone, Copy)]
pub struct PublishedOnlyQueryParams {
    #[serde(rename = "published-only", default)]
    pub published_only: bool,
}

impl From<VisibleOnlyQueryParams> for CandidateFilter {
    fn from(params: VisibleOnlyQueryParams) -> Self {
        CandidateFilter {
            listed_only: params.visible_only,
        }
    }
}

impl From<PublishedOnlyQueryParams> for CandidateFilter {
    fn from(params: PublishedOnlyQueryParams) -> Self {
        CandidateFilter {
            listed_only: params.published_only,
        }
    }
}
