// SPDX-License-Identifier: MIT

//!
//! Difficulty levels shared by videos, lectures, and curriculums
//!

use serde::{Deserialize, Serialize};

/// How demanding a video, lecture, or curriculum is
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum Difficulty {
    /// 입문
    #[default]
    #[display("beginner")]
    Beginner,

    /// 중급
    #[display("intermediate")]
    Intermediate,

    /// 고급
    #[display("advanced")]
    Advanced,
}
