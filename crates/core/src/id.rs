// SPDX-License-Identifier: MIT

//!
//! The Lectern ID type (used for videos, lectures, curriculums, and the
//! membership rows that link them)
//!

use std::str::FromStr;
use uuid::Uuid;

/// A UUIDv4.  Stored in SQLite as a 16 byte BLOB and sent over JSON as the
/// hyphenated string.
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(derive_more::Display, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct LecternId(Uuid);

impl LecternId {
    /// A fresh random ID (memberships get one per row, so adding the same
    /// child twice never reuses an ID)
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from anything printable
    pub fn from<S: ToString>(string: S) -> Result<Self, uuid::Error> {
        string.to_string().parse()
    }
}

impl FromStr for LecternId {
    type Err = uuid::Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(string).map(Self)
    }
}

impl Default for LecternId {
    fn default() -> Self {
        Self::new()
    }
}
