// SPDX-License-Identifier: MIT

//!
//! The Lectern title type (videos, lectures, and curriculums all have one)
//!

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can arise in relation to a [`Title`]
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TitleError {
    #[error("Title cannot be empty")]
    Empty,
}

/// The Lectern [`Title`] type.  The value can be any string apart from one
/// which when trimmed of trailing and leading whitespace is empty.  Korean
/// titles are stored as-is.
#[derive(derive_more::Display, Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Title(String);

impl Title {
    /// Create and initialise a new title if it will be valid
    pub fn from<S: ToString>(title: S) -> Result<Self, TitleError> {
        let title = title.to_string();
        if title.trim().is_empty() {
            Err(TitleError::Empty)
        } else {
            Ok(Title(title.trim().to_string()))
        }
    }

    /// Get the underlying `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Title {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Title::from(string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from() {
        assert!(Title::from("").is_err());
        assert!(Title::from("  ").is_err());
        let ok_1 = Title::from("파이썬 기초").unwrap();
        let ok_2 = Title::from(" 파이썬 기초 ").unwrap();
        assert_eq!(ok_1, ok_2)
    }

    #[test]
    fn deserialize_rejects_blank() {
        assert!(serde_json::from_str::<Title>(r#""   ""#).is_err());
        let title: Title = serde_json::from_str(r#"" 자료구조 ""#).unwrap();
        assert_eq!(title.as_str(), "자료구조");
    }
}
