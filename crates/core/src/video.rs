// SPDX-License-Identifier: MIT

//!
//! The Lectern video type (a curated YouTube video)
//!

use crate::{ChildSnapshot, Difficulty, HasIdAndTitle, LecternId, Title};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Length of a YouTube video key
const VIDEO_KEY_LEN: usize = 11;

/// Errors that can arise in relation to a [`VideoKey`]
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum VideoKeyError {
    #[error("A YouTube video key must be {VIDEO_KEY_LEN} characters long")]
    Length,

    #[error("A YouTube video key may only contain A-Z, a-z, 0-9, '-' and '_'")]
    Character,
}

/// The YouTube key of a video (the `v=` part of a watch URL)
#[derive(derive_more::Display, Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct VideoKey(String);

impl VideoKey {
    /// Create a video key if the string is a valid one
    pub fn from<S: ToString>(key: S) -> Result<Self, VideoKeyError> {
        let key = key.to_string();
        let key = key.trim();
        if key.chars().count() != VIDEO_KEY_LEN {
            return Err(VideoKeyError::Length);
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(VideoKeyError::Character);
        }
        Ok(Self(key.to_string()))
    }

    /// Get the underlying `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL used to embed the video in a player
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.0)
    }

    /// The URL of the video's default thumbnail
    pub fn thumbnail_url(&self) -> String {
        format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.0)
    }
}

impl<'de> Deserialize<'de> for VideoKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        VideoKey::from(string).map_err(serde::de::Error::custom)
    }
}

/// The Lectern [`Video`] type
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Video {
    /// The video's ID
    id: Option<LecternId>,

    /// The YouTube key
    key: VideoKey,

    /// The video's title
    title: Title,

    /// Free text description
    #[serde(default)]
    description: String,

    /// How demanding the video is
    #[serde(default)]
    difficulty: Difficulty,

    /// Length of the video
    duration_seconds: u32,

    /// Whether the video is listed to learners (and offered as a candidate
    /// when building lectures with the visible-only filter)
    #[serde(default = "default_visible")]
    is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Video {
    /// Create a [`Video`]
    pub fn from(
        id: Option<LecternId>,
        key: VideoKey,
        title: Title,
        description: String,
        difficulty: Difficulty,
        duration_seconds: u32,
        is_visible: bool,
    ) -> Self {
        Self {
            id,
            key,
            title,
            description,
            difficulty,
            duration_seconds,
            is_visible,
        }
    }

    /// Clear the video's ID
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn key(&self) -> &VideoKey {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, is_visible: bool) {
        self.is_visible = is_visible;
    }

    /// The snapshot of this video shown when it's a member of a lecture.
    /// `None` if the video hasn't been saved yet.
    pub fn summary(&self) -> Option<VideoSummary> {
        self.id.map(|id| VideoSummary {
            id,
            title: self.title.clone(),
            difficulty: self.difficulty,
            duration_seconds: self.duration_seconds,
        })
    }
}

impl HasIdAndTitle for Video {
    fn id(&self) -> Option<LecternId> {
        self.id
    }

    fn set_id(&mut self, id: LecternId) {
        self.id = Some(id)
    }

    fn title(&self) -> &Title {
        &self.title
    }

    fn set_title(&mut self, title: Title) {
        self.title = title
    }
}

/// Read-only snapshot of a video, as displayed inside a lecture
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VideoSummary {
    id: LecternId,
    title: Title,
    difficulty: Difficulty,
    duration_seconds: u32,
}

impl VideoSummary {
    pub fn from(
        id: LecternId,
        title: Title,
        difficulty: Difficulty,
        duration_seconds: u32,
    ) -> Self {
        Self {
            id,
            title,
            difficulty,
            duration_seconds,
        }
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}

impl ChildSnapshot for VideoSummary {
    fn child_id(&self) -> LecternId {
        self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn video_key() {
        assert!(VideoKey::from("dQw4w9WgXcQ").is_ok());
        assert!(VideoKey::from(" dQw4w9WgXcQ ").is_ok());
        assert_eq!(VideoKey::from("short"), Err(VideoKeyError::Length));
        assert_eq!(VideoKey::from("dQw4w9WgX!Q"), Err(VideoKeyError::Character));
        assert_eq!(
            VideoKey::from("dQw4w9WgXcQ").unwrap().embed_url(),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn deserialize_defaults() {
        let json = r#"{
            "id": null,
            "key": "dQw4w9WgXcQ",
            "title": "변수와 자료형",
            "duration_seconds": 640
        }"#;
        let video: Video = serde_json::from_str(json).unwrap();
        assert!(video.is_visible());
        assert_eq!(video.difficulty(), Difficulty::Beginner);
        assert!(video.summary().is_none());
    }

    #[test]
    fn deserialize_rejects_bad_key() {
        let json = r#"{ "id": null, "key": "nope", "title": "x", "duration_seconds": 1 }"#;
        assert!(serde_json::from_str::<Video>(json).is_err());
    }
}
