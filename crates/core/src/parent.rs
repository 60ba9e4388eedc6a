// SPDX-License-Identifier: MIT

//!
//! Parent aggregates: lectures (which group videos) and curriculums (which
//! group lectures)
//!

use crate::{ChildSnapshot, Difficulty, HasIdAndTitle, LecternId, Title};
use serde::{Deserialize, Serialize};

/// The editable attributes of a parent aggregate.  Lectures and curriculums
/// share the same set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParentFields {
    pub title: Title,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Listed to learners
    #[serde(default)]
    pub is_published: bool,

    /// Shown on the front page
    #[serde(default)]
    pub is_featured: bool,
}

impl ParentFields {
    /// Unpublished, unfeatured fields with the given title
    pub fn titled(title: Title) -> Self {
        Self {
            title,
            description: String::new(),
            difficulty: Difficulty::default(),
            is_published: false,
            is_featured: false,
        }
    }
}

/// A lecture: an ordered group of videos
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lecture {
    id: Option<LecternId>,

    #[serde(flatten)]
    fields: ParentFields,
}

/// A curriculum: an ordered group of lectures
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Curriculum {
    id: Option<LecternId>,

    #[serde(flatten)]
    fields: ParentFields,
}

// Lectures and curriculums only differ in what their children are
macro_rules! impl_parent {
    ($parent:ident) => {
        impl $parent {
            pub fn from(id: Option<LecternId>, fields: ParentFields) -> Self {
                Self { id, fields }
            }

            pub fn clear_id(&mut self) {
                self.id = None;
            }

            pub fn fields(&self) -> &ParentFields {
                &self.fields
            }

            pub fn set_fields(&mut self, fields: ParentFields) {
                self.fields = fields;
            }
        }

        impl HasIdAndTitle for $parent {
            fn id(&self) -> Option<LecternId> {
                self.id
            }

            fn set_id(&mut self, id: LecternId) {
                self.id = Some(id)
            }

            fn title(&self) -> &Title {
                &self.fields.title
            }

            fn set_title(&mut self, title: Title) {
                self.fields.title = title
            }
        }
    };
}

impl_parent!(Lecture);
impl_parent!(Curriculum);

/// Read-only snapshot of a lecture, as displayed inside a curriculum
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LectureSummary {
    id: LecternId,
    title: Title,
    difficulty: Difficulty,
    is_published: bool,

    /// How many videos the lecture holds
    video_count: u32,
}

impl LectureSummary {
    pub fn from(
        id: LecternId,
        title: Title,
        difficulty: Difficulty,
        is_published: bool,
        video_count: u32,
    ) -> Self {
        Self {
            id,
            title,
            difficulty,
            is_published,
            video_count,
        }
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn video_count(&self) -> u32 {
        self.video_count
    }
}

impl ChildSnapshot for LectureSummary {
    fn child_id(&self) -> LecternId {
        self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lecture_json_is_flat() {
        let json = r#"{
            "id": null,
            "title": "자바스크립트 입문",
            "difficulty": "beginner",
            "is_published": true
        }"#;
        let lecture: Lecture = serde_json::from_str(json).unwrap();
        assert_eq!(lecture.title().as_str(), "자바스크립트 입문");
        assert!(lecture.fields().is_published);
        assert!(!lecture.fields().is_featured);
        assert_eq!(lecture.fields().description, "");

        let value = serde_json::to_value(&lecture).unwrap();
        assert_eq!(value["title"], "자바스크립트 입문");
        assert!(value.get("fields").is_none());
    }
}
