// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! All CRUD functionality for individual [`Video`]s
//!

use crate::crud::common::*;
use crate::crud::member_tables::{MembershipTable, delete_child_member_rows};
use lectern_core::{Difficulty, HasIdAndTitle, LecternId, Title, Video, VideoKey, VideoSummary};
use sqlx::{FromRow, Sqlite, Transaction};

/// A row of the `videos` table
#[derive(FromRow)]
struct VideoRow {
    id: LecternId,
    youtube_key: String,
    title: Title,
    description: String,
    difficulty: Difficulty,
    duration_seconds: i64,
    is_visible: bool,
}

impl TryFrom<VideoRow> for Video {
    type Error = CrudError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        Ok(Video::from(
            Some(row.id),
            VideoKey::from(row.youtube_key)?,
            row.title,
            row.description,
            row.difficulty,
            to_u32(row.duration_seconds)?,
            row.is_visible,
        ))
    }
}

/// The columns a [`VideoSummary`] is built from
#[derive(FromRow)]
pub(crate) struct VideoSummaryRow {
    pub(crate) id: LecternId,
    pub(crate) title: Title,
    pub(crate) difficulty: Difficulty,
    pub(crate) duration_seconds: i64,
}

impl TryFrom<VideoSummaryRow> for VideoSummary {
    type Error = CrudError;

    fn try_from(row: VideoSummaryRow) -> Result<Self, Self::Error> {
        Ok(VideoSummary::from(
            row.id,
            row.title,
            row.difficulty,
            to_u32(row.duration_seconds)?,
        ))
    }
}

impl Create for Video {
    /// Create a [`Video`] in the database
    async fn create(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError> {
        if self.id().is_none() {
            self.set_id(LecternId::new());
        }
        let id = self.id().ok_or_else(|| CrudError::IdNotSet(self.title().clone()))?;

        sqlx::query(
            r#"
                INSERT INTO videos
                (
                    id,
                    youtube_key,
                    title,
                    description,
                    difficulty,
                    duration_seconds,
                    is_visible
                )
                VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(self.key())
        .bind(self.title())
        .bind(self.description())
        .bind(self.difficulty())
        .bind(i64::from(self.duration_seconds()))
        .bind(self.is_visible())
        .execute(&mut **transaction)
        .await
        .map_err(|error| key_in_use_or(error, self.key()))?;

        Ok(())
    }
}

impl FetchById for Video {
    async fn fetch_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<Self, CrudError> {
        sqlx::query_as::<_, VideoRow>(
            r#"
                SELECT id, youtube_key, title, description, difficulty, duration_seconds, is_visible
                FROM videos
                WHERE id=?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await?
        .ok_or(CrudError::VideoNotInDb)?
        .try_into()
    }
}

impl FetchAll for Video {
    async fn fetch_all(transaction: &mut Transaction<'_, Sqlite>) -> Result<Vec<Self>, CrudError> {
        sqlx::query_as::<_, VideoRow>(
            r#"
                SELECT id, youtube_key, title, description, difficulty, duration_seconds, is_visible
                FROM videos
                ORDER BY title
            "#,
        )
        .fetch_all(&mut **transaction)
        .await?
        .into_iter()
        .map(Video::try_from)
        .collect()
    }
}

impl Update for Video {
    /// Update a [`Video`]
    async fn update(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError> {
        let id = self.id().ok_or_else(|| CrudError::IdNotSet(self.title().clone()))?;

        let result = sqlx::query(
            r#"
                UPDATE videos
                SET
                    youtube_key = ?,
                    title = ?,
                    description = ?,
                    difficulty = ?,
                    duration_seconds = ?,
                    is_visible = ?
                WHERE id = ?
            "#,
        )
        .bind(self.key())
        .bind(self.title())
        .bind(self.description())
        .bind(self.difficulty())
        .bind(i64::from(self.duration_seconds()))
        .bind(self.is_visible())
        .bind(id)
        .execute(&mut **transaction)
        .await
        .map_err(|error| key_in_use_or(error, self.key()))?;

        if result.rows_affected() != 1 {
            Err(CrudError::VideoNotInDb)?
        }
        Ok(())
    }
}

impl DeleteById for Video {
    async fn delete_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<(), CrudError> {
        if !is_video_id_in_db(transaction, id).await? {
            return Err(CrudError::VideoNotInDb);
        }

        delete_child_member_rows(transaction, MembershipTable::LectureVideos, id).await?;

        // This must come last in order to satisfy FOREIGN KEY constraints
        sqlx::query("DELETE FROM videos WHERE id=?")
            .bind(id)
            .execute(&mut **transaction)
            .await?;
        Ok(())
    }
}

/// Turn a unique violation into the more specific "key already in use"
fn key_in_use_or(error: sqlx::Error, key: &VideoKey) -> CrudError {
    if let Some(db_err) = error.as_database_error() {
        if db_err.is_unique_violation() {
            return CrudError::VideoKeyAlreadyInUse(key.clone());
        }
    }
    error.into()
}

/// Check if the [`LecternId`] is a video ID in the database
pub async fn is_video_id_in_db(
    transaction: &mut Transaction<'_, Sqlite>,
    id: &LecternId,
) -> Result<bool, CrudError> {
    is_id_in_table(transaction, "videos", id).await
}

/// Fetch the summaries of all videos (optionally only the visible ones),
/// ordered by title.  These are the candidates offered when building a
/// lecture.
pub async fn fetch_video_summaries(
    transaction: &mut Transaction<'_, Sqlite>,
    visible_only: bool,
) -> Result<Vec<VideoSummary>, CrudError> {
    sqlx::query_as::<_, VideoSummaryRow>(
        r#"
            SELECT id, title, difficulty, duration_seconds
            FROM videos
            WHERE is_visible = 1 OR ? = 0
            ORDER BY title
        "#,
    )
    .bind(visible_only)
    .fetch_all(&mut **transaction)
    .await?
    .into_iter()
    .map(VideoSummary::try_from)
    .collect()
}
