// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Stats
//!

use crate::CrudError;
use serde::Serialize;
use sqlx::Row;
use sqlx::Sqlite;
use sqlx::Transaction;

/// Each variant maps to a table in the database
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Table {
    /// Represents the `videos` table
    Videos,

    /// Represents the `lectures` table
    Lectures,

    /// Represents the `curriculums` table
    Curriculums,

    /// Represents the `lecture_videos` table
    LectureVideos,

    /// Represents the `curriculum_lectures` table
    CurriculumLectures,
}

/// Holds database row counts
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
pub struct DatabaseRowCount {
    pub videos: i64,
    pub lectures: i64,
    pub curriculums: i64,

    /// The number of videos-in-lectures
    pub lecture_videos: i64,

    /// The number of lectures-in-curriculums
    pub curriculum_lectures: i64,
}

impl DatabaseRowCount {
    /// Fetch the row count for all tables in the database
    pub async fn all(transaction: &mut Transaction<'_, Sqlite>) -> Result<Self, CrudError> {
        Ok(Self {
            videos: Self::table(transaction, Table::Videos).await?,
            lectures: Self::table(transaction, Table::Lectures).await?,
            curriculums: Self::table(transaction, Table::Curriculums).await?,
            lecture_videos: Self::table(transaction, Table::LectureVideos).await?,
            curriculum_lectures: Self::table(transaction, Table::CurriculumLectures).await?,
        })
    }

    /// Get the row count for a specific table in the database
    pub async fn table(
        transaction: &mut Transaction<'_, Sqlite>,
        table_name: Table,
    ) -> Result<i64, CrudError> {
        let table_name = match table_name {
            Table::Videos => "videos",
            Table::Lectures => "lectures",
            Table::Curriculums => "curriculums",
            Table::LectureVideos => "lecture_videos",
            Table::CurriculumLectures => "curriculum_lectures",
        };

        let row = sqlx::query(&format!("SELECT COUNT(*) AS row_count FROM {table_name}"))
            .fetch_one(&mut **transaction)
            .await?;
        Ok(row.get("row_count"))
    }
}
