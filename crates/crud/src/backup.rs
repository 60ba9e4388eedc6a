// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Backup & restore all videos, lectures and curriculums (along with the order
//! of their members) to & from JSON
//!

use crate::crud::{
    Create, CrudError, FetchAll, MembershipTable, fetch_member_child_ids,
    insert_curriculum_lecture, insert_lecture_video,
};
use lectern_core::{Curriculum, HasIdAndTitle, Lecture, LecternId, Video};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, Transaction};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use thiserror::Error;

const VIDEOS_FILE: &str = "videos.json";
const LECTURES_FILE: &str = "lectures.json";
const CURRICULUMS_FILE: &str = "curriculums.json";

/// Errors that can occur when backing up/restoring Lectern databases
#[derive(Debug, Error)]
pub enum BackupRestoreError {
    /// A CRUD error occurred
    #[error(transparent)]
    CrudError(#[from] CrudError),

    /// An error occured when working with the backup/restore dir or files.
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// A database error occured in this module (database errors else where will
    /// be returned as a `CrudError`)
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A JSON error occured (most likely when reading a JSON file).
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// Everything restored must carry its ID (memberships refer to them)
    #[error("'{0}' has no ID")]
    MissingId(String),
}

/// A lecture as stored in `lectures.json`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LectureBackup {
    #[serde(flatten)]
    pub lecture: Lecture,

    /// The lecture's videos, in order
    #[serde(default)]
    pub video_ids: Vec<LecternId>,
}

/// A curriculum as stored in `curriculums.json`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CurriculumBackup {
    #[serde(flatten)]
    pub curriculum: Curriculum,

    /// The curriculum's lectures, in order
    #[serde(default)]
    pub lecture_ids: Vec<LecternId>,
}

/// Backup the database to JSON files in `backup_dir`
pub async fn backup(
    transaction: &mut Transaction<'_, Sqlite>,
    backup_dir: &Path,
) -> Result<(), BackupRestoreError> {
    let videos = Video::fetch_all(transaction).await?;
    write_json(&backup_dir.join(VIDEOS_FILE), &videos)?;

    let mut lectures = Vec::new();
    for lecture in Lecture::fetch_all(transaction).await? {
        let id = required_id(&lecture)?;
        let video_ids =
            fetch_member_child_ids(transaction, MembershipTable::LectureVideos, &id).await?;
        lectures.push(LectureBackup { lecture, video_ids });
    }
    write_json(&backup_dir.join(LECTURES_FILE), &lectures)?;

    let mut curriculums = Vec::new();
    for curriculum in Curriculum::fetch_all(transaction).await? {
        let id = required_id(&curriculum)?;
        let lecture_ids =
            fetch_member_child_ids(transaction, MembershipTable::CurriculumLectures, &id).await?;
        curriculums.push(CurriculumBackup {
            curriculum,
            lecture_ids,
        });
    }
    write_json(&backup_dir.join(CURRICULUMS_FILE), &curriculums)?;

    info!(
        "Backed up {} videos, {} lectures & {} curriculums to {}",
        videos.len(),
        lectures.len(),
        curriculums.len(),
        backup_dir.to_string_lossy()
    );
    Ok(())
}

/// Clear the database and fill it from the JSON files in `restore_dir`.
/// Member orders are taken from the position in each list.
pub async fn restore(
    transaction: &mut Transaction<'_, Sqlite>,
    restore_dir: &Path,
) -> Result<(), BackupRestoreError> {
    clear_db(transaction).await?;

    // Order important because of FOREIGN KEY constraints
    let videos: Vec<Video> = read_json(&restore_dir.join(VIDEOS_FILE))?;
    for mut video in videos {
        required_id(&video)?;
        video.create(transaction).await?;
    }

    let lectures: Vec<LectureBackup> = read_json(&restore_dir.join(LECTURES_FILE))?;
    for LectureBackup {
        mut lecture,
        video_ids,
    } in lectures
    {
        let id = required_id(&lecture)?;
        lecture.create(transaction).await?;
        for (order, video_id) in (0..).zip(video_ids.iter()) {
            insert_lecture_video(transaction, &id, video_id, order).await?;
        }
    }

    let curriculums: Vec<CurriculumBackup> = read_json(&restore_dir.join(CURRICULUMS_FILE))?;
    for CurriculumBackup {
        mut curriculum,
        lecture_ids,
    } in curriculums
    {
        let id = required_id(&curriculum)?;
        curriculum.create(transaction).await?;
        for (order, lecture_id) in (0..).zip(lecture_ids.iter()) {
            insert_curriculum_lecture(transaction, &id, lecture_id, order).await?;
        }
    }

    info!("Restored database from {}", restore_dir.to_string_lossy());
    Ok(())
}

/// Clear the database
pub async fn clear_db(transaction: &mut Transaction<'_, Sqlite>) -> Result<(), BackupRestoreError> {
    // Order important because of FOREIGN KEY constraints
    let tables = [
        "curriculum_lectures",
        "lecture_videos",
        "curriculums",
        "lectures",
        "videos",
    ];

    // Execute all the DELETE queries (not committed)
    for table in tables {
        sqlx::query(&format!("DELETE FROM {table};"))
            .execute(&mut **transaction)
            .await?;
    }
    Ok(())
}

fn required_id<T: HasIdAndTitle>(item: &T) -> Result<LecternId, BackupRestoreError> {
    item.id()
        .ok_or_else(|| BackupRestoreError::MissingId(item.title().to_string()))
}

/// Read a JSON list.  An empty file is an empty list.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, BackupRestoreError> {
    if std::fs::metadata(path)?.len() == 0 {
        warn!("Nothing to restore: {path:?} is empty");
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write a value as pretty JSON to a (new or truncated) file
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BackupRestoreError> {
    let json = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
