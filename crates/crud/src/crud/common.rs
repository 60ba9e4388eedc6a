// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! CRUD traits and errors
//!

use lectern_core::{LecternId, MembershipError, Title, TitleError, VideoKey, VideoKeyError};
use sqlx::{Sqlite, Transaction};
use thiserror::Error;

/// Alias of u64
pub type RowsAffected = u64;

/// Implementing types can fetch all instances
#[allow(async_fn_in_trait)]
pub trait FetchAll: Sized {
    async fn fetch_all(transaction: &mut Transaction<'_, Sqlite>) -> Result<Vec<Self>, CrudError>;
}

/// Implementing types can be fetched using their [`LecternId`]
#[allow(async_fn_in_trait)]
pub trait FetchById: Sized {
    /// Fetch the thing using its [`LecternId`]
    async fn fetch_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<Self, CrudError>;
}

/// Implementing types can deleted using their [`LecternId`]
#[allow(async_fn_in_trait)]
pub trait DeleteById {
    /// Delete the thing using its [`LecternId`]
    async fn delete_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<(), CrudError>;
}

/// Implementing types can be created in the database
#[allow(async_fn_in_trait)]
pub trait Create {
    /// Create the data in the database
    async fn create(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError>;
}

/// Implementing types can be updated in the database
#[allow(async_fn_in_trait)]
pub trait Update {
    async fn update(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError>;
}

/// All errors that could occur when running CRUD operations
#[derive(Debug, Error, Clone, Hash, PartialEq, Eq)]
pub enum CrudError {
    #[error("{0}")]
    Title(#[from] TitleError),

    #[error("{0}")]
    VideoKey(#[from] VideoKeyError),

    #[error("{0}")]
    Membership(#[from] MembershipError),

    #[error("The ID field is not set for '{0}'")]
    IdNotSet(Title),

    #[error("The YouTube key '{0}' is already in use")]
    VideoKeyAlreadyInUse(VideoKey),

    #[error("Not unique in the database: {0}")]
    NotUniqueInDb(String),

    #[error("There was a error with the database")]
    DbError,

    #[error("SQLx database error: {0}")]
    SqlxDbError(String),

    #[error("Value out of range: {0}")]
    ValueOutOfRange(i64),

    #[error("The ID is not in the database")]
    IdNotInDb,

    #[error("The video is not in the database")]
    VideoNotInDb,

    #[error("The lecture is not in the database")]
    LectureNotInDb,

    #[error("The curriculum is not in the database")]
    CurriculumNotInDb,

    #[error("The membership row is not in the database")]
    MemberNotInDb,

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Database migration error: {0}")]
    DbMigrate(String),
}

impl CrudError {
    /// Whether the error means "the thing asked for doesn't exist"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CrudError::IdNotInDb
                | CrudError::VideoNotInDb
                | CrudError::LectureNotInDb
                | CrudError::CurriculumNotInDb
                | CrudError::MemberNotInDb
        )
    }
}

impl From<sqlx::Error> for CrudError {
    fn from(value: sqlx::Error) -> Self {
        if let Some(db_err) = value.as_database_error() {
            if db_err.is_unique_violation() {
                return CrudError::NotUniqueInDb(db_err.message().to_string());
            }
        }

        Self::SqlxDbError(value.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for CrudError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        CrudError::DbMigrate(value.to_string())
    }
}

impl From<std::io::Error> for CrudError {
    fn from(value: std::io::Error) -> Self {
        CrudError::Io(value.to_string())
    }
}

impl From<serde_json::Error> for CrudError {
    fn from(value: serde_json::Error) -> Self {
        CrudError::Json(value.to_string())
    }
}

/// SQLite hands back every integer as an `i64`
pub(crate) fn to_u32(value: i64) -> Result<u32, CrudError> {
    u32::try_from(value).map_err(|_| CrudError::ValueOutOfRange(value))
}

/// Check if the ID is in the given table
pub(crate) async fn is_id_in_table(
    transaction: &mut Transaction<'_, Sqlite>,
    table: &str,
    id: &LecternId,
) -> Result<bool, CrudError> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(id) FROM {table} WHERE id=?"))
        .bind(id)
        .fetch_one(&mut **transaction)
        .await?;
    Ok(count > 0)
}
