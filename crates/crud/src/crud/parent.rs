// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Code common to both parent aggregates (lectures & curriculums), whose
//! tables have the same columns
//!

use crate::crud::common::*;
use lectern_core::{Difficulty, LecternId, ParentFields, Title};
use sqlx::{FromRow, Sqlite, Transaction};

/// Each variant maps to a parent table in the database
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ParentTable {
    Lectures,
    Curriculums,
}

impl ParentTable {
    pub fn name(&self) -> &'static str {
        match self {
            ParentTable::Lectures => "lectures",
            ParentTable::Curriculums => "curriculums",
        }
    }

    /// The error returned when a parent can't be found in this table
    pub fn not_in_db(&self) -> CrudError {
        match self {
            ParentTable::Lectures => CrudError::LectureNotInDb,
            ParentTable::Curriculums => CrudError::CurriculumNotInDb,
        }
    }
}

/// A row of a parent table
#[derive(FromRow)]
pub(crate) struct ParentRow {
    pub(crate) id: LecternId,
    pub(crate) title: Title,
    pub(crate) description: String,
    pub(crate) difficulty: Difficulty,
    pub(crate) is_published: bool,
    pub(crate) is_featured: bool,
}

impl ParentRow {
    pub(crate) fn into_parts(self) -> (LecternId, ParentFields) {
        (
            self.id,
            ParentFields {
                title: self.title,
                description: self.description,
                difficulty: self.difficulty,
                is_published: self.is_published,
                is_featured: self.is_featured,
            },
        )
    }
}

/// Insert a parent's ID and fields
pub(crate) async fn insert_parent(
    transaction: &mut Transaction<'_, Sqlite>,
    table: ParentTable,
    id: &LecternId,
    fields: &ParentFields,
) -> Result<(), CrudError> {
    sqlx::query(&format!(
        r#"
            INSERT INTO {}
            (id, title, description, difficulty, is_published, is_featured)
            VALUES (?, ?, ?, ?, ?, ?)
        "#,
        table.name()
    ))
    .bind(id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.difficulty)
    .bind(fields.is_published)
    .bind(fields.is_featured)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Fetch one parent row
pub(crate) async fn fetch_parent(
    transaction: &mut Transaction<'_, Sqlite>,
    table: ParentTable,
    id: &LecternId,
) -> Result<ParentRow, CrudError> {
    sqlx::query_as::<_, ParentRow>(&format!(
        r#"
            SELECT id, title, description, difficulty, is_published, is_featured
            FROM {}
            WHERE id=?
        "#,
        table.name()
    ))
    .bind(id)
    .fetch_optional(&mut **transaction)
    .await?
    .ok_or_else(|| table.not_in_db())
}

/// Fetch every parent row, ordered by title
pub(crate) async fn fetch_all_parents(
    transaction: &mut Transaction<'_, Sqlite>,
    table: ParentTable,
) -> Result<Vec<ParentRow>, CrudError> {
    Ok(sqlx::query_as::<_, ParentRow>(&format!(
        r#"
            SELECT id, title, description, difficulty, is_published, is_featured
            FROM {}
            ORDER BY title
        "#,
        table.name()
    ))
    .fetch_all(&mut **transaction)
    .await?)
}

/// Overwrite a parent's editable fields
pub async fn update_parent_fields(
    transaction: &mut Transaction<'_, Sqlite>,
    table: ParentTable,
    id: &LecternId,
    fields: &ParentFields,
) -> Result<(), CrudError> {
    let result = sqlx::query(&format!(
        r#"
            UPDATE {}
            SET
                title = ?,
                description = ?,
                difficulty = ?,
                is_published = ?,
                is_featured = ?
            WHERE id = ?
        "#,
        table.name()
    ))
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.difficulty)
    .bind(fields.is_published)
    .bind(fields.is_featured)
    .bind(id)
    .execute(&mut **transaction)
    .await?;

    if result.rows_affected() != 1 {
        Err(table.not_in_db())?
    }
    Ok(())
}

/// Delete a parent's row (its membership rows must already be gone)
pub(crate) async fn delete_parent(
    transaction: &mut Transaction<'_, Sqlite>,
    table: ParentTable,
    id: &LecternId,
) -> Result<(), CrudError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id=?", table.name()))
        .bind(id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() != 1 {
        Err(table.not_in_db())?
    }
    Ok(())
}

/// Check if the [`LecternId`] is in the parent table
pub async fn is_parent_id_in_db(
    transaction: &mut Transaction<'_, Sqlite>,
    table: ParentTable,
    id: &LecternId,
) -> Result<bool, CrudError> {
    is_id_in_table(transaction, table.name(), id).await
}
