// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Row-level access to the ordered membership tables (`lecture_videos` &
//! `curriculum_lectures`), which have the same shape
//!

use crate::crud::common::*;
use lectern_core::LecternId;
use log::debug;
use sqlx::{Sqlite, Transaction};

/// Each variant maps to a membership table in the database
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MembershipTable {
    /// Videos in lectures
    LectureVideos,

    /// Lectures in curriculums
    CurriculumLectures,
}

impl MembershipTable {
    pub fn name(&self) -> &'static str {
        match self {
            MembershipTable::LectureVideos => "lecture_videos",
            MembershipTable::CurriculumLectures => "curriculum_lectures",
        }
    }

    pub fn parent_column(&self) -> &'static str {
        match self {
            MembershipTable::LectureVideos => "lecture_id",
            MembershipTable::CurriculumLectures => "curriculum_id",
        }
    }

    pub fn child_column(&self) -> &'static str {
        match self {
            MembershipTable::LectureVideos => "video_id",
            MembershipTable::CurriculumLectures => "lecture_id",
        }
    }
}

/// Insert one membership row
pub(crate) async fn insert_member_row(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    member_id: &LecternId,
    parent_id: &LecternId,
    child_id: &LecternId,
    order: u32,
) -> Result<(), CrudError> {
    debug!(
        "Inserting into {}: {member_id} ({parent_id} → {child_id}) at {order}",
        table.name()
    );
    sqlx::query(&format!(
        r#"
            INSERT INTO {} (id, {}, {}, position)
            VALUES (?, ?, ?, ?)
        "#,
        table.name(),
        table.parent_column(),
        table.child_column()
    ))
    .bind(member_id)
    .bind(parent_id)
    .bind(child_id)
    .bind(i64::from(order))
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Delete one membership row.  Deleting a row that's already gone is not an
/// error.
pub(crate) async fn delete_member_row(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    member_id: &LecternId,
) -> Result<RowsAffected, CrudError> {
    debug!("Deleting from {}: {member_id}", table.name());
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id=?", table.name()))
        .bind(member_id)
        .execute(&mut **transaction)
        .await?;
    Ok(result.rows_affected())
}

/// Set the order of one membership row
pub(crate) async fn update_member_row_order(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    member_id: &LecternId,
    order: u32,
) -> Result<(), CrudError> {
    debug!("Ordering in {}: {member_id} at {order}", table.name());
    let result = sqlx::query(&format!("UPDATE {} SET position = ? WHERE id = ?", table.name()))
        .bind(i64::from(order))
        .bind(member_id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() != 1 {
        Err(CrudError::MemberNotInDb)?
    }
    Ok(())
}

/// Delete all the membership rows of a parent
pub(crate) async fn delete_parent_member_rows(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    parent_id: &LecternId,
) -> Result<RowsAffected, CrudError> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE {}=?",
        table.name(),
        table.parent_column()
    ))
    .bind(parent_id)
    .execute(&mut **transaction)
    .await?;
    Ok(result.rows_affected())
}

/// Delete all the membership rows that reference a child, then renumber the
/// remaining rows of every parent it was in
pub(crate) async fn delete_child_member_rows(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    child_id: &LecternId,
) -> Result<RowsAffected, CrudError> {
    let parent_ids = sqlx::query_scalar::<_, LecternId>(&format!(
        "SELECT DISTINCT {} FROM {} WHERE {}=?",
        table.parent_column(),
        table.name(),
        table.child_column()
    ))
    .bind(child_id)
    .fetch_all(&mut **transaction)
    .await?;

    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE {}=?",
        table.name(),
        table.child_column()
    ))
    .bind(child_id)
    .execute(&mut **transaction)
    .await?;

    for parent_id in &parent_ids {
        renumber_member_rows(transaction, table, parent_id).await?;
    }
    Ok(result.rows_affected())
}

/// Rewrite a parent's orders as `0..N` keeping their current sequence
async fn renumber_member_rows(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    parent_id: &LecternId,
) -> Result<(), CrudError> {
    let member_ids = sqlx::query_scalar::<_, LecternId>(&format!(
        "SELECT id FROM {} WHERE {}=? ORDER BY position",
        table.name(),
        table.parent_column()
    ))
    .bind(parent_id)
    .fetch_all(&mut **transaction)
    .await?;

    for (order, member_id) in (0..).zip(member_ids.iter()) {
        update_member_row_order(transaction, table, member_id, order).await?;
    }
    Ok(())
}

/// The IDs of a parent's children, in order
pub async fn fetch_member_child_ids(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    parent_id: &LecternId,
) -> Result<Vec<LecternId>, CrudError> {
    Ok(sqlx::query_scalar::<_, LecternId>(&format!(
        "SELECT {} FROM {} WHERE {}=? ORDER BY position",
        table.child_column(),
        table.name(),
        table.parent_column()
    ))
    .bind(parent_id)
    .fetch_all(&mut **transaction)
    .await?)
}

/// The orders of a parent's membership rows, smallest first
pub async fn fetch_member_orders(
    transaction: &mut Transaction<'_, Sqlite>,
    table: MembershipTable,
    parent_id: &LecternId,
) -> Result<Vec<u32>, CrudError> {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT position FROM {} WHERE {}=? ORDER BY position",
        table.name(),
        table.parent_column()
    ))
    .bind(parent_id)
    .fetch_all(&mut **transaction)
    .await?
    .into_iter()
    .map(to_u32)
    .collect()
}
