// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! All CRUD functionality for [`Curriculum`]s, and for the lectures they hold
//!

use crate::crud::common::*;
use crate::crud::lecture::{LectureSummaryRow, is_lecture_id_in_db};
use crate::crud::member_tables::*;
use crate::crud::parent::*;
use lectern_core::{Curriculum, HasIdAndTitle, LectureSummary, LecternId, MembershipRow};
use sqlx::{FromRow, Sqlite, Transaction};

const TABLE: ParentTable = ParentTable::Curriculums;
const MEMBERS: MembershipTable = MembershipTable::CurriculumLectures;

impl Create for Curriculum {
    /// Create a [`Curriculum`] (without any lectures)
    async fn create(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError> {
        if self.id().is_none() {
            self.set_id(LecternId::new());
        }
        let id = self.id().ok_or_else(|| CrudError::IdNotSet(self.title().clone()))?;
        insert_parent(transaction, TABLE, &id, self.fields()).await
    }
}

impl FetchById for Curriculum {
    async fn fetch_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<Self, CrudError> {
        let (id, fields) = fetch_parent(transaction, TABLE, id).await?.into_parts();
        Ok(Curriculum::from(Some(id), fields))
    }
}

impl FetchAll for Curriculum {
    async fn fetch_all(transaction: &mut Transaction<'_, Sqlite>) -> Result<Vec<Self>, CrudError> {
        Ok(fetch_all_parents(transaction, TABLE)
            .await?
            .into_iter()
            .map(|row| {
                let (id, fields) = row.into_parts();
                Curriculum::from(Some(id), fields)
            })
            .collect())
    }
}

impl Update for Curriculum {
    async fn update(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError> {
        let id = self.id().ok_or_else(|| CrudError::IdNotSet(self.title().clone()))?;
        update_parent_fields(transaction, TABLE, &id, self.fields()).await
    }
}

impl DeleteById for Curriculum {
    async fn delete_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<(), CrudError> {
        delete_parent_member_rows(transaction, MEMBERS, id).await?;
        delete_parent(transaction, TABLE, id).await
    }
}

pub async fn is_curriculum_id_in_db(
    transaction: &mut Transaction<'_, Sqlite>,
    id: &LecternId,
) -> Result<bool, CrudError> {
    is_parent_id_in_db(transaction, TABLE, id).await
}

#[derive(FromRow)]
struct CurriculumLectureRow {
    member_id: LecternId,
    curriculum_id: LecternId,
    position: i64,
    #[sqlx(flatten)]
    lecture: LectureSummaryRow,
}

impl TryFrom<CurriculumLectureRow> for MembershipRow<LectureSummary> {
    type Error = CrudError;

    fn try_from(row: CurriculumLectureRow) -> Result<Self, Self::Error> {
        Ok(MembershipRow {
            id: row.member_id,
            parent_id: row.curriculum_id,
            order: to_u32(row.position)?,
            child: row.lecture.try_into()?,
        })
    }
}

const CURRICULUM_LECTURE_QUERY: &str = r#"
    SELECT
        curriculum_lectures.id AS member_id,
        curriculum_lectures.curriculum_id,
        curriculum_lectures.position,
        lectures.id,
        lectures.title,
        lectures.difficulty,
        lectures.is_published,
        (
            SELECT COUNT(*)
            FROM lecture_videos
            WHERE lecture_videos.lecture_id = lectures.id
        ) AS video_count
    FROM curriculum_lectures
    JOIN lectures ON curriculum_lectures.lecture_id = lectures.id
"#;

/// Fetch a curriculum's lectures, ordered by position
pub async fn fetch_curriculum_lectures(
    transaction: &mut Transaction<'_, Sqlite>,
    curriculum_id: &LecternId,
) -> Result<Vec<MembershipRow<LectureSummary>>, CrudError> {
    sqlx::query_as::<_, CurriculumLectureRow>(&format!(
        r#"
            {CURRICULUM_LECTURE_QUERY}
            WHERE curriculum_lectures.curriculum_id = ?
            ORDER BY curriculum_lectures.position
        "#
    ))
    .bind(curriculum_id)
    .fetch_all(&mut **transaction)
    .await?
    .into_iter()
    .map(MembershipRow::try_from)
    .collect()
}

/// Fetch a single `curriculum_lectures` row
pub async fn fetch_curriculum_lecture(
    transaction: &mut Transaction<'_, Sqlite>,
    member_id: &LecternId,
) -> Result<MembershipRow<LectureSummary>, CrudError> {
    sqlx::query_as::<_, CurriculumLectureRow>(&format!(
        r#"
            {CURRICULUM_LECTURE_QUERY}
            WHERE curriculum_lectures.id = ?
        "#
    ))
    .bind(member_id)
    .fetch_optional(&mut **transaction)
    .await?
    .ok_or(CrudError::MemberNotInDb)?
    .try_into()
}

/// Add a lecture to a curriculum at the given order
pub async fn insert_curriculum_lecture(
    transaction: &mut Transaction<'_, Sqlite>,
    curriculum_id: &LecternId,
    lecture_id: &LecternId,
    order: u32,
) -> Result<MembershipRow<LectureSummary>, CrudError> {
    if !is_curriculum_id_in_db(transaction, curriculum_id).await? {
        return Err(CrudError::CurriculumNotInDb);
    }
    if !is_lecture_id_in_db(transaction, lecture_id).await? {
        return Err(CrudError::LectureNotInDb);
    }
    let member_id = LecternId::new();
    insert_member_row(
        transaction,
        MEMBERS,
        &member_id,
        curriculum_id,
        lecture_id,
        order,
    )
    .await?;
    fetch_curriculum_lecture(transaction, &member_id).await
}

pub async fn delete_curriculum_lecture(
    transaction: &mut Transaction<'_, Sqlite>,
    member_id: &LecternId,
) -> Result<(), CrudError> {
    delete_member_row(transaction, MEMBERS, member_id).await?;
    Ok(())
}

pub async fn update_curriculum_lecture_order(
    transaction: &mut Transaction<'_, Sqlite>,
    member_id: &LecternId,
    order: u32,
) -> Result<(), CrudError> {
    update_member_row_order(transaction, MEMBERS, member_id, order).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::DatabaseRowCount;
    use crate::test::*;
    use lectern_core::{ChildSnapshot, ParentFields, Title};
    use sqlx::Pool;

    #[sqlx::test]
    async fn create_and_fetch_all(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;
        let before = Curriculum::fetch_all(&mut transaction).await.unwrap().len();

        let mut curriculum = Curriculum::from(
            None,
            ParentFields::titled(Title::from("웹 개발 로드맵").unwrap()),
        );
        curriculum.create(&mut transaction).await.unwrap();

        let all = Curriculum::fetch_all(&mut transaction).await.unwrap();
        assert_eq!(all.len(), before + 1);
        assert!(all.contains(&curriculum));
    }

    #[sqlx::test]
    async fn lectures_carry_video_counts(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let rows = fetch_curriculum_lectures(&mut transaction, &seed_curriculum_id(0))
            .await
            .unwrap();
        let children: Vec<LecternId> = rows.iter().map(|row| row.child.child_id()).collect();
        assert_eq!(children, vec![seed_lecture_id(0), seed_lecture_id(1)]);
        assert_eq!(rows[0].child.video_count(), 3);
        assert_eq!(rows[1].child.video_count(), 1);
    }

    #[sqlx::test]
    async fn insert_then_reorder(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let curriculum_id = seed_curriculum_id(0);
        let row = insert_curriculum_lecture(&mut transaction, &curriculum_id, &seed_lecture_id(2), 0)
            .await
            .unwrap();
        assert_eq!(row.parent_id, curriculum_id);
        assert_eq!(row.order, 0);

        update_curriculum_lecture_order(&mut transaction, &row.id, 5)
            .await
            .unwrap();
        let rows = fetch_curriculum_lectures(&mut transaction, &curriculum_id)
            .await
            .unwrap();
        assert_eq!(rows.last().unwrap().id, row.id);

        let missing = update_curriculum_lecture_order(&mut transaction, &LecternId::new(), 1).await;
        assert_eq!(missing, Err(CrudError::MemberNotInDb));
    }

    #[sqlx::test]
    async fn delete_member_twice(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let rows = fetch_curriculum_lectures(&mut transaction, &seed_curriculum_id(0))
            .await
            .unwrap();
        delete_curriculum_lecture(&mut transaction, &rows[0].id)
            .await
            .unwrap();
        delete_curriculum_lecture(&mut transaction, &rows[0].id)
            .await
            .unwrap();
        let remaining = fetch_curriculum_lectures(&mut transaction, &seed_curriculum_id(0))
            .await
            .unwrap();
        assert_eq!(remaining.len(), rows.len() - 1);
    }

    #[sqlx::test]
    async fn delete_keeps_lectures(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let before = DatabaseRowCount::all(&mut transaction).await.unwrap();
        Curriculum::delete_by_id(&mut transaction, &seed_curriculum_id(0))
            .await
            .unwrap();
        let after = DatabaseRowCount::all(&mut transaction).await.unwrap();
        assert_eq!(after.curriculums, before.curriculums - 1);
        assert_eq!(after.curriculum_lectures, before.curriculum_lectures - 2);
        assert_eq!(after.lectures, before.lectures);
    }
}
