// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! All CRUD functionality for [`Lecture`]s, and for the videos they hold
//!

use crate::crud::common::*;
use crate::crud::member_tables::*;
use crate::crud::parent::*;
use crate::crud::video::{VideoSummaryRow, is_video_id_in_db};
use lectern_core::{
    Difficulty, HasIdAndTitle, Lecture, LectureSummary, LecternId, MembershipRow, Title,
    VideoSummary,
};
use sqlx::{FromRow, Sqlite, Transaction};

const TABLE: ParentTable = ParentTable::Lectures;
const MEMBERS: MembershipTable = MembershipTable::LectureVideos;

impl Create for Lecture {
    /// Create a [`Lecture`] (without any videos)
    async fn create(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError> {
        if self.id().is_none() {
            self.set_id(LecternId::new());
        }
        let id = self.id().ok_or_else(|| CrudError::IdNotSet(self.title().clone()))?;
        insert_parent(transaction, TABLE, &id, self.fields()).await
    }
}

impl FetchById for Lecture {
    async fn fetch_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<Self, CrudError> {
        let (id, fields) = fetch_parent(transaction, TABLE, id).await?.into_parts();
        Ok(Lecture::from(Some(id), fields))
    }
}

impl FetchAll for Lecture {
    async fn fetch_all(transaction: &mut Transaction<'_, Sqlite>) -> Result<Vec<Self>, CrudError> {
        Ok(fetch_all_parents(transaction, TABLE)
            .await?
            .into_iter()
            .map(|row| {
                let (id, fields) = row.into_parts();
                Lecture::from(Some(id), fields)
            })
            .collect())
    }
}

impl Update for Lecture {
    /// Update a [`Lecture`]'s own fields (its videos are left untouched)
    async fn update(&mut self, transaction: &mut Transaction<'_, Sqlite>) -> Result<(), CrudError> {
        let id = self.id().ok_or_else(|| CrudError::IdNotSet(self.title().clone()))?;
        update_parent_fields(transaction, TABLE, &id, self.fields()).await
    }
}

impl DeleteById for Lecture {
    async fn delete_by_id(
        transaction: &mut Transaction<'_, Sqlite>,
        id: &LecternId,
    ) -> Result<(), CrudError> {
        delete_parent_member_rows(transaction, MEMBERS, id).await?;
        delete_child_member_rows(transaction, MembershipTable::CurriculumLectures, id).await?;

        // This must come last in order to satisfy FOREIGN KEY constraints
        delete_parent(transaction, TABLE, id).await
    }
}

/// Check if the [`LecternId`] is a lecture ID in the database
pub async fn is_lecture_id_in_db(
    transaction: &mut Transaction<'_, Sqlite>,
    id: &LecternId,
) -> Result<bool, CrudError> {
    is_parent_id_in_db(transaction, TABLE, id).await
}

/// The columns a [`LectureSummary`] is built from
#[derive(FromRow)]
pub(crate) struct LectureSummaryRow {
    pub(crate) id: LecternId,
    pub(crate) title: Title,
    pub(crate) difficulty: Difficulty,
    pub(crate) is_published: bool,
    pub(crate) video_count: i64,
}

impl TryFrom<LectureSummaryRow> for LectureSummary {
    type Error = CrudError;

    fn try_from(row: LectureSummaryRow) -> Result<Self, Self::Error> {
        Ok(LectureSummary::from(
            row.id,
            row.title,
            row.difficulty,
            row.is_published,
            to_u32(row.video_count)?,
        ))
    }
}

/// Fetch the summaries of all lectures (optionally only the published ones),
/// ordered by title.  These are the candidates offered when building a
/// curriculum.
pub async fn fetch_lecture_summaries(
    transaction: &mut Transaction<'_, Sqlite>,
    published_only: bool,
) -> Result<Vec<LectureSummary>, CrudError> {
    sqlx::query_as::<_, LectureSummaryRow>(
        r#"
            SELECT
                lectures.id,
                lectures.title,
                lectures.difficulty,
                lectures.is_published,
                (
                    SELECT COUNT(*)
                    FROM lecture_videos
                    WHERE lecture_videos.lecture_id = lectures.id
                ) AS video_count
            FROM lectures
            WHERE lectures.is_published = 1 OR ? = 0
            ORDER BY lectures.title
        "#,
    )
    .bind(published_only)
    .fetch_all(&mut **transaction)
    .await?
    .into_iter()
    .map(LectureSummary::try_from)
    .collect()
}

/// A `lecture_videos` row joined with its video
#[derive(FromRow)]
struct LectureVideoRow {
    member_id: LecternId,
    lecture_id: LecternId,
    position: i64,
    #[sqlx(flatten)]
    video: VideoSummaryRow,
}

impl TryFrom<LectureVideoRow> for MembershipRow<VideoSummary> {
    type Error = CrudError;

    fn try_from(row: LectureVideoRow) -> Result<Self, Self::Error> {
        Ok(MembershipRow {
            id: row.member_id,
            parent_id: row.lecture_id,
            order: to_u32(row.position)?,
            child: row.video.try_into()?,
        })
    }
}

const LECTURE_VIDEO_COLUMNS: &str = r#"
    lecture_videos.id AS member_id,
    lecture_videos.lecture_id,
    lecture_videos.position,
    videos.id,
    videos.title,
    videos.difficulty,
    videos.duration_seconds
"#;

/// Fetch a lecture's videos, ordered by position
pub async fn fetch_lecture_videos(
    transaction: &mut Transaction<'_, Sqlite>,
    lecture_id: &LecternId,
) -> Result<Vec<MembershipRow<VideoSummary>>, CrudError> {
    sqlx::query_as::<_, LectureVideoRow>(&format!(
        r#"
            SELECT {LECTURE_VIDEO_COLUMNS}
            FROM lecture_videos
            JOIN videos ON lecture_videos.video_id = videos.id
            WHERE lecture_videos.lecture_id = ?
            ORDER BY lecture_videos.position
        "#
    ))
    .bind(lecture_id)
    .fetch_all(&mut **transaction)
    .await?
    .into_iter()
    .map(MembershipRow::try_from)
    .collect()
}

/// Fetch a single `lecture_videos` row
pub async fn fetch_lecture_video(
    transaction: &mut Transaction<'_, Sqlite>,
    member_id: &LecternId,
) -> Result<MembershipRow<VideoSummary>, CrudError> {
    sqlx::query_as::<_, LectureVideoRow>(&format!(
        r#"
            SELECT {LECTURE_VIDEO_COLUMNS}
            FROM lecture_videos
            JOIN videos ON lecture_videos.video_id = videos.id
            WHERE lecture_videos.id = ?
        "#
    ))
    .bind(member_id)
    .fetch_optional(&mut **transaction)
    .await?
    .ok_or(CrudError::MemberNotInDb)?
    .try_into()
}

/// Add a video to a lecture at the given order.  The new row's ID is
/// generated here.
pub async fn insert_lecture_video(
    transaction: &mut Transaction<'_, Sqlite>,
    lecture_id: &LecternId,
    video_id: &LecternId,
    order: u32,
) -> Result<MembershipRow<VideoSummary>, CrudError> {
    if !is_lecture_id_in_db(transaction, lecture_id).await? {
        return Err(CrudError::LectureNotInDb);
    }
    if !is_video_id_in_db(transaction, video_id).await? {
        return Err(CrudError::VideoNotInDb);
    }
    let member_id = LecternId::new();
    insert_member_row(transaction, MEMBERS, &member_id, lecture_id, video_id, order).await?;
    fetch_lecture_video(transaction, &member_id).await
}

/// Remove a video from a lecture using the membership row's ID
pub async fn delete_lecture_video(
    transaction: &mut Transaction<'_, Sqlite>,
    member_id: &LecternId,
) -> Result<(), CrudError> {
    delete_member_row(transaction, MEMBERS, member_id).await?;
    Ok(())
}

/// Set the order of a video within its lecture
pub async fn update_lecture_video_order(
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
    use lectern_core::{ChildSnapshot, ParentFields};
    use sqlx::Pool;

    #[sqlx::test]
    async fn create_fetch_update(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();

        let mut lecture = Lecture::from(
            None,
            ParentFields::titled(Title::from("알고리즘 기초").unwrap()),
        );
        lecture.create(&mut transaction).await.unwrap();
        let id = lecture.id().unwrap();

        let mut fields = lecture.fields().clone();
        fields.is_published = true;
        fields.difficulty = Difficulty::Intermediate;
        lecture.set_fields(fields);
        lecture.update(&mut transaction).await.unwrap();

        let fetched = Lecture::fetch_by_id(&mut transaction, &id).await.unwrap();
        assert_eq!(fetched, lecture);
    }

    #[sqlx::test]
    async fn fetch_not_in_db(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        let result = Lecture::fetch_by_id(&mut transaction, &LecternId::new()).await;
        assert_eq!(result, Err(CrudError::LectureNotInDb));
    }

    #[sqlx::test]
    async fn videos_in_order(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let lecture_id = seed_lecture_id(0);
        let rows = fetch_lecture_videos(&mut transaction, &lecture_id)
            .await
            .unwrap();
        let orders: Vec<u32> = rows.iter().map(|row| row.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(rows.iter().all(|row| row.parent_id == lecture_id));

        let child_ids: Vec<LecternId> = rows.iter().map(|row| row.child.child_id()).collect();
        let seeded = fetch_member_child_ids(&mut transaction, MEMBERS, &lecture_id)
            .await
            .unwrap();
        assert_eq!(child_ids, seeded);
    }

    #[sqlx::test]
    async fn insert_video_checks_both_ends(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let result =
            insert_lecture_video(&mut transaction, &LecternId::new(), &seed_video_id(0), 0).await;
        assert_eq!(result, Err(CrudError::LectureNotInDb));

        let result =
            insert_lecture_video(&mut transaction, &seed_lecture_id(0), &LecternId::new(), 0).await;
        assert_eq!(result, Err(CrudError::VideoNotInDb));

        // Already a member
        let existing = fetch_lecture_videos(&mut transaction, &seed_lecture_id(0))
            .await
            .unwrap();
        let video_id = existing[0].child.child_id();
        let result = insert_lecture_video(&mut transaction, &seed_lecture_id(0), &video_id, 9).await;
        assert!(matches!(result, Err(CrudError::NotUniqueInDb(_))));
    }

    #[sqlx::test]
    async fn summaries_count_videos(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let summaries = fetch_lecture_summaries(&mut transaction, false)
            .await
            .unwrap();
        let first = summaries
            .iter()
            .find(|summary| summary.child_id() == seed_lecture_id(0))
            .unwrap();
        assert_eq!(first.video_count(), 3);

        let published = fetch_lecture_summaries(&mut transaction, true).await.unwrap();
        assert!(published.iter().all(|summary| summary.is_published()));
        assert!(published.len() < summaries.len());
    }

    #[sqlx::test]
    async fn delete_removes_memberships(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;

        let before = DatabaseRowCount::all(&mut transaction).await.unwrap();
        Lecture::delete_by_id(&mut transaction, &seed_lecture_id(0))
            .await
            .unwrap();
        let after = DatabaseRowCount::all(&mut transaction).await.unwrap();
        assert_eq!(after.lectures, before.lectures - 1);
        assert_eq!(after.lecture_videos, before.lecture_videos - 3);
        assert_eq!(after.curriculum_lectures, before.curriculum_lectures - 1);
        assert_eq!(after.videos, before.videos);

        let deleted_again = Lecture::delete_by_id(&mut transaction, &seed_lecture_id(0)).await;
        assert_eq!(deleted_again, Err(CrudError::LectureNotInDb));
    }

    #[sqlx::test]
    async fn delete_keeps_curriculum_orders_dense(pool: Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;
        let curriculum_id = seed_curriculum_id(0);

        Lecture::delete_by_id(&mut transaction, &seed_lecture_id(0))
            .await
            .unwrap();

        let table = MembershipTable::CurriculumLectures;
        let orders = fetch_member_orders(&mut transaction, table, &curriculum_id)
            .await
            .unwrap();
        assert_eq!(orders, vec![0]);
        let lecture_ids = fetch_member_child_ids(&mut transaction, table, &curriculum_id)
            .await
            .unwrap();
        assert_eq!(lecture_ids, vec![seed_lecture_id(1)]);
    }
}
