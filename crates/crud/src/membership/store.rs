// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The persistence collaborator used when editing memberships, and its SQLite
//! implementations
//!

use crate::crud::*;
use async_trait::async_trait;
use lectern_core::{
    ChildSnapshot, LectureSummary, LecternId, MembershipRow, ParentFields, VideoSummary,
};
use sqlx::SqlitePool;

/// Restricts the candidates offered when adding children
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CandidateFilter {
    /// Only visible videos / published lectures
    pub listed_only: bool,
}

/// Storage of one kind of ordered parent → child membership
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// The snapshot of a child, as shown next to each member
    type Child: ChildSnapshot + Send + Sync + 'static;

    async fn parent_exists(&self, parent_id: LecternId) -> Result<bool, CrudError>;

    /// The parent's members, smallest order first
    async fn list_members(
        &self,
        parent_id: LecternId,
    ) -> Result<Vec<MembershipRow<Self::Child>>, CrudError>;

    /// Every child that could be added to a parent
    async fn list_candidates(&self, filter: CandidateFilter)
    -> Result<Vec<Self::Child>, CrudError>;

    async fn delete_member(&self, member_id: LecternId) -> Result<(), CrudError>;

    /// Insert a member.  The store assigns the new row's ID.
    async fn insert_member(
        &self,
        parent_id: LecternId,
        child_id: LecternId,
        order: u32,
    ) -> Result<MembershipRow<Self::Child>, CrudError>;

    async fn update_member_order(&self, member_id: LecternId, order: u32)
    -> Result<(), CrudError>;

    /// Overwrite the parent's own fields
    async fn update_parent(
        &self,
        parent_id: LecternId,
        fields: &ParentFields,
    ) -> Result<(), CrudError>;
}

/// Videos in lectures
#[derive(Clone, Debug)]
pub struct LectureVideoStore {
    pool: SqlitePool,
}

impl LectureVideoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for LectureVideoStore {
    type Child = VideoSummary;

    async fn parent_exists(&self, parent_id: LecternId) -> Result<bool, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let exists = is_lecture_id_in_db(&mut transaction, &parent_id).await?;
        transaction.commit().await?;
        Ok(exists)
    }

    async fn list_members(
        &self,
        parent_id: LecternId,
    ) -> Result<Vec<MembershipRow<VideoSummary>>, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let rows = fetch_lecture_videos(&mut transaction, &parent_id).await?;
        transaction.commit().await?;
        Ok(rows)
    }

    async fn list_candidates(&self, filter: CandidateFilter) -> Result<Vec<VideoSummary>, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let videos = fetch_video_summaries(&mut transaction, filter.listed_only).await?;
        transaction.commit().await?;
        Ok(videos)
    }

    async fn delete_member(&self, member_id: LecternId) -> Result<(), CrudError> {
        let mut transaction = self.pool.begin().await?;
        delete_lecture_video(&mut transaction, &member_id).await?;
        transaction.commit().await?;
        Ok(())
    }

    async fn insert_member(
        &self,
        parent_id: LecternId,
        child_id: LecternId,
        order: u32,
    ) -> Result<MembershipRow<VideoSummary>, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let row = insert_lecture_video(&mut transaction, &parent_id, &child_id, order).await?;
        transaction.commit().await?;
        Ok(row)
    }

    async fn update_member_order(&self, member_id: LecternId, order: u32) -> Result<(), CrudError> {
        let mut transaction = self.pool.begin().await?;
        update_lecture_video_order(&mut transaction, &member_id, order).await?;
        transaction.commit().await?;
        Ok(())
    }

    async fn update_parent(
        &self,
        parent_id: LecternId,
        fields: &ParentFields,
    ) -> Result<(), CrudError> {
        let mut transaction = self.pool.begin().await?;
        update_parent_fields(&mut transaction, ParentTable::Lectures, &parent_id, fields).await?;
        transaction.commit().await?;
        Ok(())
    }
}

/// Lectures in curriculums
#[derive(Clone, Debug)]
pub struct CurriculumLectureStore {
    pool: SqlitePool,
}

impl CurriculumLectureStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for CurriculumLectureStore {
    type Child = LectureSummary;

    async fn parent_exists(&self, parent_id: LecternId) -> Result<bool, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let exists = is_curriculum_id_in_db(&mut transaction, &parent_id).await?;
        transaction.commit().await?;
        Ok(exists)
    }

    async fn list_members(
        &self,
        parent_id: LecternId,
    ) -> Result<Vec<MembershipRow<LectureSummary>>, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let rows = fetch_curriculum_lectures(&mut transaction, &parent_id).await?;
        transaction.commit().await?;
        Ok(rows)
    }

    async fn list_candidates(
        &self,
        filter: CandidateFilter,
    ) -> Result<Vec<LectureSummary>, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let lectures = fetch_lecture_summaries(&mut transaction, filter.listed_only).await?;
        transaction.commit().await?;
        Ok(lectures)
    }

    async fn delete_member(&self, member_id: LecternId) -> Result<(), CrudError> {
        let mut transaction = self.pool.begin().await?;
        delete_curriculum_lecture(&mut transaction, &member_id).await?;
        transaction.commit().await?;
        Ok(())
    }

    async fn insert_member(
        &self,
        parent_id: LecternId,
        child_id: LecternId,
        order: u32,
    ) -> Result<MembershipRow<LectureSummary>, CrudError> {
        let mut transaction = self.pool.begin().await?;
        let row = insert_curriculum_lecture(&mut transaction, &parent_id, &child_id, order).await?;
        transaction.commit().await?;
        Ok(row)
    }

    async fn update_member_order(&self, member_id: LecternId, order: u32) -> Result<(), CrudError> {
        let mut transaction = self.pool.begin().await?;
        update_curriculum_lecture_order(&mut transaction, &member_id, order).await?;
        transaction.commit().await?;
        Ok(())
    }

    async fn update_parent(
        &self,
        parent_id: LecternId,
        fields: &ParentFields,
    ) -> Result<(), CrudError> {
        let mut transaction = self.pool.begin().await?;
        update_parent_fields(&mut transaction, ParentTable::Curriculums, &parent_id, fields)
            .await?;
        transaction.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::*;
    use sqlx::{Pool, Sqlite};

    async fn seeded(pool: &Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;
        transaction.commit().await.unwrap();
    }

    #[sqlx::test]
    async fn lecture_video_store(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let store = LectureVideoStore::new(pool);
        let lecture_id = seed_lecture_id(0);

        assert!(store.parent_exists(lecture_id).await.unwrap());
        assert!(!store.parent_exists(LecternId::new()).await.unwrap());

        let members = store.list_members(lecture_id).await.unwrap();
        assert_eq!(members.len(), 3);

        let all = store.list_candidates(CandidateFilter::default()).await.unwrap();
        let listed = store
            .list_candidates(CandidateFilter { listed_only: true })
            .await
            .unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(listed.len(), 5);

        let row = store
            .insert_member(lecture_id, seed_video_id(4), 3)
            .await
            .unwrap();
        assert_eq!(row.child.child_id(), seed_video_id(4));
        store.update_member_order(row.id, 7).await.unwrap();
        store.delete_member(members[0].id).await.unwrap();

        let members = store.list_members(lecture_id).await.unwrap();
        let orders: Vec<u32> = members.iter().map(|member| member.order).collect();
        assert_eq!(orders, vec![1, 2, 7]);
    }

    #[sqlx::test]
    async fn curriculum_lecture_store(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let store = CurriculumLectureStore::new(pool);
        let curriculum_id = seed_curriculum_id(1);

        assert!(store.list_members(curriculum_id).await.unwrap().is_empty());
        let listed = store
            .list_candidates(CandidateFilter { listed_only: true })
            .await
            .unwrap();
        assert!(listed.iter().all(|lecture| lecture.is_published()));

        let mut fields = ParentFields::titled(lectern_core::Title::from("새 이름").unwrap());
        fields.is_published = true;
        store.update_parent(curriculum_id, &fields).await.unwrap();

        let missing = store.update_parent(LecternId::new(), &fields).await;
        assert_eq!(missing, Err(CrudError::CurriculumNotInDb));
    }
}
