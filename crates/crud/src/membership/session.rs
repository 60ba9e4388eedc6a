// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Reconciling an edited membership with the database, and the edit session
//! the admin screens drive
//!

use crate::crud::CrudError;
use crate::membership::{CandidateFilter, InFlightSaves, MembershipStore};
use lectern_core::{
    ChildSnapshot, DragState, DropPosition, LecternId, Member, MemberKey, MembershipError,
    OrderWrites, OrderedMembers, ParentFields, Selection,
};
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// What a successful save wrote
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SaveReport {
    pub deleted: usize,
    pub inserted: usize,
    pub reordered: usize,
}

/// Write the difference between `members` and what's persisted: deletes first,
/// then inserts, then order updates.  Each completed operation is recorded in
/// `members`, so after a failure part of the plan may have been applied and
/// calling this again only runs what's left.
pub async fn reconcile<S, C>(
    store: &S,
    members: &mut OrderedMembers<C>,
    order_writes: OrderWrites,
) -> Result<SaveReport, CrudError>
where
    S: MembershipStore + ?Sized,
    C: ChildSnapshot + Send + Sync,
{
    let parent_id = members.parent_id();
    let plan = members.plan(order_writes);
    debug!(
        "Reconciling {parent_id}: {} to delete, {} to insert, {} to reorder",
        plan.to_delete.len(),
        plan.to_insert.len(),
        plan.to_reorder.len()
    );

    let mut report = SaveReport::default();

    for id in plan.to_delete {
        store.delete_member(id).await?;
        members.mark_deleted(id);
        report.deleted += 1;
    }

    for insert in plan.to_insert {
        let row = store
            .insert_member(parent_id, insert.child_id, insert.order)
            .await?;
        members.mark_inserted(insert.key, row.id, row.order);
        report.inserted += 1;
    }

    for update in plan.to_reorder {
        store.update_member_order(update.id, update.order).await?;
        members.mark_order_written(update.id, update.order);
        report.reordered += 1;
    }

    Ok(report)
}

/// Errors that can occur during an edit session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session couldn't be started
    #[error("Couldn't load the membership: {0}")]
    Load(CrudError),

    /// The save failed part way (the edits are kept, so it can be retried)
    #[error("Saving failed: {0}")]
    Save(String),

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Couldn't fetch the candidates: {0}")]
    Candidates(String),

    #[error("{0}")]
    Validation(#[from] MembershipError),
}

/// One admin's editing of one parent's children
pub struct EditSession<S: MembershipStore> {
    store: Arc<S>,
    members: OrderedMembers<S::Child>,
    drag: DragState,
    selection: Option<Selection<S::Child>>,
    order_writes: OrderWrites,
    in_flight: InFlightSaves,
}

impl<S: MembershipStore> EditSession<S> {
    /// Start editing: the parent must exist, and its members are read
    pub async fn load(store: Arc<S>, parent_id: LecternId) -> Result<Self, SessionError> {
        if !store.parent_exists(parent_id).await.map_err(SessionError::Load)? {
            return Err(SessionError::Load(CrudError::IdNotInDb));
        }
        let rows = store
            .list_members(parent_id)
            .await
            .map_err(SessionError::Load)?;
        Ok(Self {
            store,
            members: OrderedMembers::from_rows(parent_id, rows),
            drag: DragState::default(),
            selection: None,
            order_writes: OrderWrites::default(),
            in_flight: InFlightSaves::new(),
        })
    }

    /// Share the in-flight registry with other sessions (and the API), so that
    /// only one save per parent runs at a time
    pub fn with_in_flight(mut self, in_flight: InFlightSaves) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn with_order_writes(mut self, order_writes: OrderWrites) -> Self {
        self.order_writes = order_writes;
        self
    }

    pub fn parent_id(&self) -> LecternId {
        self.members.parent_id()
    }

    pub fn members(&self) -> &OrderedMembers<S::Child> {
        &self.members
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_in_flight(self.parent_id())
    }

    /// Throw away the working copy and read the persisted members again
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let parent_id = self.parent_id();
        let rows = self
            .store
            .list_members(parent_id)
            .await
            .map_err(SessionError::Load)?;
        self.members = OrderedMembers::from_rows(parent_id, rows);
        self.drag.cancel();
        Ok(())
    }

    pub fn remove(&mut self, key: &MemberKey) -> Option<Member<S::Child>> {
        self.members.remove(key)
    }

    /// Panics if either index is out of bounds
    pub fn move_item(&mut self, from_index: usize, to_index: usize, position: DropPosition) {
        self.members.move_item(from_index, to_index, position);
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn start_drag(&mut self, index: usize) {
        self.drag.start(index);
    }

    pub fn drag_over(&mut self, index: usize, pointer_y: f32, row_top: f32, row_height: f32) {
        self.drag.hover(index, pointer_y, row_top, row_height);
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Returns whether anything moved
    pub fn drop_drag(&mut self) -> bool {
        self.members.apply_drop(&mut self.drag)
    }

    /// Open the picker with all candidates that aren't members yet
    pub async fn open_selection(&mut self, filter: CandidateFilter) -> Result<(), SessionError> {
        let candidates = self
            .store
            .list_candidates(filter)
            .await
            .map_err(|error| SessionError::Candidates(error.to_string()))?;
        self.selection = Some(Selection::open(candidates, &self.members));
        Ok(())
    }

    pub fn selection(&self) -> Option<&Selection<S::Child>> {
        self.selection.as_ref()
    }

    /// Tick or untick a candidate.  Returns whether it's now ticked.
    pub fn toggle_candidate(&mut self, child_id: LecternId) -> bool {
        match &mut self.selection {
            Some(selection) => selection.toggle(child_id),
            None => false,
        }
    }

    /// Append the ticked candidates and close the picker.  Returns how many
    /// were added.
    pub fn confirm_selection(&mut self) -> usize {
        match self.selection.take() {
            Some(selection) => selection.confirm(&mut self.members),
            None => 0,
        }
    }

    pub fn cancel_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            selection.cancel();
        }
    }

    /// Save the members
    pub async fn save(&mut self) -> Result<SaveReport, SessionError> {
        self.save_with(None).await
    }

    /// Save the parent's own fields (if given), then the members
    pub async fn save_with(
        &mut self,
        fields: Option<&ParentFields>,
    ) -> Result<SaveReport, SessionError> {
        let parent_id = self.parent_id();
        let _ticket = self
            .in_flight
            .try_begin(parent_id)
            .ok_or(SessionError::SaveInFlight)?;

        if let Some(fields) = fields {
            self.store
                .update_parent(parent_id, fields)
                .await
                .map_err(|error| save_failed(parent_id, error))?;
        }

        reconcile(self.store.as_ref(), &mut self.members, self.order_writes)
            .await
            .map_err(|error| save_failed(parent_id, error))
    }
}

fn save_failed(parent_id: LecternId, error: CrudError) -> SessionError {
    warn!("Saving the members of {parent_id} failed: {error}");
    SessionError::Save(error.to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crud::{MembershipTable, fetch_member_child_ids, fetch_member_orders};
    use crate::membership::{CurriculumLectureStore, LectureVideoStore};
    use crate::test::*;
    use async_trait::async_trait;
    use lectern_core::{MembershipRow, Title, VideoSummary};
    use sqlx::{Pool, Sqlite};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn seeded(pool: &Pool<Sqlite>) {
        let mut transaction = pool.begin().await.unwrap();
        seed_db(&mut transaction).await;
        transaction.commit().await.unwrap();
    }

    async fn persisted_videos(pool: &Pool<Sqlite>, lecture_id: LecternId) -> Vec<LecternId> {
        let mut transaction = pool.begin().await.unwrap();
        fetch_member_child_ids(&mut transaction, MembershipTable::LectureVideos, &lecture_id)
            .await
            .unwrap()
    }

    async fn persisted_orders(pool: &Pool<Sqlite>, lecture_id: LecternId) -> Vec<u32> {
        let mut transaction = pool.begin().await.unwrap();
        fetch_member_orders(&mut transaction, MembershipTable::LectureVideos, &lecture_id)
            .await
            .unwrap()
    }

    fn dense(len: usize) -> Vec<u32> {
        (0..len as u32).collect()
    }

    /// Wraps a store, failing inserts once `inserts_left` reaches zero
    struct FlakyStore {
        inner: LectureVideoStore,
        inserts_left: AtomicUsize,
    }

    #[async_trait]
    impl MembershipStore for FlakyStore {
        type Child = VideoSummary;

        async fn parent_exists(&self, parent_id: LecternId) -> Result<bool, CrudError> {
            self.inner.parent_exists(parent_id).await
        }

        async fn list_members(
            &self,
            parent_id: LecternId,
        ) -> Result<Vec<MembershipRow<VideoSummary>>, CrudError> {
            self.inner.list_members(parent_id).await
        }

        async fn list_candidates(
            &self,
            filter: CandidateFilter,
        ) -> Result<Vec<VideoSummary>, CrudError> {
            self.inner.list_candidates(filter).await
        }

        async fn delete_member(&self, member_id: LecternId) -> Result<(), CrudError> {
            self.inner.delete_member(member_id).await
        }

        async fn insert_member(
            &self,
            parent_id: LecternId,
            child_id: LecternId,
            order: u32,
        ) -> Result<MembershipRow<VideoSummary>, CrudError> {
            let left = self.inserts_left.load(Ordering::SeqCst);
            if left == 0 {
                return Err(CrudError::DbError);
            }
            self.inserts_left.store(left - 1, Ordering::SeqCst);
            self.inner.insert_member(parent_id, child_id, order).await
        }

        async fn update_member_order(
            &self,
            member_id: LecternId,
            order: u32,
        ) -> Result<(), CrudError> {
            self.inner.update_member_order(member_id, order).await
        }

        async fn update_parent(
            &self,
            parent_id: LecternId,
            fields: &ParentFields,
        ) -> Result<(), CrudError> {
            self.inner.update_parent(parent_id, fields).await
        }
    }

    #[sqlx::test]
    async fn load_missing_parent(pool: Pool<Sqlite>) {
        let store = Arc::new(LectureVideoStore::new(pool));
        let result = EditSession::load(store, LecternId::new()).await;
        assert_eq!(result.err(), Some(SessionError::Load(CrudError::IdNotInDb)));
    }

    #[sqlx::test]
    async fn remove_add_move_then_save(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let lecture_id = seed_lecture_id(0);
        let store = Arc::new(LectureVideoStore::new(pool.clone()));
        let mut session = EditSession::load(store, lecture_id).await.unwrap();

        // [v0, v1, v2] → remove v1 → [v0, v2]
        let key = session.members().items()[1].key();
        assert!(session.remove(&key).is_some());

        // Add v4 (v0 is offered only once, being a member already)
        session.open_selection(CandidateFilter::default()).await.unwrap();
        let selection = session.selection().unwrap();
        assert!(
            !selection
                .available()
                .iter()
                .any(|video| video.child_id() == seed_video_id(0))
        );
        assert!(session.toggle_candidate(seed_video_id(4)));
        assert_eq!(session.confirm_selection(), 1);

        // [v0, v2, v4] → drag v4 above v0 → [v4, v0, v2]
        session.start_drag(2);
        session.drag_over(0, 1.0, 0.0, 40.0);
        assert!(session.drop_drag());

        let report = session.save().await.unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.reordered, 2);
        assert!(!session.is_saving());

        assert_eq!(
            persisted_videos(&pool, lecture_id).await,
            vec![seed_video_id(4), seed_video_id(0), seed_video_id(2)]
        );
        assert_eq!(persisted_orders(&pool, lecture_id).await, dense(3));
    }

    #[sqlx::test]
    async fn saving_twice_changes_nothing(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let lecture_id = seed_lecture_id(0);
        let store = Arc::new(LectureVideoStore::new(pool.clone()));
        let mut session = EditSession::load(store, lecture_id)
            .await
            .unwrap()
            .with_order_writes(OrderWrites::Changed);

        session.move_item(0, 2, DropPosition::Below);
        let first = session.save().await.unwrap();
        assert_eq!(first.reordered, 3);
        let after_first = persisted_videos(&pool, lecture_id).await;

        let second = session.save().await.unwrap();
        assert_eq!(second, SaveReport::default());
        assert_eq!(persisted_videos(&pool, lecture_id).await, after_first);
        assert!(!session.members().has_changes());
    }

    #[sqlx::test]
    async fn retry_after_failed_insert(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let lecture_id = seed_lecture_id(0);
        let store = Arc::new(FlakyStore {
            inner: LectureVideoStore::new(pool.clone()),
            inserts_left: AtomicUsize::new(1),
        });
        let mut session = EditSession::load(Arc::clone(&store), lecture_id)
            .await
            .unwrap();

        // [v0, v1, v2] → [v0, v2, v3, v4]
        let key = session.members().items()[1].key();
        session.remove(&key);
        session.open_selection(CandidateFilter::default()).await.unwrap();
        session.toggle_candidate(seed_video_id(3));
        session.toggle_candidate(seed_video_id(4));
        session.confirm_selection();

        // The delete and first insert go through, the second insert fails
        let error = session.save().await.unwrap_err();
        assert!(matches!(error, SessionError::Save(_)));
        assert!(!session.is_saving());
        assert_eq!(persisted_videos(&pool, lecture_id).await.len(), 3);

        // Nothing is rolled back, so the retry finishes the job
        store.inserts_left.store(usize::MAX, Ordering::SeqCst);
        let report = session.save().await.unwrap();
        assert_eq!(report.deleted, 0);
        assert_eq!(report.inserted, 1);

        let expected: Vec<LecternId> = session
            .members()
            .items()
            .iter()
            .map(Member::child_id)
            .collect();
        assert_eq!(persisted_videos(&pool, lecture_id).await, expected);
        assert_eq!(persisted_orders(&pool, lecture_id).await, dense(4));
    }

    #[sqlx::test]
    async fn one_save_per_parent(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let in_flight = InFlightSaves::new();
        let store = Arc::new(CurriculumLectureStore::new(pool));
        let curriculum_id = seed_curriculum_id(0);
        let mut session = EditSession::load(store, curriculum_id)
            .await
            .unwrap()
            .with_in_flight(in_flight.clone());

        let ticket = in_flight.try_begin(curriculum_id).unwrap();
        assert_eq!(session.save().await, Err(SessionError::SaveInFlight));
        drop(ticket);
        assert!(session.save().await.is_ok());
    }

    #[sqlx::test]
    async fn save_with_fields(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let curriculum_id = seed_curriculum_id(1);
        let store = Arc::new(CurriculumLectureStore::new(pool.clone()));
        let mut session = EditSession::load(Arc::clone(&store), curriculum_id)
            .await
            .unwrap();

        session.open_selection(CandidateFilter { listed_only: true }).await.unwrap();
        session.toggle_candidate(seed_lecture_id(1));
        session.toggle_candidate(seed_lecture_id(0));
        session.confirm_selection();

        let mut fields = ParentFields::titled(Title::from("심화 과정").unwrap());
        fields.is_published = true;
        let report = session.save_with(Some(&fields)).await.unwrap();
        assert_eq!(report.inserted, 2);

        // Reloading shows what was saved, in candidate (title) order
        session.refresh().await.unwrap();
        let children: Vec<LecternId> = session
            .members()
            .items()
            .iter()
            .map(Member::child_id)
            .collect();
        let candidates = store
            .list_candidates(CandidateFilter { listed_only: true })
            .await
            .unwrap();
        let expected: Vec<LecternId> = candidates
            .iter()
            .map(ChildSnapshot::child_id)
            .filter(|id| *id == seed_lecture_id(0) || *id == seed_lecture_id(1))
            .collect();
        assert_eq!(children, expected);
    }

    #[sqlx::test]
    async fn cancelled_drag_and_selection(pool: Pool<Sqlite>) {
        seeded(&pool).await;
        let store = Arc::new(LectureVideoStore::new(pool));
        let mut session = EditSession::load(store, seed_lecture_id(0)).await.unwrap();
        let before = session.members().clone();

        session.start_drag(0);
        session.drag_over(2, 30.0, 0.0, 40.0);
        session.cancel_drag();
        assert!(!session.drop_drag());

        session.open_selection(CandidateFilter::default()).await.unwrap();
        session.toggle_candidate(seed_video_id(4));
        session.cancel_selection();

        assert_eq!(session.members(), &before);
        assert!(session.selection().is_none());
        assert!(!session.drag().is_dragging());
    }
}
