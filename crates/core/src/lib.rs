// SPDX-License-Identifier: MIT

//!
//! *Part of the wider Lectern project*
//!
//! This crate defines the basic datatypes used across the Lectern project
//! (database layer, web API), along with the ordered membership model used by
//! the admin screens to attach videos to lectures and lectures to curriculums:
//!
//! - [`OrderedMembers`] is the working copy of one parent's children
//! - [`reorder`] holds the drag & drop logic
//! - [`Selection`] is the picker that adds new children
//! - [`ReconcilePlan`] is what has to be written to the database on save
//!
//! This crate aims to provide APIs for each type so that if a type is
//! instantiated, the developer can be sure it's valid.  Nothing here talks to
//! the database.
//!

mod difficulty;
mod edit;
mod id;
mod membership;
mod parent;
mod reconcile;
pub mod reorder;
mod selection;
mod title;
mod video;

pub use difficulty::*;
pub use edit::*;
pub use id::*;
pub use membership::*;
pub use parent::*;
pub use reconcile::*;
pub use reorder::{DragMove, DragState, DropPosition};
pub use selection::*;
pub use title::*;
pub use video::*;

/// Mark that a type has both an [`LecternId`] and a [`Title`], and setup
/// getters and setters for both
pub trait HasIdAndTitle {
    /// Get the ID
    fn id(&self) -> Option<LecternId>;

    /// Set the ID - the [`LecternId`] passed in must have been initialised,
    /// and therefore is guaranteed to be valid
    fn set_id(&mut self, id: LecternId);

    /// Get the title
    fn title(&self) -> &Title;

    /// Set the title - the [`Title`] passed in must have been initialised, and
    /// therefore is guaranteed to be valid
    fn set_title(&mut self, title: Title);
}
