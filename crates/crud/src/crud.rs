// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! CRUD videos, lectures, curriculums, and the ordered memberships between
//! them
//!

mod common;
mod curriculum;
mod lecture;
mod member_tables;
mod parent;
mod video;

pub use common::*;
pub use curriculum::*;
pub use lecture::*;
pub use member_tables::{MembershipTable, fetch_member_child_ids, fetch_member_orders};
pub use parent::{ParentTable, is_parent_id_in_db, update_parent_fields};
pub use video::*;
