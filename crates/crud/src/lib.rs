// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider Lectern project*
//!
//! This library crate is responsible for all database interactions and
//! management for the Lectern project.  It does the following:
//!
//! - Enables CRUD (Create, Read, Update, Delete) operations on videos,
//!   lectures & curriculums
//! - Stores the ordered memberships (videos in lectures, lectures in
//!   curriculums) and reconciles edited memberships with the database
//! - Provides the edit session driven by the admin screens
//! - Provides helpers to get table row counts
//! - Backs up & restores the database to & from JSON
//!
//! This crate makes use of the basic Lectern `core` crate for primitive
//! types, and is itself used by the `www-api` crate and the binaries.
//!

mod backup;
mod crud;
mod db;
mod membership;
mod stats;

pub use backup::*;
pub use crud::*;
pub use db::*;
pub use membership::*;
pub use stats::*;
