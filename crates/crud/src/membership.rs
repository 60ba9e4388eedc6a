// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Editing the ordered children of a parent: the persistence collaborator, the
//! reconciliation of an edited list with the database, and the edit session
//! that ties them together
//!

mod in_flight;
mod session;
mod store;

pub use in_flight::*;
pub use session::*;
pub use store::*;
