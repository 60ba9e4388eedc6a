// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider Lectern project*
//!
//! This crate provides the web API used by the admin front end.  Besides
//! plain CRUD for videos, lectures and curriculums, it serves the ordered
//! members of a parent along with the candidates that could be added, and
//! accepts an edited member list which it reconciles with the database.
//!

mod config;
mod error;
mod handlers;
mod helpers;
mod queries;

pub use config::*;
use error::*;
use queries::*;

use axum::Router;
use lectern_crud::InFlightSaves;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::{str::FromStr, sync::Arc};
use tower_http::trace::TraceLayer;

/// API access mode (read-only or read-write)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAccessMode {
    Read,
    ReadWrite,
}

/// What every handler has access to
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: Pool<Sqlite>,

    /// Parents with a member save running
    pub in_flight: InFlightSaves,
}

pub type SharedState = Arc<AppState>;

/// Set up the API
pub async fn prepare_api_router(config: &ApiConfig) -> Result<Router, sqlx::Error> {
    // Create connection options (whether the database is read-only or not)
    let db_url = lectern_crud::db_url_from_path(&config.database_path);
    let connect_options = SqliteConnectOptions::from_str(&db_url)?
        .read_only(config.access_mode() == ApiAccessMode::Read);

    // Create a pool with those options
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;

    Ok(api_router(pool, config.access_mode()))
}

/// The API over an already open pool
pub fn api_router(pool: Pool<Sqlite>, access_mode: ApiAccessMode) -> Router {
    let state = Arc::new(AppState {
        pool,
        in_flight: InFlightSaves::new(),
    });

    // Add the state
    let apiv1 = handlers::router(access_mode).with_state(state);

    // Add URL path prefix
    Router::new()
        .nest("/api/v1", apiv1)
        .layer(TraceLayer::new_for_http())
}
