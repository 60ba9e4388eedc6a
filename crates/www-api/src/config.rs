// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Lectern web API config
//!

use crate::ApiAccessMode;
use directories_next::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROJECT_QUALIFIER: &str = "org";
const ORG_NAME: &str = "Lectern";
const APPLICATION_NAME: &str = "Lectern";
const DEFAULT_DATABASE_FILE_NAME: &str = "lectern.sqlite";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:2408";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Errors that can occur when loading the config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't read the config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Couldn't work out the data directory (no home directory?)")]
    NoProjectDirs,
}

/// The config read from disk (any field may be left out)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path to the database
    pub database_path: PathBuf,

    /// Address & port to serve on
    pub bind_address: String,

    /// Serve only the GET routes, over a read-only connection
    pub read_only: bool,

    /// Size of the database pool
    pub max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_path: default_db_file_path().unwrap_or_else(|_| {
                PathBuf::from(DEFAULT_DATABASE_FILE_NAME)
            }),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            read_only: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ApiConfig {
    /// Load the config file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {path:?}");
        let data = fs::read_to_string(path)?;
        let config: ApiConfig = serde_json::from_str(&data)?;
        info!("Config loaded = {config:?}");
        Ok(config)
    }

    pub fn access_mode(&self) -> ApiAccessMode {
        if self.read_only {
            ApiAccessMode::Read
        } else {
            ApiAccessMode::ReadWrite
        }
    }
}

/// Get the project directories (e.g. where the database is stored)
#[cfg(debug_assertions)]
fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from(
        PROJECT_QUALIFIER,
        ORG_NAME,
        &format!("{APPLICATION_NAME} Dev"),
    )
    .ok_or(ConfigError::NoProjectDirs)
}

/// Get the project directories (e.g. where the database is stored)
#[cfg(not(debug_assertions))]
fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from(PROJECT_QUALIFIER, ORG_NAME, APPLICATION_NAME)
        .ok_or(ConfigError::NoProjectDirs)
}

/// Get the default path to the database
pub fn default_db_file_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?
        .data_dir()
        .to_path_buf()
        .join(DEFAULT_DATABASE_FILE_NAME))
}
