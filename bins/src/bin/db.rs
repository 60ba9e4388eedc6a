// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider Lectern project*
//!
//! Basic management of Lectern databases (create, backup, restore, stats)
//!

use clap::{CommandFactory, Parser, ValueEnum, builder::PossibleValue};
use lectern_crud::{DatabaseRowCount, backup, db_url_from_path, restore, setup_database_at_path};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use sqlx::{Connection, SqliteConnection};
use std::path::{Path, PathBuf};

#[macro_use]
extern crate log;
extern crate simplelog;

/// Lectern database tool entry point
///
/// One of:
/// - Create (and migrate) the database
/// - Backup the database
/// - Restore the database
/// - Print the row counts
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("lectern")
        .build();
    CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Info,
        config_log,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])?;

    // Check the options
    let result = match (&args.cli_command, &args.database, &args.json) {
        //----------------------------------------------------------------------
        // Valid
        //----------------------------------------------------------------------
        (Command::Create, database, _) => setup_database_at_path(database)
            .await
            .map_err(Box::<dyn std::error::Error>::from),
        (Command::Backup, database, Some(json)) => run_backup(database, json).await,
        (Command::Restore, database, Some(json)) => run_restore(database, json).await,
        (Command::Stats, database, _) => print_stats(database).await,
        //----------------------------------------------------------------------
        // Invalid
        //----------------------------------------------------------------------
        _ => {
            eprintln!("CLI Error: invalid options (backup & restore need --json)");
            Cli::command().print_long_help()?;
            std::process::exit(1);
        }
    };

    if let Err(error) = result {
        error!("{:?} failed: {error}", args.cli_command);
        std::process::exit(1);
    }
    Ok(())
}

async fn connect(database: &Path) -> Result<SqliteConnection, sqlx::Error> {
    SqliteConnection::connect(&db_url_from_path(database)).await
}

async fn run_backup(database: &Path, json: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(json)?;
    let mut connection = connect(database).await?;
    let mut transaction = connection.begin().await?;
    backup(&mut transaction, json).await?;
    transaction.commit().await?;
    info!("Successfully backed up database");
    Ok(())
}

async fn run_restore(database: &Path, json: &Path) -> Result<(), Box<dyn std::error::Error>> {
    setup_database_at_path(database).await?;
    let mut connection = connect(database).await?;

    // Nothing is cleared unless everything restores
    let mut transaction = connection.begin().await?;
    restore(&mut transaction, json).await?;
    transaction.commit().await?;
    info!("Sucessfully restored database");
    Ok(())
}

async fn print_stats(database: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut connection = connect(database).await?;
    let mut transaction = connection.begin().await?;
    let counts = DatabaseRowCount::all(&mut transaction).await?;
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}

/// Lectern CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Lectern tool for basic database management",
    after_help = "This is intended for use when deploying to a server and in CI"
)]
pub struct Cli {
    // Database command
    #[arg(value_enum)]
    pub cli_command: Command,

    /// Path to the database
    #[arg(long)]
    pub database: PathBuf,

    /// Path to the dir that contains the JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Create,
    Backup,
    Restore,
    Stats,
}

impl ValueEnum for Command {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Create, Self::Backup, Self::Restore, Self::Stats]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Command::Create => {
                Some(PossibleValue::new("create").help("Create a new database at the path"))
            }
            Command::Backup => Some(
                PossibleValue::new("backup")
                    .help("Backup the database at path to JSON in dir at path"),
            ),
            Command::Restore => Some(
                PossibleValue::new("restore")
                    .help("Restore the database at path from JSON in dir at path"),
            ),
            Command::Stats => Some(PossibleValue::new("stats").help("Print database row counts")),
        }
    }
}
