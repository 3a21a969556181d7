//! Test database setup
#![allow(dead_code)]

use sea_orm::{DatabaseConnection, DbErr};

/// Fresh in-memory SQLite database with every table created.
///
/// Each call returns an isolated database, so tests can run in parallel.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let db = vod::db::connect("sqlite::memory:", 1).await?;
    vod::db::create_tables(&db).await?;
    Ok(db)
}
