//! Database connection management and schema setup.

use crate::orm::{
    channel_subscriptions, channels, comment_likes, comments, users, video_likes, videos,
};
use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName, EntityTrait,
    Schema,
};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Open a database connection pool.
pub async fn connect(url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(url.to_owned());
    // An in-memory SQLite database exists per connection, so it must not be pooled.
    if url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(max_connections);
    }

    log::info!("Connecting to database ({} max connections)", max_connections);
    Database::connect(opts).await
}

/// Initialize the global connection pool.
///
/// Panics if the database is unreachable.
pub async fn init_db(url: String, max_connections: u32) {
    let db = connect(&url, max_connections)
        .await
        .expect("Failed to connect to database.");
    if DB_POOL.set(db).is_err() {
        log::warn!("init_db called more than once; keeping the first pool");
    }
}

/// Get the global connection pool.
///
/// Panics if `init_db` has not run.
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL
        .get()
        .expect("Database pool accessed before init_db.")
}

/// Create every table from the entity definitions, parents before children.
///
/// Existing tables are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, channels::Entity).await?;
    create_table(db, videos::Entity).await?;
    create_table(db, comments::Entity).await?;
    create_table(db, channel_subscriptions::Entity).await?;
    create_table(db, video_likes::Entity).await?;
    create_table(db, comment_likes::Entity).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    log::debug!("Creating table {}", entity.table_name());

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
