use anyhow::Context;
use env_logger::Env;
use sea_orm::{EntityTrait, PaginatorTrait};
use vod::db::{create_tables, get_db_pool, init_db};
use vod::orm::{channels, comments, videos};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_lib_mods();
    vod::app_config::init();

    let config = vod::app_config::get_config();
    let url = std::env::var("DATABASE_URL").unwrap_or(config.database.url);
    init_db(url, config.database.max_connections).await;

    create_tables(get_db_pool())
        .await
        .context("Failed to create tables")?;

    let storage =
        vod::storage::from_config(&config.storage).context("Failed to initialize storage")?;
    let store = vod::VodStore::new(get_db_pool().to_owned(), storage, config.media);

    let channel_count = channels::Entity::find().count(store.db()).await?;
    let video_count = videos::Entity::find().count(store.db()).await?;
    let comment_count = comments::Entity::find().count(store.db()).await?;
    log::info!(
        "Schema ready: {} channel(s), {} video(s), {} comment(s)",
        channel_count,
        video_count,
        comment_count
    );

    Ok(())
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    // A missing .env file is fine; the environment may already be set.
    if let Err(e) = dotenv::dotenv() {
        eprintln!("No .env loaded: {}", e);
    }
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
