use sqlx::migrate::MigrateDatabase;
use sqlx_migrator::{Migrate, Plan};

#[tracing::instrument(skip(config))]
pub async fn migrate(config: &foodgram::Config) -> anyhow::Result<()> {
    tracing::info!("Running database migrations...");

    let pool = foodgram::create_pool(&config.database.url, 1).await?;
    let mut conn = pool.acquire().await?;

    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    drop(conn);
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn reset(config: &foodgram::Config) -> anyhow::Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
