use anyhow::Context;
use foodgram_recipe::{ingredient, tag};

/// Loads a JSON array of `{"name", "measurement_unit"}` objects.
#[tracing::instrument(skip(config))]
pub async fn import_ingredients(config: &foodgram::Config, path: &str) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    let items: Vec<ingredient::ImportInput> =
        serde_json::from_str(&raw).with_context(|| format!("invalid ingredient file {path}"))?;

    let pool = foodgram::create_pool(&config.database.url, 1).await?;
    let command = ingredient::Command(foodgram_shared::State::new(pool));

    let total = items.len();
    let imported = command.import(items).await?;

    tracing::info!(imported, skipped = total as u64 - imported, "import finished");

    Ok(())
}

pub async fn create_tag(
    config: &foodgram::Config,
    name: String,
    color: String,
    slug: String,
) -> anyhow::Result<()> {
    let pool = foodgram::create_pool(&config.database.url, 1).await?;
    let command = tag::Command(foodgram_shared::State::new(pool));

    let id = command
        .create(tag::CreateInput { name, color, slug })
        .await?;

    tracing::info!(tag = id, "tag created");

    Ok(())
}
