use std::{path::PathBuf, str::FromStr};

use foodgram_recipe::{IngredientAmount, RecipeInput, ingredient::ImportInput, tag};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<foodgram_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    let state = foodgram_shared::State::new(pool);

    tag::Command(state.clone())
        .create(tag::CreateInput {
            name: "Dinner".to_owned(),
            color: "#49B64E".to_owned(),
            slug: "dinner".to_owned(),
        })
        .await?;

    let items = [("salt", "g"), ("flour", "g"), ("milk", "ml"), ("salt", "pinch")]
        .into_iter()
        .map(|(name, unit)| ImportInput {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .collect();
    foodgram_recipe::ingredient::Command(state.clone())
        .import(items)
        .await?;

    Ok(state)
}

pub async fn create_user(state: &foodgram_shared::State, name: &str) -> anyhow::Result<i64> {
    let id = foodgram_user::Command::new(state.clone())
        .register(foodgram_user::RegisterInput {
            email: format!("{name}@foodgram.localhost"),
            username: name.to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?;

    Ok(id)
}

pub async fn create_recipe(
    state: &foodgram_shared::State,
    author: i64,
    name: &str,
    ingredients: &[(i64, i64)],
) -> anyhow::Result<i64> {
    let id = foodgram_recipe::Command::new(state.clone())
        .create(
            author,
            RecipeInput {
                name: Some(name.to_owned()),
                text: Some("Cook it.".to_owned()),
                cooking_time: Some(10),
                image: Some(format!("recipes/images/{name}.png")),
                ingredients: Some(
                    ingredients
                        .iter()
                        .map(|(id, amount)| IngredientAmount {
                            id: *id,
                            amount: *amount,
                        })
                        .collect(),
                ),
                tags: Some(vec![1]),
            },
        )
        .await?;

    Ok(id)
}
