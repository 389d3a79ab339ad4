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

    Ok(foodgram_shared::State::new(pool))
}

#[allow(dead_code)]
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

/// Seeds `breakfast` (id 1) and `dinner` (id 2) tags and a few ingredients.
#[allow(dead_code)]
pub async fn seed_catalog(state: &foodgram_shared::State) -> anyhow::Result<()> {
    let tags = tag::Command(state.clone());
    tags.create(tag::CreateInput {
        name: "Breakfast".to_owned(),
        color: "#E26C2D".to_owned(),
        slug: "breakfast".to_owned(),
    })
    .await?;
    tags.create(tag::CreateInput {
        name: "Dinner".to_owned(),
        color: "#49B64E".to_owned(),
        slug: "dinner".to_owned(),
    })
    .await?;

    let items = [("flour", "g"), ("milk", "ml"), ("salt", "g"), ("egg", "pcs")]
        .into_iter()
        .map(|(name, unit)| ImportInput {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .collect();

    foodgram_recipe::ingredient::Command(state.clone())
        .import(items)
        .await?;

    Ok(())
}

#[allow(dead_code)]
pub fn recipe_input(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> RecipeInput {
    RecipeInput {
        name: Some(name.to_owned()),
        text: Some(format!("How to cook {name}.")),
        cooking_time: Some(15),
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
        tags: Some(tags.to_vec()),
    }
}

#[allow(dead_code)]
pub async fn count_recipes(state: &foodgram_shared::State) -> anyhow::Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM recipe")
        .fetch_one(&state.read_db)
        .await?)
}
