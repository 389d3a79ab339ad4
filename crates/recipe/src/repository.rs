use std::collections::HashSet;

use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool, prelude::FromRow};

use crate::IngredientAmount;

#[derive(FromRow)]
pub struct RecipeRef {
    pub id: i64,
    pub author_id: i64,
    pub image: Option<String>,
}

pub(crate) async fn find(
    pool: &SqlitePool,
    id: i64,
) -> foodgram_shared::Result<Option<RecipeRef>> {
    let statement = Query::select()
        .columns([Recipe::Id, Recipe::AuthorId, Recipe::Image])
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, RecipeRef, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

/// Ids from `ids` that have no row in the ingredient table.
pub(crate) async fn missing_ingredients(
    pool: &SqlitePool,
    ids: &[i64],
) -> foodgram_shared::Result<Vec<i64>> {
    let statement = Query::select()
        .column(Ingredient::Id)
        .from(Ingredient::Table)
        .and_where(Expr::col(Ingredient::Id).is_in(ids.iter().copied()))
        .to_owned();

    missing(pool, statement, ids).await
}

pub(crate) async fn missing_tags(
    pool: &SqlitePool,
    ids: &[i64],
) -> foodgram_shared::Result<Vec<i64>> {
    let statement = Query::select()
        .column(Tag::Id)
        .from(Tag::Table)
        .and_where(Expr::col(Tag::Id).is_in(ids.iter().copied()))
        .to_owned();

    missing(pool, statement, ids).await
}

async fn missing(
    pool: &SqlitePool,
    statement: sea_query::SelectStatement,
    ids: &[i64],
) -> foodgram_shared::Result<Vec<i64>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let found = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect::<HashSet<_>>();

    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
}

pub(crate) struct CreateInput {
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i64,
}

pub(crate) async fn create(
    conn: &mut SqliteConnection,
    input: CreateInput,
) -> foodgram_shared::Result<i64> {
    let statement = Query::insert()
        .into_table(Recipe::Table)
        .columns([
            Recipe::AuthorId,
            Recipe::Name,
            Recipe::Text,
            Recipe::Image,
            Recipe::CookingTime,
            Recipe::CreatedAt,
        ])
        .values_panic([
            input.author_id.into(),
            input.name.into(),
            input.text.into(),
            input.image.into(),
            input.cooking_time.into(),
            foodgram_shared::now().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(result.last_insert_rowid())
}

#[derive(Default)]
pub(crate) struct UpdateInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
}

pub(crate) async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: UpdateInput,
) -> foodgram_shared::Result<()> {
    let mut statement = Query::update()
        .table(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .to_owned();

    let mut changed = false;

    if let Some(name) = input.name {
        statement.value(Recipe::Name, name);
        changed = true;
    }

    if let Some(text) = input.text {
        statement.value(Recipe::Text, text);
        changed = true;
    }

    if let Some(image) = input.image {
        statement.value(Recipe::Image, image);
        changed = true;
    }

    if let Some(cooking_time) = input.cooking_time {
        statement.value(Recipe::CookingTime, cooking_time);
        changed = true;
    }

    if !changed {
        return Ok(());
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

/// Clears the recipe's ingredient rows and writes `items` in their place.
pub(crate) async fn replace_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    items: &[IngredientAmount],
) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(RecipeIngredient::Table)
        .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if items.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for item in items {
        statement.values_panic([recipe_id.into(), item.id.into(), item.amount.into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn replace_tags(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tags: &[i64],
) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(RecipeTag::Table)
        .and_where(Expr::col(RecipeTag::RecipeId).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if tags.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(RecipeTag::Table)
        .columns([RecipeTag::RecipeId, RecipeTag::TagId])
        .to_owned();

    for tag_id in tags {
        statement.values_panic([recipe_id.into(), (*tag_id).into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

pub(crate) async fn delete(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<()> {
    let statement = Query::delete()
        .from_table(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
