use axum::{Json, extract::State};
use foodgram_recipe::ingredient::IngredientView;
use foodgram_shared::Error;
use serde::Deserialize;

use super::AppState;
use crate::{
    error::AppResult,
    extract::{Params, PathId},
};

#[derive(Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Unpaginated, filtered by name prefix.
pub async fn list(
    State(app): State<AppState>,
    Params(params): Params<SearchParams>,
) -> AppResult<Json<Vec<IngredientView>>> {
    let ingredients = app
        .ingredient_query
        .search(params.search.as_deref())
        .await?;

    Ok(Json(ingredients))
}

pub async fn detail(
    State(app): State<AppState>,
    PathId(id): PathId<i64>,
) -> AppResult<Json<IngredientView>> {
    let ingredient = app
        .ingredient_query
        .find(id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok(Json(ingredient))
}
