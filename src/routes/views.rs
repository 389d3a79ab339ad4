use std::collections::HashMap;

use foodgram_recipe::{Recipe, RecipeIngredientView, RecipeShort, tag::TagView};
use foodgram_user::UserView;
use serde::Serialize;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    media::MediaStorage,
};

#[derive(Debug, Serialize)]
pub struct RecipeShortResponse {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

impl RecipeShortResponse {
    pub fn new(media: &MediaStorage, recipe: RecipeShort) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image.map(|image| media.url(&image)),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagView>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_list: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i64,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

/// Full representations, authors resolved in one batch.
pub async fn recipes(
    app: &AppState,
    viewer: Option<i64>,
    recipes: Vec<Recipe>,
) -> AppResult<Vec<RecipeResponse>> {
    let mut author_ids = recipes.iter().map(|r| r.row.author_id).collect::<Vec<_>>();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors = app
        .user_query
        .find_many(viewer, &author_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect::<HashMap<_, _>>();

    recipes
        .into_iter()
        .map(|recipe| {
            let author_id = recipe.row.author_id;
            let author = match authors.get(&author_id) {
                Some(author) => author.clone(),
                None => anyhow::bail!("author {author_id} of recipe {} missing", recipe.row.id),
            };

            Ok(RecipeResponse {
                id: recipe.row.id,
                tags: recipe.tags,
                author,
                ingredients: recipe.ingredients,
                is_favorited: recipe.row.is_favorited,
                is_in_shopping_list: recipe.row.is_in_shopping_list,
                name: recipe.row.name,
                image: recipe.row.image.map(|image| app.media.url(&image)),
                text: recipe.row.text,
                cooking_time: recipe.row.cooking_time,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(AppError::from)
}

pub async fn recipe(app: &AppState, viewer: Option<i64>, recipe: Recipe) -> AppResult<RecipeResponse> {
    let mut responses = recipes(app, viewer, vec![recipe]).await?;

    responses
        .pop()
        .ok_or_else(|| anyhow::anyhow!("recipe representation missing").into())
}

/// Followed authors with their newest recipes, capped at `recipes_limit`.
pub async fn subscriptions(
    app: &AppState,
    users: Vec<UserView>,
    recipes_limit: Option<u64>,
) -> AppResult<Vec<SubscriptionResponse>> {
    let ids = users.iter().map(|user| user.id).collect::<Vec<_>>();

    let mut recipes = app.recipe_query.by_authors(&ids, recipes_limit).await?;
    let counts = app.recipe_query.count_by_authors(&ids).await?;

    Ok(users
        .into_iter()
        .map(|user| {
            let recipes = recipes
                .remove(&user.id)
                .unwrap_or_default()
                .into_iter()
                .map(|recipe| RecipeShortResponse::new(&app.media, recipe))
                .collect();

            SubscriptionResponse {
                recipes_count: counts.get(&user.id).copied().unwrap_or_default(),
                recipes,
                user,
            }
        })
        .collect())
}
