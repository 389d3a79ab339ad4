use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri, header},
    response::IntoResponse,
};
use foodgram_recipe::{Filter, IngredientAmount, RecipeInput};
use foodgram_shared::Error;
use serde::Deserialize;

use super::{
    AppState,
    views::{self, RecipeResponse, RecipeShortResponse},
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{Params, PathId, Payload},
    media,
    pagination::{Paginated, pagination},
};

const SHOPPING_LIST_FILENAME: &str = "shopping_cart_list.txt";

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_list: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}

pub async fn list(
    State(app): State<AppState>,
    viewer: Option<AuthUser>,
    uri: Uri,
    Params(params): Params<ListParams>,
) -> AppResult<Json<Paginated<RecipeResponse>>> {
    let viewer = viewer.map(|u| u.id);
    let pagination = pagination(&app.config.pagination, params.page, params.limit);
    let filter = Filter {
        author: params.author,
        tags: params.tags,
        is_favorited: flag(params.is_favorited.as_deref()),
        is_in_shopping_list: flag(params.is_in_shopping_list.as_deref()),
    };

    let page = app.recipe_query.list(viewer, &filter, pagination).await?;
    let count = page.count;
    let results = views::recipes(&app, viewer, page.results).await?;

    Ok(Json(Paginated::new(
        foodgram_shared::Page { count, results },
        pagination,
        &app.config.server.base_url,
        &uri,
    )))
}

pub async fn detail(
    State(app): State<AppState>,
    viewer: Option<AuthUser>,
    PathId(id): PathId<i64>,
) -> AppResult<Json<RecipeResponse>> {
    let viewer = viewer.map(|u| u.id);
    let recipe = app
        .recipe_query
        .find(viewer, id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok(Json(views::recipe(&app, viewer, recipe).await?))
}

#[derive(Deserialize)]
pub struct RecipeAction {
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<i64>>,
    /// `data:image/<fmt>;base64,<payload>`
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

impl RecipeAction {
    fn into_input(self, image: Option<String>) -> RecipeInput {
        RecipeInput {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image,
            ingredients: self.ingredients,
            tags: self.tags,
        }
    }
}

/// Decodes and stores the uploaded image, if any. Returns its media path.
async fn store_image(app: &AppState, image: Option<&str>) -> AppResult<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };

    let decoded = media::decode_data_uri(image)?;

    Ok(Some(app.media.save(&decoded).await?))
}

pub async fn create(
    State(app): State<AppState>,
    user: AuthUser,
    Payload(input): Payload<RecipeAction>,
) -> AppResult<(StatusCode, Json<RecipeResponse>)> {
    let image = store_image(&app, input.image.as_deref()).await?;

    let id = match app
        .recipe_command
        .create(user.id, input.into_input(image.clone()))
        .await
    {
        Ok(id) => id,
        Err(err) => {
            if let Some(image) = image {
                app.media.remove(&image).await;
            }
            return Err(err.into());
        }
    };

    let recipe = app
        .recipe_query
        .find(Some(user.id), id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok((
        StatusCode::CREATED,
        Json(views::recipe(&app, Some(user.id), recipe).await?),
    ))
}

/// PATCH and PUT: absent scalar fields keep their value, associations are
/// always replaced.
pub async fn update(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
    Payload(input): Payload<RecipeAction>,
) -> AppResult<Json<RecipeResponse>> {
    let image = store_image(&app, input.image.as_deref()).await?;

    match app
        .recipe_command
        .update(user.id, id, input.into_input(image.clone()))
        .await
    {
        Ok(Some(replaced)) => app.media.remove(&replaced).await,
        Ok(None) => {}
        Err(err) => {
            if let Some(image) = image {
                app.media.remove(&image).await;
            }
            return Err(err.into());
        }
    }

    let recipe = app
        .recipe_query
        .find(Some(user.id), id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok(Json(views::recipe(&app, Some(user.id), recipe).await?))
}

pub async fn delete(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
) -> AppResult<StatusCode> {
    if let Some(image) = app.recipe_command.delete(user.id, id).await? {
        app.media.remove(&image).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn short(app: &AppState, id: i64) -> AppResult<(StatusCode, Json<RecipeShortResponse>)> {
    let recipe = app
        .recipe_query
        .find_short(id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(&app.media, recipe)),
    ))
}

pub async fn favorite(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
) -> AppResult<(StatusCode, Json<RecipeShortResponse>)> {
    app.recipe_command.favorite.save(user.id, id).await?;

    short(&app, id).await
}

pub async fn unfavorite(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
) -> AppResult<StatusCode> {
    app.recipe_command.favorite.unsave(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_shopping_list(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
) -> AppResult<(StatusCode, Json<RecipeShortResponse>)> {
    app.shopping_command.add(user.id, id).await?;

    short(&app, id).await
}

pub async fn remove_from_shopping_list(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
) -> AppResult<StatusCode> {
    app.shopping_command.remove(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_list(
    State(app): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let text = app.shopping_query.build(user.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={SHOPPING_LIST_FILENAME}"),
            ),
        ],
        text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert!(flag(Some("1")));
        assert!(flag(Some("true")));
        assert!(!flag(Some("0")));
        assert!(!flag(Some("")));
        assert!(!flag(None));
    }
}
