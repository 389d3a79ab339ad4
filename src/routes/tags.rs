use axum::{Json, extract::State};
use foodgram_recipe::tag::TagView;
use foodgram_shared::Error;

use super::AppState;
use crate::{error::AppResult, extract::PathId};

pub async fn list(State(app): State<AppState>) -> AppResult<Json<Vec<TagView>>> {
    Ok(Json(app.tag_query.list().await?))
}

pub async fn detail(
    State(app): State<AppState>,
    PathId(id): PathId<i64>,
) -> AppResult<Json<TagView>> {
    let tag = app.tag_query.find(id).await?.ok_or(Error::NotFound)?;

    Ok(Json(tag))
}
