use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
};
use foodgram_shared::Error;
use foodgram_user::{RegisterInput, SetPasswordInput, UserView};
use serde::{Deserialize, Serialize};

use super::{
    AppState,
    views::{self, SubscriptionResponse},
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{Params, PathId, Payload},
    pagination::{Paginated, pagination},
};

#[derive(Deserialize)]
pub struct RegisterAction {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisteredResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn register(
    State(app): State<AppState>,
    Payload(input): Payload<RegisterAction>,
) -> AppResult<(StatusCode, Json<RegisteredResponse>)> {
    let id = app
        .user_command
        .register(RegisterInput {
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            password: input.password,
        })
        .await?;

    let user = app.user_query.find(None, id).await?.ok_or(Error::NotFound)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list(
    State(app): State<AppState>,
    viewer: Option<AuthUser>,
    uri: Uri,
    Params(params): Params<PageParams>,
) -> AppResult<Json<Paginated<UserView>>> {
    let pagination = pagination(&app.config.pagination, params.page, params.limit);
    let page = app
        .user_query
        .list(viewer.map(|u| u.id), pagination)
        .await?;

    Ok(Json(Paginated::new(
        page,
        pagination,
        &app.config.server.base_url,
        &uri,
    )))
}

pub async fn detail(
    State(app): State<AppState>,
    viewer: Option<AuthUser>,
    PathId(id): PathId<i64>,
) -> AppResult<Json<UserView>> {
    let user = app
        .user_query
        .find(viewer.map(|u| u.id), id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok(Json(user))
}

pub async fn me(State(app): State<AppState>, user: AuthUser) -> AppResult<Json<UserView>> {
    let view = app
        .user_query
        .find(Some(user.id), user.id)
        .await?
        .ok_or(Error::NotFound)?;

    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct SetPasswordAction {
    pub current_password: String,
    pub new_password: String,
}

pub async fn set_password(
    State(app): State<AppState>,
    user: AuthUser,
    Payload(input): Payload<SetPasswordAction>,
) -> AppResult<StatusCode> {
    app.user_command
        .set_password(
            user.id,
            SetPasswordInput {
                current_password: input.current_password,
                new_password: input.new_password,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}

pub async fn subscriptions(
    State(app): State<AppState>,
    user: AuthUser,
    uri: Uri,
    Params(params): Params<SubscriptionParams>,
) -> AppResult<Json<Paginated<SubscriptionResponse>>> {
    let pagination = pagination(&app.config.pagination, params.page, params.limit);
    let page = app.user_query.subscriptions(user.id, pagination).await?;
    let count = page.count;

    let results = views::subscriptions(&app, page.results, params.recipes_limit).await?;

    Ok(Json(Paginated::new(
        foodgram_shared::Page { count, results },
        pagination,
        &app.config.server.base_url,
        &uri,
    )))
}

#[derive(Deserialize)]
pub struct RecipesLimitParams {
    pub recipes_limit: Option<u64>,
}

pub async fn subscribe(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
    Params(params): Params<RecipesLimitParams>,
) -> AppResult<(StatusCode, Json<SubscriptionResponse>)> {
    app.user_command.follow.subscribe(user.id, id).await?;

    let author = app
        .user_query
        .find(Some(user.id), id)
        .await?
        .ok_or(Error::NotFound)?;

    let mut responses = views::subscriptions(&app, vec![author], params.recipes_limit).await?;
    let response = responses
        .pop()
        .ok_or_else(|| anyhow::anyhow!("subscription representation missing"))?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn unsubscribe(
    State(app): State<AppState>,
    user: AuthUser,
    PathId(id): PathId<i64>,
) -> AppResult<StatusCode> {
    app.user_command.follow.unsubscribe(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
