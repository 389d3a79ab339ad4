use axum::{Json, extract::State, http::StatusCode};
use foodgram_user::LoginInput;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{auth::AuthUser, error::AppResult, extract::Payload};

#[derive(Deserialize)]
pub struct LoginAction {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

pub async fn login(
    State(app): State<AppState>,
    Payload(input): Payload<LoginAction>,
) -> AppResult<Json<TokenResponse>> {
    let credentials = app
        .user_command
        .login(LoginInput {
            email: input.email,
            password: input.password,
        })
        .await?;

    let auth_token =
        crate::auth::generate_token(&app.config.jwt, credentials.id, credentials.token_version)?;

    Ok(Json(TokenResponse { auth_token }))
}

pub async fn logout(State(app): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    app.user_command.logout(user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
