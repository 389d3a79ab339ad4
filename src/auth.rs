use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::JwtConfig,
    error::{AppError, INVALID_TOKEN, UNAUTHORIZED},
    routes::AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub aud: String,
    pub exp: u64,
    pub iat: u64,
    pub iss: String,
    pub sub: String,
    /// Token version of the user when the token was issued.
    pub ver: i64,
}

pub fn generate_token(config: &JwtConfig, id: i64, version: i64) -> anyhow::Result<String> {
    let now = foodgram_shared::now().max(0) as u64;
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now + config.expiration_days * 24 * 60 * 60,
        iat: now,
        iss: config.issuer.to_owned(),
        sub: id.to_string(),
        ver: version,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn decode_token(config: &JwtConfig, token: &str) -> anyhow::Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// `Authorization: Token <jwt>` or `Authorization: Bearer <jwt>`.
fn bearer(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized(INVALID_TOKEN))?;

    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or(AppError::Unauthorized(INVALID_TOKEN))
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl AuthUser {
    async fn from_token(state: &AppState, token: &str) -> Result<Self, AppError> {
        let claims = decode_token(&state.config.jwt, token).map_err(|e| {
            tracing::debug!(err = %e, "rejected token");
            AppError::Unauthorized(INVALID_TOKEN)
        })?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN))?;

        let Some(user) = state.user_query.find_auth(id).await? else {
            return Err(AppError::Unauthorized(INVALID_TOKEN));
        };

        if user.token_version != claims.ver {
            tracing::debug!(user = id, "revoked token");
            return Err(AppError::Unauthorized(INVALID_TOKEN));
        }

        Ok(AuthUser {
            id: user.id,
            is_admin: user.is_admin(),
            username: user.username,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer(parts)? else {
            return Err(AppError::Unauthorized(UNAUTHORIZED));
        };

        AuthUser::from_token(state, token).await
    }
}

/// Anonymous access: no header means `None`, a bad token is still a 401.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer(parts)? else {
            return Ok(None);
        };

        AuthUser::from_token(state, token).await.map(Some)
    }
}
