use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use foodgram_shared::Error;
use serde_json::{Value, json};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

pub const NOT_FOUND: &str = "Not found.";
pub const FORBIDDEN: &str = "You do not have permission to perform this action.";
pub const UNAUTHORIZED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";
pub const SERVER_ERROR: &str = "Internal server error.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] Error),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => AppError::Domain(Error::NotFound),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Human readable text for a validator error without a custom message.
fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let param = |name: &str| err.params.get(name).map(Value::to_string);

    match err.code.as_ref() {
        "length" if param("value").is_some_and(|v| v == "\"\"") => {
            "This field may not be blank.".to_owned()
        }
        "length" => match (param("min"), param("max")) {
            (_, Some(max)) => format!("Ensure this field has no more than {max} characters."),
            (Some(min), None) => format!("Ensure this field has at least {min} characters."),
            _ => "Invalid length.".to_owned(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this value is between {min} and {max}."),
            _ => "Value out of range.".to_owned(),
        },
        "email" => "Enter a valid email address.".to_owned(),
        "regex" => "Enter a valid value.".to_owned(),
        code => format!("Invalid value ({code})."),
    }
}

/// `{"field": ["message", ...]}`, fields sorted for stable output.
pub fn validation_body(errors: &ValidationErrors) -> Value {
    let fields = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors.iter().map(describe).collect::<Vec<_>>();
            (field.to_string(), messages)
        })
        .collect::<BTreeMap<_, _>>();

    json!(fields)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Domain(Error::Validate(errors)) => {
                (StatusCode::BAD_REQUEST, validation_body(&errors))
            }
            AppError::Domain(Error::Conflict(message))
            | AppError::Domain(Error::Rejected(message)) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": message }))
            }
            AppError::Domain(Error::NotFound) => {
                (StatusCode::NOT_FOUND, json!({ "detail": NOT_FOUND }))
            }
            AppError::Domain(Error::Forbidden) => {
                (StatusCode::FORBIDDEN, json!({ "detail": FORBIDDEN }))
            }
            AppError::Unauthorized(detail) => {
                (StatusCode::UNAUTHORIZED, json!({ "detail": detail }))
            }
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, json!({ "detail": detail })),
            AppError::Domain(Error::Unknown(err)) | AppError::Internal(err) => {
                tracing::error!(err = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": SERVER_ERROR }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
