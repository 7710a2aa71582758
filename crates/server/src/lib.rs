use api_types::ApiResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;
use serde::Serialize;
use uuid::Uuid;

pub use auth::{AuthUser, Claims, JwtKeys};
pub use server::{ServerConfig, app, run_with_listener};

mod analytics;
mod auth;
mod budgets;
mod goals;
mod server;
mod transactions;
mod users;
mod wallets;

/// Error returned by every handler, rendered as an error envelope.
#[derive(Debug)]
pub enum ServerError {
    /// Failure of a read or of login. Keeps the natural status of the
    /// engine error (404 for a missing row, 401 for a foreign one).
    Engine(EngineError),
    /// Failure of a mutation, reported as 400 with the given code unless the
    /// storage layer failed.
    Failed(&'static str, EngineError),
    UserNotFound(String),
    Validation(String),
    InvalidId(String),
    Unauthorized(String),
    Internal(String),
}

impl ServerError {
    fn failed(code: &'static str) -> impl FnOnce(EngineError) -> Self {
        move |err| Self::Failed(code, err)
    }
}

fn status_for_engine_error(err: &EngineError) -> (StatusCode, &'static str) {
    match err {
        EngineError::Validation(_)
        | EngineError::ExistingKey(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::GoalCompleted(_)
        | EngineError::BusinessRule(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        EngineError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
        EngineError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        EngineError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        EngineError::KeyNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        EngineError::Password(_) | EngineError::Database(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

fn is_internal(err: &EngineError) -> bool {
    matches!(err, EngineError::Password(_) | EngineError::Database(_))
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            ServerError::Engine(err) => {
                let (status, code) = status_for_engine_error(&err);
                (status, code, err.to_string())
            }
            ServerError::Failed(code, err) => {
                if is_internal(&err) {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        err.to_string(),
                    )
                } else {
                    (StatusCode::BAD_REQUEST, code, err.to_string())
                }
            }
            ServerError::UserNotFound(message) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", message)
            }
            ServerError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            ServerError::InvalidId(message) => (StatusCode::BAD_REQUEST, "INVALID_ID", message),
            ServerError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
            }
            ServerError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {message}");
        }

        (status, Json(ApiResponse::<()>::err(code, message))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Validation(value.body_text())
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ServerError>;
type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ServerError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

fn created<T: Serialize>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

/// Parse a path segment as an id of the given entity.
fn parse_id(raw: &str, label: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::InvalidId(format!("invalid {label} id")))
}
