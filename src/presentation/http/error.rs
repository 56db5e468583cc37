use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::auth::AuthError;
use crate::application::use_cases::documents::error::DocumentError;
use crate::application::use_cases::users::UserError;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "authentication required")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(MessageResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

// Extractor rejections are client input errors: always 400 with a JSON body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        let message = err.to_string();
        match err {
            DocumentError::NotFound => Self::new(StatusCode::NOT_FOUND, message),
            DocumentError::Forbidden => Self::new(StatusCode::FORBIDDEN, message),
            DocumentError::Invalid(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            DocumentError::Storage(e) => {
                tracing::error!(error = ?e, "document_storage_failed");
                Self::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            AuthError::EmailTaken => Self::new(StatusCode::CONFLICT, message),
            AuthError::InvalidCredentials => Self::new(StatusCode::UNAUTHORIZED, message),
            AuthError::Storage(e) => {
                tracing::error!(error = ?e, "auth_storage_failed");
                Self::internal()
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::NotFound => Self::new(StatusCode::NOT_FOUND, message),
            UserError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            UserError::EmailTaken => Self::new(StatusCode::CONFLICT, message),
            UserError::Storage(e) => {
                tracing::error!(error = ?e, "user_storage_failed");
                Self::internal()
            }
        }
    }
}
