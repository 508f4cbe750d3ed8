use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deckbuilder_core::CoreError;

use crate::api::dto::Failure;

const NOT_FOUND_MESSAGE: &str = "Deck not found";
const CATALOG_MESSAGE: &str = "Failed to fetch cards";
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    /// 400 with the validator's message verbatim.
    Validation(String),
    /// The body was refused before it could be read, e.g. 413 past the size limit.
    Rejected(StatusCode, String),
    NotFound,
    CatalogUnavailable(String),
    /// 500; the detail is logged, never sent.
    Internal(String),
}

impl ApiError {
    /// Maps an extractor rejection. Oversized bodies keep their 413; everything
    /// else is a malformed body and reads as a 400.
    pub fn from_rejection(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::Rejected(status, body_text)
        } else {
            ApiError::Validation(body_text)
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::Validation(msg),
            CoreError::NotFound(_) => ApiError::NotFound,
            CoreError::Storage(what) => ApiError::Internal(what.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Rejected(status, msg) => (status, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            ApiError::CatalogUnavailable(detail) => {
                tracing::error!(%detail, "card catalog fetch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, CATALOG_MESSAGE.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };
        (status, Json(Failure { success: false, message })).into_response()
    }
}
