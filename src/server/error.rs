use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::SuggestError;

/// Detail returned for every 500; the real cause only goes to the log.
pub const INTERNAL_ERROR_DETAIL: &str = "internal processing error";

/// Errors as seen by HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid query parameter '{field}': {message}")]
    Validation {
        field: &'static str,
        kind: &'static str,
        message: String,
        input: Option<String>,
        min_length: Option<usize>,
    },

    #[error("Not Found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] SuggestError),
}

impl ApiError {
    pub fn missing(field: &'static str) -> Self {
        ApiError::Validation {
            field,
            kind: "missing",
            message: "Field required".to_string(),
            input: None,
            min_length: None,
        }
    }

    pub fn too_short(field: &'static str, input: String, min_length: usize) -> Self {
        ApiError::Validation {
            field,
            kind: "string_too_short",
            message: format!("String should have at least {min_length} characters"),
            input: Some(input),
            min_length: Some(min_length),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation {
                field,
                kind,
                message,
                input,
                min_length,
            } => {
                let mut item = json!({
                    "type": kind,
                    "loc": ["query", field],
                    "msg": message,
                    "input": input,
                });
                if let Some(min_length) = min_length {
                    item["ctx"] = json!({ "min_length": min_length });
                }
                json!({ "detail": [item] })
            }
            ApiError::NotFound => json!({ "detail": "Not Found" }),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                json!({ "detail": INTERNAL_ERROR_DETAIL })
            }
        };
        (status, Json(body)).into_response()
    }
}
