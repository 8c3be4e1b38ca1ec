use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::server::error::ApiError;
use crate::server::openapi::{openapi_document, DOCS_HTML};
use crate::state::AppContext;
use crate::suggest::{is_valid_term, SuggestionResponse, MIN_QUERY_LENGTH};

#[derive(Debug, Deserialize)]
struct SuggestionParams {
    termo: Option<String>,
}

/// The validated `termo` query parameter. Requests without one, or with one
/// shorter than [`MIN_QUERY_LENGTH`], are rejected with 422 before the
/// handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(pub String);

impl<S> FromRequestParts<S> for SearchTerm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) =
            Query::<SuggestionParams>::try_from_uri(&parts.uri).map_err(|rejection| {
                ApiError::Validation {
                    field: "termo",
                    kind: "query_parsing",
                    message: rejection.body_text(),
                    input: None,
                    min_length: None,
                }
            })?;

        match params.termo {
            None => Err(ApiError::missing("termo")),
            Some(term) if !is_valid_term(&term) => {
                Err(ApiError::too_short("termo", term, MIN_QUERY_LENGTH))
            }
            Some(term) => Ok(SearchTerm(term)),
        }
    }
}

/// `GET /sugestoes?termo=...`
pub async fn suggestions(
    State(ctx): State<Arc<AppContext>>,
    SearchTerm(term): SearchTerm,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let response = ctx.suggest(term).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub details: HealthDetails,
}

#[derive(Debug, Serialize)]
pub struct HealthDetails {
    pub model: String,
    pub db_status: &'static str,
    pub total_ingredientes: usize,
}

/// `GET /health`
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    let total = ctx.count();
    Json(HealthResponse {
        status: "online",
        details: HealthDetails {
            model: ctx.model_name().to_string(),
            db_status: if total > 0 { "ok" } else { "empty" },
            total_ingredientes: total,
        },
    })
}

/// `GET /docs`
pub async fn docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}

/// `GET /openapi.json`
pub async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
