use serde::{Deserialize, Serialize};

use crate::error::SuggestError;
use crate::ingestion::NAME_FIELD;
use crate::search::{Collection, Encoder};

/// Shortest accepted search term, in characters.
pub const MIN_QUERY_LENGTH: usize = 2;

/// Upper bound on suggestions per response.
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(rename = "termo")]
    pub term: String,
    /// Nearest first. The same name may appear more than once.
    #[serde(rename = "sugestoes")]
    pub suggestions: Vec<String>,
    pub count: usize,
}

impl SuggestionResponse {
    pub fn new(term: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            term: term.into(),
            count: suggestions.len(),
            suggestions,
        }
    }
}

pub fn is_valid_term(term: &str) -> bool {
    term.chars().count() >= MIN_QUERY_LENGTH
}

/// Encodes `term` and returns the names of its nearest catalog entries.
/// Callers validate the term first.
pub fn suggest(
    encoder: &dyn Encoder,
    collection: &Collection,
    term: &str,
) -> Result<SuggestionResponse, SuggestError> {
    let embedding = encoder
        .encode_one(term)
        .map_err(|e| SuggestError::query(term, e))?;

    let hits = collection
        .query(&embedding, MAX_RESULTS)
        .map_err(|e| SuggestError::query(term, e))?;

    let suggestions = hits
        .into_iter()
        .map(|hit| {
            hit.fields
                .get(NAME_FIELD)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    SuggestError::query(
                        term,
                        anyhow::anyhow!("entry '{}' has no '{}' metadata", hit.id, NAME_FIELD),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(termo = term, count = suggestions.len(), "Suggestions computed");
    Ok(SuggestionResponse::new(term, suggestions))
}
