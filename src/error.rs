use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the on-disk vector store.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Batch length mismatch: {ids} ids, {vectors} vectors, {metadatas} metadata entries, {documents} documents")]
    LengthMismatch {
        ids: usize,
        vectors: usize,
        metadatas: usize,
        documents: usize,
    },

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Vector for id '{0}' is empty")]
    EmptyVector(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Invalid collection name: '{0}'")]
    InvalidCollectionName(String),

    #[error("Collection file {path:?} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while reading the ingredient catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Ingredient catalog not found at: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read ingredient catalog at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ingredient catalog is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Service-level failures. The first five are fatal at startup; `QueryFailure`
/// only aborts the request that raised it.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Ingredient data unavailable: {0}")]
    DataUnavailable(#[from] CatalogError),

    #[error("Failed to load embedding model '{model}': {source}")]
    ModelLoad {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to encode ingredient documents: {0}")]
    Encoding(#[source] anyhow::Error),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(#[source] IndexError),

    #[error("Failed to write to vector index: {0}")]
    IndexWrite(#[source] IndexError),

    #[error("Search for '{term}' failed: {source}")]
    QueryFailure {
        term: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SuggestError {
    pub(crate) fn query(term: &str, source: impl Into<anyhow::Error>) -> Self {
        SuggestError::QueryFailure {
            term: term.to_string(),
            source: source.into(),
        }
    }
}
