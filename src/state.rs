use std::sync::Arc;

use crate::cli::Settings;
use crate::error::{IndexError, SuggestError};
use crate::ingestion::{ingest_if_empty, IngestionOutcome, COLLECTION_NAME};
use crate::search::{
    load_bundled_catalog, load_catalog_file, Collection, DistanceMetric, EmbeddingEngine, Encoder,
    VectorStore,
};
use crate::suggest::{suggest, SuggestionResponse};

/// Process-wide state built once at startup and shared by every request.
/// The collection is read-only from here on.
#[derive(Clone)]
pub struct AppContext {
    encoder: Arc<dyn Encoder>,
    collection: Arc<Collection>,
}

impl AppContext {
    pub fn new(encoder: Arc<dyn Encoder>, collection: Collection) -> Self {
        Self {
            encoder,
            collection: Arc::new(collection),
        }
    }

    /// Loads the model, opens the store and ingests the catalog if the
    /// collection is empty. Blocking; run it before accepting traffic.
    pub fn bootstrap(settings: &Settings) -> Result<(Self, IngestionOutcome), SuggestError> {
        let encoder = EmbeddingEngine::load(&settings.embedding_model, settings.model_cache_dir.as_deref())
            .map_err(|source| SuggestError::ModelLoad {
                model: settings.embedding_model.clone(),
                source,
            })?;

        let store = VectorStore::open(&settings.db_path).map_err(SuggestError::IndexUnavailable)?;
        let mut collection = store
            .get_or_create_collection(COLLECTION_NAME, DistanceMetric::Cosine)
            .map_err(SuggestError::IndexUnavailable)?;

        let outcome = ingest_if_empty(&mut collection, &encoder, || match &settings.catalog {
            Some(path) => load_catalog_file(path),
            None => load_bundled_catalog(),
        })?;

        if let Some(dim) = collection.dimension() {
            if dim != encoder.dimension() {
                return Err(SuggestError::IndexUnavailable(IndexError::DimensionMismatch {
                    expected: dim,
                    got: encoder.dimension(),
                }));
            }
        }

        Ok((Self::new(Arc::new(encoder), collection), outcome))
    }

    pub fn model_name(&self) -> &str {
        self.encoder.model_name()
    }

    pub fn count(&self) -> usize {
        self.collection.count()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Runs a suggestion query on the blocking pool. A panic inside the
    /// encoder only fails this request.
    pub async fn suggest(&self, term: String) -> Result<SuggestionResponse, SuggestError> {
        let encoder = Arc::clone(&self.encoder);
        let collection = Arc::clone(&self.collection);
        let join_term = term.clone();
        tokio::task::spawn_blocking(move || suggest(encoder.as_ref(), &collection, &term))
            .await
            .map_err(|e| SuggestError::query(&join_term, e))?
    }
}
