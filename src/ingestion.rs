use crate::error::{CatalogError, SuggestError};
use crate::search::{Collection, Encoder, IngredientRecord, Metadata};

/// Collection the catalog is indexed into.
pub const COLLECTION_NAME: &str = "ingredients";

/// Metadata key holding the canonical ingredient name.
pub const NAME_FIELD: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// The collection already had entries; nothing was loaded or written.
    Skipped { existing: usize },
    Populated { inserted: usize },
}

/// Populates `collection` from the catalog, but only when it is empty.
///
/// `load_catalog` is invoked only when ingestion actually runs. Entries get ids
/// `"0".."N-1"` in catalog order and `{name}` metadata.
pub fn ingest_if_empty<F>(
    collection: &mut Collection,
    encoder: &dyn Encoder,
    load_catalog: F,
) -> Result<IngestionOutcome, SuggestError>
where
    F: FnOnce() -> Result<Vec<IngredientRecord>, CatalogError>,
{
    let existing = collection.count();
    if existing > 0 {
        tracing::info!(
            collection = collection.name(),
            existing,
            "Collection already populated, skipping ingestion"
        );
        return Ok(IngestionOutcome::Skipped { existing });
    }

    let records = load_catalog()?;
    if records.is_empty() {
        tracing::warn!(collection = collection.name(), "Ingredient catalog is empty");
        return Ok(IngestionOutcome::Populated { inserted: 0 });
    }

    let documents: Vec<String> = records.iter().map(IngredientRecord::document).collect();
    tracing::info!(count = documents.len(), "Encoding ingredient documents");
    let vectors = encoder
        .encode_batch(&documents)
        .map_err(SuggestError::Encoding)?;

    let ids: Vec<String> = (0..records.len()).map(|i| i.to_string()).collect();
    let metadatas: Vec<Metadata> = records
        .into_iter()
        .map(|record| Metadata::from([(NAME_FIELD.to_string(), serde_json::Value::String(record.name))]))
        .collect();

    let inserted = collection
        .insert(ids, vectors, metadatas, documents)
        .map_err(SuggestError::IndexWrite)?;

    tracing::info!(
        collection = collection.name(),
        inserted,
        "Collection populated with ingredients"
    );
    Ok(IngestionOutcome::Populated { inserted })
}
