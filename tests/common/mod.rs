#![allow(dead_code)]

use anyhow::{anyhow, Result};
use ingredient_suggest::ingestion::{ingest_if_empty, COLLECTION_NAME};
use ingredient_suggest::search::data_loader::parse_catalog;
use ingredient_suggest::search::{DistanceMetric, Encoder, VectorStore};
use ingredient_suggest::state::AppContext;
use std::sync::Arc;
use tempfile::TempDir;

pub const DIM: usize = 64;

/// Small catalog used by most tests.
pub const CATALOG: &str = r#"[
    {"nome": "leite", "sinonimos": ["leite de vaca", "leite integral"]},
    {"nome": "leite de coco", "sinonimos": ["leite de côco"]},
    {"nome": "arroz", "sinonimos": ["arroz branco"]},
    {"nome": "feijão", "sinonimos": ["feijao", "feijão carioca"]},
    {"nome": "tomate", "sinonimos": ["tomate italiano"]},
    {"nome": "ovo", "sinonimos": ["ovos", "ovo de galinha"]},
    {"nome": "açúcar", "sinonimos": ["acucar", "açúcar refinado"]}
]"#;

/// Hashes character trigrams of the ingredient name into a fixed-size
/// vector. Only the part before `" | "` is used, so a query equal to a
/// catalog name lands exactly on its entry.
pub struct TrigramEncoder;

impl TrigramEncoder {
    fn embed(text: &str) -> Vec<f32> {
        let name = text.split(" | ").next().unwrap_or(text).to_lowercase();
        let padded: Vec<char> = format!("  {} ", name).chars().collect();
        let mut vector = vec![0.0f32; DIM];
        for window in padded.windows(3) {
            let mut hash: u32 = 2166136261;
            for c in window {
                hash ^= *c as u32;
                hash = hash.wrapping_mul(16777619);
            }
            vector[hash as usize % DIM] += 1.0;
        }
        vector
    }
}

impl Encoder for TrigramEncoder {
    fn model_name(&self) -> &str {
        "trigram-test"
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::embed(t)).collect())
    }
}

/// Every call fails, as a crashed model would.
pub struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn model_name(&self) -> &str {
        "failing-test"
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(anyhow!("inference session crashed"))
    }
}

/// Builds a context over a fresh store in `dir`, ingesting `catalog_json`.
pub fn context_with(
    dir: &TempDir,
    catalog_json: &str,
    query_encoder: Arc<dyn Encoder>,
) -> Result<AppContext> {
    let store = VectorStore::open(dir.path())?;
    let mut collection = store.get_or_create_collection(COLLECTION_NAME, DistanceMetric::Cosine)?;
    let catalog = catalog_json.to_string();
    ingest_if_empty(&mut collection, &TrigramEncoder, move || parse_catalog(&catalog))?;
    Ok(AppContext::new(query_encoder, collection))
}

pub fn test_context(dir: &TempDir) -> Result<AppContext> {
    context_with(dir, CATALOG, Arc::new(TrigramEncoder))
}
