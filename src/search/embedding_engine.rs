use anyhow::{anyhow, Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use model2vec_rs::model::StaticModel;
use std::path::Path;

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

// Encoded once at load time to learn the output dimension.
const DIMENSION_PROBE: &str = "ingrediente";

/// Text to vector encoder. Implementations must be deterministic: the same
/// text always maps to the same vector.
pub trait Encoder: Send + Sync {
    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to generate embedding for single text: {}", text))
    }
}

enum Backend {
    /// Sentence-transformer models run through ONNX Runtime.
    Onnx(TextEmbedding),
    /// Model2Vec static embeddings, addressed by hub repo id or local path.
    Static(StaticModel),
}

pub struct EmbeddingEngine {
    model_name: String,
    dimension: usize,
    backend: Backend,
}

impl EmbeddingEngine {
    /// Resolves `model_name` to a backend and loads it. Names of known
    /// sentence-transformer checkpoints go to ONNX Runtime; anything else is
    /// treated as a Model2Vec model.
    pub fn load(model_name: &str, cache_dir: Option<&Path>) -> Result<Self> {
        let backend = match onnx_model_for(model_name) {
            Some(model) => {
                let mut options = InitOptions::new(model).with_show_download_progress(false);
                if let Some(dir) = cache_dir {
                    options = options.with_cache_dir(dir.to_path_buf());
                }
                let model = TextEmbedding::try_new(options)
                    .with_context(|| format!("Failed to initialize ONNX model '{}'", model_name))?;
                Backend::Onnx(model)
            }
            None => {
                let model = StaticModel::from_pretrained(model_name, None, None, None)
                    .with_context(|| format!("Failed to load Model2Vec model '{}'", model_name))?;
                Backend::Static(model)
            }
        };

        let mut engine = Self {
            model_name: model_name.to_string(),
            dimension: 0,
            backend,
        };
        let probe = engine
            .encode_one(DIMENSION_PROBE)
            .with_context(|| format!("Model '{}' failed to encode a probe text", model_name))?;
        if probe.is_empty() {
            anyhow::bail!("Model '{}' produced zero-length embeddings", model_name);
        }
        engine.dimension = probe.len();

        tracing::info!(
            model = model_name,
            backend = engine.backend_name(),
            dimension = engine.dimension,
            "Embedding model loaded"
        );
        Ok(engine)
    }

    fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Onnx(_) => "onnx",
            Backend::Static(_) => "model2vec",
        }
    }
}

impl Encoder for EmbeddingEngine {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = match &self.backend {
            Backend::Onnx(model) => {
                let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
                model.embed(inputs, None)?
            }
            Backend::Static(model) => model.encode(texts),
        };
        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            );
        }
        Ok(embeddings)
    }
}

/// Maps a configured model name to a fastembed checkpoint. The hub
/// organisation prefix is optional and case is ignored.
fn onnx_model_for(model_name: &str) -> Option<EmbeddingModel> {
    let short = model_name
        .rsplit_once('/')
        .map_or(model_name, |(_, name)| name)
        .to_ascii_lowercase();
    match short.as_str() {
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Some(EmbeddingModel::AllMiniLML12V2),
        "paraphrase-multilingual-minilm-l12-v2" => Some(EmbeddingModel::ParaphraseMLMiniLML12V2),
        "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        "multilingual-e5-small" => Some(EmbeddingModel::MultilingualE5Small),
        _ => None,
    }
}
