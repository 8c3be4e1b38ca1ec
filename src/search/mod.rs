pub mod ann_engine;
pub mod data_loader;
pub mod embedding_engine;
pub mod nano_vector_db;

pub use ann_engine::{Collection, Metadata, VectorStore};
pub use data_loader::{load_bundled_catalog, load_catalog_file, IngredientRecord};
pub use embedding_engine::{EmbeddingEngine, Encoder, DEFAULT_EMBEDDING_MODEL};
pub use nano_vector_db::{DistanceMetric, QueryHit};
