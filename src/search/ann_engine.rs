use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IndexError;
use crate::search::nano_vector_db::{Data as NanoDBData, DistanceMetric, NanoVectorDB, QueryHit};

/// Metadata stored next to each vector.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Persistent client: a directory holding one file per collection.
#[derive(Debug, Clone)]
pub struct VectorStore {
    root: PathBuf,
}

impl VectorStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, IndexError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::debug!(path = %root.display(), "Vector store opened");
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Returns the named collection, creating it with `metric` if it does not
    /// exist yet. Calling it again with the same name reuses what is on disk.
    pub fn get_or_create_collection(
        &self,
        name: &str,
        metric: DistanceMetric,
    ) -> Result<Collection, IndexError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(IndexError::InvalidCollectionName(name.to_string()));
        }

        let path = self.root.join(format!("{name}.json"));
        let db = NanoVectorDB::open(&path, metric)?;
        tracing::debug!(collection = name, entries = db.len(), "Collection ready");
        Ok(Collection {
            name: name.to_string(),
            db,
        })
    }
}

/// Handle to one named collection.
#[derive(Debug)]
pub struct Collection {
    name: String,
    db: NanoVectorDB,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric(&self) -> DistanceMetric {
        self.db.metric()
    }

    /// Dimension fixed by the first insert, if any.
    pub fn dimension(&self) -> Option<usize> {
        self.db.embedding_dim()
    }

    pub fn count(&self) -> usize {
        self.db.len()
    }

    /// Batch insert. All four sequences must line up one-to-one.
    pub fn insert(
        &mut self,
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        metadatas: Vec<Metadata>,
        documents: Vec<String>,
    ) -> Result<usize, IndexError> {
        let n = ids.len();
        if vectors.len() != n || metadatas.len() != n || documents.len() != n {
            return Err(IndexError::LengthMismatch {
                ids: n,
                vectors: vectors.len(),
                metadatas: metadatas.len(),
                documents: documents.len(),
            });
        }

        let items: Vec<NanoDBData> = ids
            .into_iter()
            .zip(vectors)
            .zip(metadatas)
            .zip(documents)
            .map(|(((id, vector), fields), document)| NanoDBData {
                id,
                vector,
                document: Some(document),
                fields,
            })
            .collect();

        self.db.insert(items)
    }

    /// Nearest `k` entries, nearest first.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<QueryHit>, IndexError> {
        self.db.query(vector, k)
    }
}
