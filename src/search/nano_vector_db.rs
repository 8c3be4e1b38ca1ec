//! A lightweight persistent vector database, one JSON file per collection.
#![forbid(unsafe_code)]

use base64::{engine::general_purpose, Engine as _};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IndexError;

type Float = f32;

/// Distance metric a collection is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cos(a, b)`; magnitude is ignored.
    #[default]
    Cosine,
}

impl DistanceMetric {
    /// Distance between two already normalized vectors.
    #[inline]
    fn distance(self, a: &[Float], b: &[Float]) -> Float {
        match self {
            DistanceMetric::Cosine => 1.0 - simple_dot_product(a, b),
        }
    }
}

/// A single vector entry with metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Data {
    /// Unique identifier for the vector
    #[serde(rename = "__id__")]
    pub id: String,
    /// Input vector; persisted rows live in the matrix, not here
    #[serde(skip)]
    pub vector: Vec<Float>,
    /// Source text the vector was computed from
    #[serde(rename = "__document__", default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Additional metadata fields stored with the vector
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, serde_json::Value>,
}

/// One query result, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub distance: Float,
    pub document: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DataBase {
    metric: DistanceMetric,
    /// Unset until the first insert fixes it.
    embedding_dim: Option<usize>,
    data: Vec<Data>,
    #[serde(with = "base64_bytes")]
    matrix: Vec<Float>,
}

mod base64_bytes {
    use super::*;
    use bytemuck::cast_slice;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(vec: &[Float], serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = cast_slice(vec);
        let b64 = general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&b64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Float>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)?;
        if bytes.len() % 4 != 0 {
            return Err(serde::de::Error::custom(format!(
                "matrix byte length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|c| Float::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

/// Main vector database struct
#[derive(Debug)]
pub struct NanoVectorDB {
    storage_file: PathBuf,
    storage: DataBase,
}

/// Heap entry. Orders by distance, then by insertion index, so the heap top
/// is always the worst candidate kept so far.
struct ScoredIndex {
    distance: Float,
    index: usize,
}

impl PartialEq for ScoredIndex {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredIndex {}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp sorts NaN after every real distance, so NaN rows are dropped first.
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl NanoVectorDB {
    /// Opens the collection stored at `storage_file`, creating (and persisting)
    /// an empty one with `metric` when the file is missing or empty.
    pub fn open(storage_file: &Path, metric: DistanceMetric) -> Result<Self, IndexError> {
        let storage_file = storage_file.to_path_buf();
        if storage_file.exists() && storage_file.metadata()?.len() > 0 {
            let contents = fs::read_to_string(&storage_file)?;
            let storage: DataBase =
                serde_json::from_str(&contents).map_err(|e| IndexError::Corrupt {
                    path: storage_file.clone(),
                    reason: e.to_string(),
                })?;

            let expected_len = storage.data.len() * storage.embedding_dim.unwrap_or(0);
            if storage.matrix.len() != expected_len {
                return Err(IndexError::Corrupt {
                    path: storage_file,
                    reason: format!(
                        "Matrix size mismatch: expected {}, got {}",
                        expected_len,
                        storage.matrix.len()
                    ),
                });
            }
            if storage.embedding_dim.is_none() && !storage.data.is_empty() {
                return Err(IndexError::Corrupt {
                    path: storage_file,
                    reason: "entries present but embedding dimension unset".to_string(),
                });
            }
            return Ok(Self {
                storage_file,
                storage,
            });
        }

        let db = Self {
            storage_file,
            storage: DataBase {
                metric,
                embedding_dim: None,
                data: Vec::new(),
                matrix: Vec::new(),
            },
        };
        db.save()?;
        Ok(db)
    }

    /// Inserts a batch of new vectors. Either the whole batch is stored and
    /// persisted, or nothing changes.
    pub fn insert(&mut self, datas: Vec<Data>) -> Result<usize, IndexError> {
        let Some(first) = datas.first() else {
            return Ok(0);
        };
        let dim = self.storage.embedding_dim.unwrap_or(first.vector.len());
        if dim == 0 {
            return Err(IndexError::EmptyVector(first.id.clone()));
        }

        let mut seen: HashSet<&str> = self.storage.data.iter().map(|d| d.id.as_str()).collect();
        for data_item in &datas {
            if data_item.vector.len() != dim {
                return Err(IndexError::DimensionMismatch {
                    expected: dim,
                    got: data_item.vector.len(),
                });
            }
            if !seen.insert(data_item.id.as_str()) {
                return Err(IndexError::DuplicateId(data_item.id.clone()));
            }
        }

        let previous_dim = self.storage.embedding_dim;
        let previous_len = self.storage.data.len();
        let inserted = datas.len();

        self.storage.matrix.reserve(inserted * dim);
        for data_item in datas {
            self.storage.matrix.extend(normalize(&data_item.vector));
            self.storage.data.push(Data {
                vector: Vec::new(),
                ..data_item
            });
        }
        self.storage.embedding_dim = Some(dim);

        if let Err(e) = self.save() {
            self.storage.data.truncate(previous_len);
            self.storage.matrix.truncate(previous_len * dim);
            self.storage.embedding_dim = previous_dim;
            return Err(e);
        }
        Ok(inserted)
    }

    /// Returns up to `top_k` entries by ascending distance to `query`; equal
    /// distances keep insertion order.
    pub fn query(&self, query: &[Float], top_k: usize) -> Result<Vec<QueryHit>, IndexError> {
        let Some(dim) = self.storage.embedding_dim else {
            return Ok(Vec::new());
        };
        if query.len() != dim {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                got: query.len(),
            });
        }
        if top_k == 0 || self.storage.data.is_empty() {
            return Ok(Vec::new());
        }

        let query_norm = normalize(query);
        let metric = self.storage.metric;
        let scored: Vec<ScoredIndex> = self
            .storage
            .matrix
            .par_chunks_exact(dim)
            .enumerate()
            .map(|(index, row)| ScoredIndex {
                distance: metric.distance(row, &query_norm),
                index,
            })
            .collect();

        let mut heap = BinaryHeap::with_capacity(top_k + 1);
        for candidate in scored {
            heap.push(candidate);
            if heap.len() > top_k {
                heap.pop();
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|si| {
                let data = &self.storage.data[si.index];
                QueryHit {
                    id: data.id.clone(),
                    distance: si.distance,
                    document: data.document.clone(),
                    fields: data.fields.clone(),
                }
            })
            .collect())
    }

    /// Saves the database to disk
    pub fn save(&self) -> Result<(), IndexError> {
        let serialized = serde_json::to_string(&self.storage)?;
        let tmp = self.storage_file.with_extension("json.tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.storage_file)?;
        Ok(())
    }

    pub fn metric(&self) -> DistanceMetric {
        self.storage.metric
    }

    pub fn embedding_dim(&self) -> Option<usize> {
        self.storage.embedding_dim
    }

    /// Get the number of vectors in the database
    pub fn len(&self) -> usize {
        self.storage.data.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.storage.data.is_empty()
    }
}

#[inline]
fn simple_dot_product(vec1: &[Float], vec2: &[Float]) -> Float {
    vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum()
}

/// Normalize a vector to unit length. A zero vector stays zero.
pub fn normalize(vector: &[Float]) -> Vec<Float> {
    let norm_sq: Float = vector.iter().map(|&x| x * x).sum();
    if norm_sq == 0.0 {
        return vec![0.0; vector.len()];
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    vector.iter().map(|&x| x * inv_norm).collect()
}
