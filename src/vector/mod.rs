//! Dense vectors and the semantic nearest-neighbor back-end.
//!
//! The [`VectorIndex`] is a brute-force index: every query compares against
//! every registered vector. The fusion engine always asks for the complete
//! similarity vector anyway (`k` = index size), so an approximate structure
//! would buy nothing here while costing determinism.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoleSearchError};

/// A dense vector representation for similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// The vector dimensions as floating point values.
    pub data: Vec<f32>,
}

impl Vector {
    /// Create a new vector with the given dimensions.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this vector.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Calculate the L2 norm (magnitude) of this vector.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize this vector to unit length. Zero vectors are left as-is.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.data {
                *value /= norm;
            }
        }
    }

    /// Check that this vector has the expected dimension.
    pub fn validate_dimension(&self, expected: usize) -> Result<()> {
        if self.data.len() != expected {
            return Err(RoleSearchError::configuration(format!(
                "vector dimension mismatch: expected {}, got {}",
                expected,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// Distance metrics for vector similarity calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity).
    #[default]
    Cosine,
    /// Euclidean (L2) distance.
    Euclidean,
    /// Dot product (higher is more similar).
    DotProduct,
}

impl DistanceMetric {
    /// Calculate the distance between two vectors using this metric.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(RoleSearchError::scoring(
                "vector dimensions must match for distance calculation",
            ));
        }

        let result = match self {
            DistanceMetric::Cosine => {
                let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
                let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    1.0 // Maximum distance for zero vectors.
                } else {
                    1.0 - (dot / (norm_a * norm_b))
                }
            }
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f32>()
                .sqrt(),
            DistanceMetric::DotProduct => {
                // Negated so lower values mean closer, like the others.
                -a.iter().zip(b.iter()).map(|(x, y)| x * y).sum::<f32>()
            }
        };

        Ok(result)
    }

    /// Calculate similarity (higher is more similar) between two vectors.
    ///
    /// For cosine this is exactly `1 - distance`; the other metrics are
    /// mapped onto a comparable higher-is-better scale.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        let distance = self.distance(a, b)?;
        let similarity = match self {
            DistanceMetric::Cosine => 1.0 - distance,
            DistanceMetric::Euclidean => (-distance).exp(),
            DistanceMetric::DotProduct => -distance,
        };
        Ok(similarity)
    }

    /// Get the name of this distance metric.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::DotProduct => "dot_product",
        }
    }
}

/// A similarity hit from the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    /// Identifier of the matched chunk.
    pub chunk_id: String,
    /// Similarity on the metric's higher-is-better scale.
    pub similarity: f32,
}

/// Brute-force nearest-neighbor index over per-chunk embeddings.
///
/// Built once per corpus version; the query path is read-only. The index
/// owns the canonical embedding for every chunk id registered with it.
#[derive(Debug, Default)]
pub struct VectorIndex {
    metric: DistanceMetric,
    dimension: Option<usize>,
    chunk_ids: Vec<String>,
    vectors: Vec<Vector>,
}

impl VectorIndex {
    /// Create an empty index using the given metric.
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            dimension: None,
            chunk_ids: Vec::new(),
            vectors: Vec::new(),
        }
    }

    /// Register a chunk's embedding. The first registration fixes the
    /// dimension; later registrations must match it.
    pub fn add(&mut self, chunk_id: String, vector: Vector) -> Result<()> {
        match self.dimension {
            Some(dim) => vector.validate_dimension(dim)?,
            None => self.dimension = Some(vector.dimension()),
        }
        self.chunk_ids.push(chunk_id);
        self.vectors.push(vector);
        Ok(())
    }

    /// Number of registered vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns true when no vectors are registered.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The distance metric backing this index.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Find the `k` most similar chunks to the query vector.
    ///
    /// Returns `(chunk_id, similarity)` hits sorted by similarity
    /// descending; ties keep registration order. Pass `k = self.len()` for
    /// the complete, untruncated similarity vector.
    pub fn nearest(&self, query: &Vector, k: usize) -> Result<Vec<VectorHit>> {
        let mut hits = Vec::with_capacity(self.vectors.len());
        for (chunk_id, vector) in self.chunk_ids.iter().zip(&self.vectors) {
            let similarity = self.metric.similarity(&query.data, &vector.data)?;
            hits.push(VectorHit {
                chunk_id: chunk_id.clone(),
                similarity,
            });
        }

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}
