//! The hybrid searcher: dual-back-end scoring, fusion, and ranking.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::tokenize_lowercase;
use crate::error::{Result, RoleSearchError};
use crate::hybrid::normalize::zscore;
use crate::index::RoleIndex;

/// Default weight of the normalized lexical score.
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.4;

/// Default weight of the normalized semantic score.
pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.6;

/// Default maximum number of results.
pub const DEFAULT_TOP_K: usize = 10;

/// A hybrid search request.
///
/// Weights are unconstrained reals; they are not forced to sum to one, so
/// callers are responsible for sensible scaling. The defaults are
/// 0.4 lexical / 0.6 semantic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Maximum number of results; must be positive.
    pub top_k: usize,
    /// Weight applied to the normalized lexical score.
    pub lexical_weight: f32,
    /// Weight applied to the normalized semantic score.
    pub semantic_weight: f32,
}

impl SearchRequest {
    /// Create a request with default `top_k` and weights.
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            lexical_weight: DEFAULT_LEXICAL_WEIGHT,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
        }
    }

    /// Set the maximum number of results.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the fusion weights.
    pub fn weights(mut self, lexical: f32, semantic: f32) -> Self {
        self.lexical_weight = lexical;
        self.semantic_weight = semantic;
        self
    }
}

/// One ranked search result: the best-scoring chunk of one role.
///
/// The reported scores are the exact normalized values used for the ranking
/// decision, not re-derived afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    /// Role number of the owning entity.
    pub role_number: String,
    /// Identifier of the winning chunk.
    pub chunk_id: String,
    /// The winning chunk's order within its role description.
    pub sequence_index: usize,
    /// The winning chunk's text.
    pub text: String,
    /// Normalized lexical score of the winning chunk.
    pub lexical_score: f32,
    /// Normalized semantic score of the winning chunk.
    pub semantic_score: f32,
    /// Weighted combination the ranking is based on.
    pub combined_score: f32,
}

/// The response to one search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// Ranked results, at most one per role number, combined score
    /// descending, at most `top_k` entries.
    pub results: Vec<RankedResult>,
}

/// Fusion engine over one owned [`RoleIndex`].
///
/// The query path is read-only and reentrant: concurrent `search` calls
/// never mutate index state and need no locking.
pub struct HybridSearcher {
    index: RoleIndex,
}

impl HybridSearcher {
    /// Create a searcher over a built index.
    pub fn new(index: RoleIndex) -> Self {
        Self { index }
    }

    /// The underlying index.
    pub fn index(&self) -> &RoleIndex {
        &self.index
    }

    /// Run a hybrid search.
    ///
    /// Scores every indexed chunk with both back-ends, z-score normalizes
    /// each raw vector independently, combines them as
    /// `lexical_weight * lexical + semantic_weight * semantic`, reduces to
    /// the best chunk per role, and returns at most `top_k` results in
    /// combined-score descending order.
    ///
    /// Tie-breaks are deterministic: within a role a chunk only replaces the
    /// incumbent on a strictly greater combined score, so the lowest
    /// sequence index wins exact ties; across roles the final sort is stable
    /// over the canonical chunk registration order.
    ///
    /// # Errors
    ///
    /// - `Configuration` when `top_k` is zero.
    /// - `IndexUnavailable` when a back-end is absent or misaligned.
    /// - `Scoring` when query embedding fails; no partial results.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.top_k == 0 {
            return Err(RoleSearchError::configuration("top_k must be positive"));
        }

        self.index.validate_alignment()?;

        // An empty corpus is a valid index with no answers, not a failure.
        if self.index.is_empty() {
            return Ok(SearchResponse {
                query: request.query.clone(),
                results: Vec::new(),
            });
        }

        // Lexical raw scores, positionally aligned to the canonical chunk
        // ordering established by the lexical back-end.
        let query_tokens = tokenize_lowercase(&request.query);
        let lexical_raw = self.index.lexical().score_all(&query_tokens);
        let chunk_ids = self.index.lexical().chunk_ids();

        // Semantic raw scores over the complete chunk set, realigned into
        // the same positional order. Ids the vector back-end did not return
        // default to similarity 0 before normalization.
        let query_vector = self
            .index
            .embedder()
            .embed(&request.query)
            .map_err(|e| RoleSearchError::scoring(format!("query embedding failed: {e}")))?;
        let hits = self
            .index
            .vectors()
            .nearest(&query_vector, self.index.vectors().len())
            .map_err(|e| RoleSearchError::scoring(format!("similarity scan failed: {e}")))?;

        let position_of: AHashMap<&str, usize> = chunk_ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.as_str(), position))
            .collect();
        let mut semantic_raw = vec![0.0f32; chunk_ids.len()];
        for hit in hits {
            if let Some(&position) = position_of.get(hit.chunk_id.as_str()) {
                semantic_raw[position] = hit.similarity;
            }
        }

        // Normalize independently, then combine.
        let lexical_norm = zscore(&lexical_raw);
        let semantic_norm = zscore(&semantic_raw);
        let combined: Vec<f32> = lexical_norm
            .iter()
            .zip(&semantic_norm)
            .map(|(lex, sem)| request.lexical_weight * lex + request.semantic_weight * sem)
            .collect();

        // One batched metadata fetch for the whole candidate set.
        let metadata = self.index.metadata_batch(chunk_ids.iter());

        // Keep the best chunk per role. Strictly-greater replacement means
        // the lowest sequence index wins exact ties within a role.
        let mut best_position: AHashMap<&str, usize> = AHashMap::new();
        for (position, id) in chunk_ids.iter().enumerate() {
            let meta = metadata.get(id.as_str()).ok_or_else(|| {
                RoleSearchError::index_unavailable(format!("no metadata for chunk {id}"))
            })?;
            best_position
                .entry(meta.role_number.as_str())
                .and_modify(|incumbent| {
                    if combined[position] > combined[*incumbent] {
                        *incumbent = position;
                    }
                })
                .or_insert(position);
        }

        // Stable descending sort over canonical chunk order, then truncate.
        let mut winners: Vec<usize> = best_position.values().copied().collect();
        winners.sort_unstable();
        winners.sort_by(|&a, &b| {
            combined[b]
                .partial_cmp(&combined[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        winners.truncate(request.top_k);

        let results: Vec<RankedResult> = winners
            .into_iter()
            .map(|position| {
                let id = &chunk_ids[position];
                let meta = metadata[id.as_str()];
                RankedResult {
                    role_number: meta.role_number.clone(),
                    chunk_id: id.clone(),
                    sequence_index: meta.sequence_index,
                    text: meta.text.clone(),
                    lexical_score: lexical_norm[position],
                    semantic_score: semantic_norm[position],
                    combined_score: combined[position],
                }
            })
            .collect();

        debug!(
            query = %request.query,
            top_k = request.top_k,
            candidates = chunk_ids.len(),
            results = results.len(),
            "hybrid search complete"
        );

        Ok(SearchResponse {
            query: request.query.clone(),
            results,
        })
    }
}
