//! Corpus indexing: chunking, embedding, and dual-index registration.
//!
//! [`IndexBuilder`] is the one-shot batch job that turns a [`RoleCorpus`]
//! into a [`RoleIndex`]: every role description is split into overlapping
//! token chunks, a TF-IDF embedder is fitted on the chunk corpus, chunks are
//! embedded (in parallel), and each chunk is registered under the same
//! deterministic chunk id in the lexical index, the vector index, and the
//! chunk metadata store. Any error aborts the whole build; a partially
//! indexed corpus is never returned.
//!
//! The resulting [`RoleIndex`] is an explicitly owned object handed to the
//! fusion engine, so independent indexes can coexist (one per corpus
//! version, one per test) without process-wide state.

use ahash::AHashMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::chunking::ChunkingConfig;
use crate::corpus::RoleCorpus;
use crate::embedding::{EmbedderConfig, TextEmbedder, TfIdfEmbedder};
use crate::error::{Result, RoleSearchError};
use crate::lexical::Bm25Index;
use crate::vector::{DistanceMetric, Vector, VectorIndex};

/// Identifier of one indexed chunk, `"{role_number}_chunk{sequence_index}"`.
pub type ChunkId = String;

/// Compose the deterministic chunk id for a role's n-th chunk.
pub fn chunk_id(role_number: &str, sequence_index: usize) -> ChunkId {
    format!("{role_number}_chunk{sequence_index}")
}

/// Per-chunk metadata persisted alongside the dual index.
///
/// Resolves a chunk id back to its owning role, its position within that
/// role's description, and the chunk text for result materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMeta {
    /// Role number of the owning entity.
    pub role_number: String,
    /// Zero-based chunk order within the entity (provenance only, never
    /// used for ranking).
    pub sequence_index: usize,
    /// The chunk's token window, order-preserving.
    pub text: String,
}

/// The built, immutable dual index over one corpus version.
///
/// Owns the canonical chunk-id universe shared by both back-ends, the chunk
/// metadata store, and the fitted embedder. The query path only ever reads
/// from it, so concurrent searches need no locking.
pub struct RoleIndex {
    lexical: Bm25Index,
    vectors: VectorIndex,
    metadata: AHashMap<ChunkId, ChunkMeta>,
    embedder: Box<dyn TextEmbedder>,
}

impl std::fmt::Debug for RoleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleIndex")
            .field("lexical", &self.lexical)
            .field("vectors", &self.vectors)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl RoleIndex {
    /// Assemble an index from separately built parts.
    ///
    /// [`IndexBuilder`] is the usual way to get a `RoleIndex`; this
    /// constructor exists for callers that bring their own embedder (the
    /// [`TextEmbedder`] seam) or populate the back-ends out of band. Both
    /// back-ends must have been fed the same chunk id universe in the same
    /// order; [`HybridSearcher`](crate::hybrid::HybridSearcher) rejects
    /// misaligned indexes at query time.
    pub fn from_parts(
        lexical: Bm25Index,
        vectors: VectorIndex,
        metadata: AHashMap<ChunkId, ChunkMeta>,
        embedder: Box<dyn TextEmbedder>,
    ) -> Self {
        Self {
            lexical,
            vectors,
            metadata,
            embedder,
        }
    }

    /// The lexical back-end.
    pub fn lexical(&self) -> &Bm25Index {
        &self.lexical
    }

    /// The semantic back-end.
    pub fn vectors(&self) -> &VectorIndex {
        &self.vectors
    }

    /// The embedder fitted at build time, used to embed queries with the
    /// same representation as the indexed chunks.
    pub fn embedder(&self) -> &dyn TextEmbedder {
        self.embedder.as_ref()
    }

    /// Total number of indexed chunks.
    pub fn chunk_count(&self) -> usize {
        self.lexical.len()
    }

    /// Returns true when no chunks are indexed.
    pub fn is_empty(&self) -> bool {
        self.lexical.is_empty()
    }

    /// Resolve a single chunk id to its metadata.
    pub fn metadata(&self, chunk_id: &str) -> Option<&ChunkMeta> {
        self.metadata.get(chunk_id)
    }

    /// Resolve a whole candidate set of chunk ids in one batched fetch.
    ///
    /// Ids with no metadata record are absent from the returned map.
    pub fn metadata_batch<'a>(
        &'a self,
        chunk_ids: impl IntoIterator<Item = &'a ChunkId>,
    ) -> AHashMap<&'a str, &'a ChunkMeta> {
        chunk_ids
            .into_iter()
            .filter_map(|id| {
                self.metadata
                    .get_key_value(id)
                    .map(|(key, meta)| (key.as_str(), meta))
            })
            .collect()
    }

    /// Consistency check: both back-ends must cover the same chunk universe.
    pub(crate) fn validate_alignment(&self) -> Result<()> {
        if self.lexical.len() != self.vectors.len() {
            return Err(RoleSearchError::index_unavailable(format!(
                "back-ends disagree on chunk universe: lexical has {}, vector has {}",
                self.lexical.len(),
                self.vectors.len()
            )));
        }
        if !self.embedder.is_fitted() {
            return Err(RoleSearchError::index_unavailable(
                "embedder has not been fitted",
            ));
        }
        Ok(())
    }
}

/// One-shot builder for [`RoleIndex`].
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    chunking: ChunkingConfig,
    embedder: EmbedderConfig,
    metric: DistanceMetric,
}

struct PendingChunk {
    id: ChunkId,
    role_number: String,
    sequence_index: usize,
    text: String,
}

impl IndexBuilder {
    /// Create a builder with default chunking (250/50), embedding, and
    /// cosine distance settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the chunking window parameters.
    pub fn chunking(mut self, config: ChunkingConfig) -> Self {
        self.chunking = config;
        self
    }

    /// Override the embedder configuration.
    pub fn embedder(mut self, config: EmbedderConfig) -> Self {
        self.embedder = config;
        self
    }

    /// Override the vector distance metric (cosine by default).
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Build the dual index for a corpus.
    ///
    /// Chunk ids are assigned in corpus iteration order, per role in
    /// non-decreasing sequence order, which fixes the canonical chunk
    /// ordering both back-ends share. Errors abort the build.
    pub fn build(&self, corpus: &RoleCorpus) -> Result<RoleIndex> {
        self.chunking.validate()?;

        // Chunk every role description. Chunks of different roles share no
        // state, but registration below stays serial so ids are neither
        // duplicated nor lost.
        let mut pending: Vec<PendingChunk> = Vec::new();
        for (role_number, description) in corpus.iter() {
            for (sequence_index, text) in self.chunking.split(description).into_iter().enumerate()
            {
                pending.push(PendingChunk {
                    id: chunk_id(role_number, sequence_index),
                    role_number: role_number.to_owned(),
                    sequence_index,
                    text,
                });
            }
        }
        debug!(
            roles = corpus.len(),
            chunks = pending.len(),
            "chunked corpus"
        );

        // Fit the embedder on the chunk corpus, then embed every chunk.
        // Embedding is read-only against the fitted embedder and safely
        // parallel across chunks.
        let texts: Vec<&str> = pending.iter().map(|chunk| chunk.text.as_str()).collect();
        let mut embedder = TfIdfEmbedder::new(self.embedder.clone());
        embedder.fit(&texts)?;

        let embeddings: Vec<Vector> = texts
            .par_iter()
            .map(|text| embedder.embed(text))
            .collect::<Result<_>>()?;

        let mut lexical = Bm25Index::new();
        let mut vectors = VectorIndex::new(self.metric);
        let mut metadata: AHashMap<ChunkId, ChunkMeta> =
            AHashMap::with_capacity(pending.len());

        for (chunk, embedding) in pending.into_iter().zip(embeddings) {
            lexical.add(chunk.id.clone(), &chunk.text);
            vectors.add(chunk.id.clone(), embedding)?;
            metadata.insert(
                chunk.id,
                ChunkMeta {
                    role_number: chunk.role_number,
                    sequence_index: chunk.sequence_index,
                    text: chunk.text,
                },
            );
        }

        info!(
            roles = corpus.len(),
            chunks = lexical.len(),
            dimension = embedder.dimension(),
            "built role index"
        );

        Ok(RoleIndex {
            lexical,
            vectors,
            metadata,
            embedder: Box::new(embedder),
        })
    }
}
