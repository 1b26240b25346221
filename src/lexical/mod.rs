//! Lexical (BM25) back-end.
//!
//! The index is built once per corpus version from the lowercased token
//! sequence of every chunk, in registration order. That order is the
//! canonical chunk ordering for the whole dual index: [`Bm25Index::score_all`]
//! returns one raw score per registered chunk, positionally aligned to
//! [`Bm25Index::chunk_ids`], so the fusion engine can line both back-ends up
//! without per-chunk lookups.

use ahash::AHashMap;

use crate::analysis::tokenize_lowercase;

/// Default BM25 `k1` term-frequency saturation parameter.
pub const DEFAULT_K1: f32 = 1.2;

/// Default BM25 `b` length-normalization parameter.
pub const DEFAULT_B: f32 = 0.75;

/// An in-memory BM25 index over chunk token sequences.
#[derive(Debug, Default)]
pub struct Bm25Index {
    k1: f32,
    b: f32,
    chunk_ids: Vec<String>,
    term_frequencies: Vec<AHashMap<String, usize>>,
    lengths: Vec<usize>,
    document_frequencies: AHashMap<String, usize>,
}

impl Bm25Index {
    /// Create an empty index with default BM25 parameters.
    pub fn new() -> Self {
        Self::with_params(DEFAULT_K1, DEFAULT_B)
    }

    /// Create an empty index with custom BM25 parameters.
    pub fn with_params(k1: f32, b: f32) -> Self {
        Self {
            k1,
            b,
            chunk_ids: Vec::new(),
            term_frequencies: Vec::new(),
            lengths: Vec::new(),
            document_frequencies: AHashMap::new(),
        }
    }

    /// Register a chunk's text under the given id.
    ///
    /// Registration order defines the canonical chunk ordering used for
    /// score alignment.
    pub fn add(&mut self, chunk_id: String, text: &str) {
        let tokens = tokenize_lowercase(text);
        let mut frequencies: AHashMap<String, usize> = AHashMap::new();
        for token in tokens {
            *frequencies.entry(token).or_insert(0) += 1;
        }
        for term in frequencies.keys() {
            *self.document_frequencies.entry(term.clone()).or_insert(0) += 1;
        }
        self.lengths.push(frequencies.values().sum());
        self.term_frequencies.push(frequencies);
        self.chunk_ids.push(chunk_id);
    }

    /// The canonical chunk id ordering, identical to registration order.
    pub fn chunk_ids(&self) -> &[String] {
        &self.chunk_ids
    }

    /// Number of registered chunks.
    pub fn len(&self) -> usize {
        self.chunk_ids.len()
    }

    /// Returns true when no chunks are registered.
    pub fn is_empty(&self) -> bool {
        self.chunk_ids.is_empty()
    }

    /// Inverse document frequency of a term.
    ///
    /// Uses the non-negative Okapi form `ln(1 + (N - df + 0.5) / (df + 0.5))`
    /// so a match never scores below a non-match.
    fn idf(&self, document_frequency: usize) -> f32 {
        let n = self.len() as f32;
        let df = document_frequency as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Score every registered chunk against the query tokens.
    ///
    /// Returns one raw BM25 score per chunk, positionally aligned to
    /// [`Bm25Index::chunk_ids`]. Chunks with no query term in common score
    /// exactly 0. An empty index yields an empty vector.
    pub fn score_all(&self, query_tokens: &[String]) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.len()];
        if self.is_empty() {
            return scores;
        }

        let avg_length = self.lengths.iter().sum::<usize>() as f32 / self.len() as f32;

        for token in query_tokens {
            let Some(&df) = self.document_frequencies.get(token) else {
                continue;
            };
            let idf = self.idf(df);

            for (index, frequencies) in self.term_frequencies.iter().enumerate() {
                let Some(&tf) = frequencies.get(token) else {
                    continue;
                };
                let tf = tf as f32;
                let length_norm =
                    1.0 - self.b + self.b * (self.lengths[index] as f32 / avg_length);
                scores[index] += idf * (tf * (self.k1 + 1.0)) / (tf + self.k1 * length_norm);
            }
        }

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str) -> Vec<String> {
        tokenize_lowercase(text)
    }

    fn sample_index() -> Bm25Index {
        let mut index = Bm25Index::new();
        index.add("1111.0300_chunk0".into(), "plans and directs farm operations");
        index.add("2512.0100_chunk0".into(), "writes and tests computer software");
        index.add("2512.0100_chunk1".into(), "maintains software documentation");
        index
    }

    #[test]
    fn test_score_vector_is_aligned_to_registration_order() {
        let index = sample_index();
        assert_eq!(
            index.chunk_ids(),
            &[
                "1111.0300_chunk0".to_owned(),
                "2512.0100_chunk0".to_owned(),
                "2512.0100_chunk1".to_owned(),
            ]
        );
        let scores = index.score_all(&query("farm"));
        assert_eq!(scores.len(), 3);
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_matching_chunks_outscore_non_matching() {
        let index = sample_index();
        let scores = index.score_all(&query("software"));
        assert_eq!(scores[0], 0.0);
        assert!(scores[1] > 0.0);
        assert!(scores[2] > 0.0);
    }

    #[test]
    fn test_rarer_terms_score_higher() {
        let index = sample_index();
        // "farm" appears in one chunk, "and" in two; the rare term carries
        // more weight for an equally long chunk.
        let farm = index.score_all(&query("farm"))[0];
        let and = index.score_all(&query("and"))[0];
        assert!(farm > and);
    }

    #[test]
    fn test_unknown_query_terms_score_zero_everywhere() {
        let index = sample_index();
        let scores = index.score_all(&query("zeppelin"));
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_scores_are_never_negative() {
        // "and" is in most chunks; the Okapi IDF form keeps it non-negative.
        let mut index = Bm25Index::new();
        index.add("a".into(), "and one");
        index.add("b".into(), "and two");
        index.add("c".into(), "three");
        let scores = index.score_all(&query("and"));
        assert!(scores.iter().all(|&s| s >= 0.0));
        assert!(scores[0] > 0.0);
    }

    #[test]
    fn test_repeated_terms_saturate() {
        let mut index = Bm25Index::new();
        index.add("once".into(), "apple pear plum peach fig");
        index.add("thrice".into(), "apple apple apple plum fig");
        let scores = index.score_all(&query("apple"));
        // More occurrences score higher, but not linearly.
        assert!(scores[1] > scores[0]);
        assert!(scores[1] < scores[0] * 3.0);
    }

    #[test]
    fn test_empty_index_yields_empty_vector() {
        let index = Bm25Index::new();
        assert!(index.is_empty());
        assert!(index.score_all(&query("anything")).is_empty());
    }

    #[test]
    fn test_scoring_is_case_insensitive() {
        let index = sample_index();
        let lower = index.score_all(&query("software"));
        let upper = index.score_all(&query("SOFTWARE"));
        assert_eq!(lower, upper);
    }
}
