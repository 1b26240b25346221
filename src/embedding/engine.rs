//! Corpus-fitted TF-IDF embedding engine.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::tokenize_lowercase;
use crate::embedding::TextEmbedder;
use crate::error::{Result, RoleSearchError};
use crate::vector::Vector;

/// Configuration for the TF-IDF embedder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Minimum number of corpus documents a term must appear in to enter the
    /// vocabulary.
    pub min_doc_freq: usize,
    /// Maximum vocabulary size; the most frequent terms win.
    pub max_vocab_size: usize,
    /// Whether to L2-normalize output vectors.
    pub normalize: bool,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            min_doc_freq: 1,
            max_vocab_size: 50_000,
            normalize: true,
        }
    }
}

/// TF-IDF text embedder fitted on the chunk corpus.
///
/// The vocabulary is built once from the corpus; the output dimension equals
/// the vocabulary size and never changes afterwards. Terms outside the
/// vocabulary contribute nothing, so a query with no known terms embeds to
/// the zero vector (which the cosine metric maps to similarity 0).
pub struct TfIdfEmbedder {
    config: EmbedderConfig,
    vocabulary: AHashMap<String, usize>,
    document_frequencies: AHashMap<String, usize>,
    total_documents: usize,
    fitted: bool,
}

impl TfIdfEmbedder {
    /// Create an unfitted embedder.
    pub fn new(config: EmbedderConfig) -> Self {
        Self {
            config,
            vocabulary: AHashMap::new(),
            document_frequencies: AHashMap::new(),
            total_documents: 0,
            fitted: false,
        }
    }

    /// Fit the vocabulary and document frequencies on a corpus of documents.
    ///
    /// Fitting on an empty corpus is valid and produces a zero-dimension
    /// embedder; every embedding is then the empty vector.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        self.vocabulary.clear();
        self.document_frequencies.clear();
        self.total_documents = documents.len();

        for document in documents {
            let tokens = tokenize_lowercase(document.as_ref());
            let mut seen: AHashSet<&str> = AHashSet::new();
            for token in &tokens {
                if seen.insert(token.as_str()) {
                    *self
                        .document_frequencies
                        .entry(token.clone())
                        .or_insert(0) += 1;
                }
            }
        }

        self.document_frequencies
            .retain(|_, df| *df >= self.config.min_doc_freq);

        // Deterministic vocabulary order: document frequency descending,
        // then term, truncated to the configured cap.
        let mut terms: Vec<(&String, &usize)> = self.document_frequencies.iter().collect();
        terms.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.config.max_vocab_size);

        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(index, (term, _))| (term.clone(), index))
            .collect();

        self.fitted = true;
        Ok(())
    }
}

impl TextEmbedder for TfIdfEmbedder {
    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn embed(&self, text: &str) -> Result<Vector> {
        if !self.fitted {
            return Err(RoleSearchError::index_unavailable(
                "embedder must be fitted before embedding",
            ));
        }

        let tokens = tokenize_lowercase(text);
        let mut data = vec![0.0f32; self.vocabulary.len()];

        let mut term_counts: AHashMap<&str, usize> = AHashMap::new();
        for token in &tokens {
            *term_counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let total_tokens = tokens.len() as f32;
        for (term, count) in term_counts {
            if let Some(&index) = self.vocabulary.get(term) {
                let tf = count as f32 / total_tokens;
                let df = self.document_frequencies.get(term).copied().unwrap_or(1);
                let idf = ((1.0 + self.total_documents as f32) / (1.0 + df as f32)).ln() + 1.0;
                data[index] = tf * idf;
            }
        }

        let mut vector = Vector::new(data);
        if self.config.normalize {
            vector.normalize();
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted_embedder(documents: &[&str]) -> TfIdfEmbedder {
        let mut embedder = TfIdfEmbedder::new(EmbedderConfig::default());
        embedder.fit(documents).unwrap();
        embedder
    }

    #[test]
    fn test_unfitted_embedder_refuses_to_embed() {
        let embedder = TfIdfEmbedder::new(EmbedderConfig::default());
        assert!(!embedder.is_fitted());
        let err = embedder.embed("anything").unwrap_err();
        assert_eq!(err.kind(), "index_unavailable_error");
    }

    #[test]
    fn test_dimension_is_fixed_by_vocabulary() {
        let embedder = fitted_embedder(&["alpha beta", "beta gamma"]);
        assert_eq!(embedder.dimension(), 3);

        let vector = embedder.embed("alpha").unwrap();
        assert_eq!(vector.dimension(), 3);
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let embedder = fitted_embedder(&["manages staff", "directs operations"]);
        let a = embedder.embed("manages operations").unwrap();
        let b = embedder.embed("manages operations").unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_unknown_terms_embed_to_zero_vector() {
        let embedder = fitted_embedder(&["alpha beta", "beta gamma"]);
        let vector = embedder.embed("zeppelin quartz").unwrap();
        assert!(vector.data.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_normalized_output_has_unit_norm() {
        let embedder = fitted_embedder(&["alpha beta gamma", "beta gamma delta"]);
        let vector = embedder.embed("alpha beta").unwrap();
        assert!((vector.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_similar_texts_are_closer_than_dissimilar() {
        let embedder = fitted_embedder(&[
            "plans and directs farm operations",
            "writes and tests computer software",
        ]);
        let query = embedder.embed("directs farm operations").unwrap();
        let farm = embedder.embed("plans and directs farm operations").unwrap();
        let code = embedder.embed("writes and tests computer software").unwrap();

        use crate::vector::DistanceMetric;
        let sim_farm = DistanceMetric::Cosine.similarity(&query.data, &farm.data).unwrap();
        let sim_code = DistanceMetric::Cosine.similarity(&query.data, &code.data).unwrap();
        assert!(sim_farm > sim_code);
    }

    #[test]
    fn test_fit_on_empty_corpus() {
        let embedder = fitted_embedder(&[]);
        assert!(embedder.is_fitted());
        assert_eq!(embedder.dimension(), 0);
        let vector = embedder.embed("anything").unwrap();
        assert!(vector.data.is_empty());
    }

    #[test]
    fn test_min_doc_freq_filters_rare_terms() {
        let config = EmbedderConfig {
            min_doc_freq: 2,
            ..EmbedderConfig::default()
        };
        let mut embedder = TfIdfEmbedder::new(config);
        embedder
            .fit(&["common rare1", "common rare2", "common rare3"])
            .unwrap();
        // Only "common" appears in at least two documents.
        assert_eq!(embedder.dimension(), 1);
    }

    #[test]
    fn test_max_vocab_size_caps_dimension() {
        let config = EmbedderConfig {
            max_vocab_size: 2,
            ..EmbedderConfig::default()
        };
        let mut embedder = TfIdfEmbedder::new(config);
        embedder.fit(&["a b c d e", "a b"]).unwrap();
        assert_eq!(embedder.dimension(), 2);
    }
}
