//! Z-score normalization of raw score vectors.
//!
//! Lexical and semantic raw scores live on unrelated scales (unbounded BM25
//! vs. cosine similarity in `[0, 1]`), so each vector is rescaled to zero
//! mean and unit variance before the weighted combination. The statistics
//! are population statistics over the whole vector and are recomputed from
//! scratch on every query, since the distribution depends on the query and
//! candidate set.

/// Z-score normalize a raw score vector.
///
/// Returns `(x - mean) / stddev` per element. When the standard deviation is
/// exactly zero (all scores identical, including the all-zero no-match
/// case), returns a vector of zeros instead of dividing by zero.
pub fn zscore(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let n = scores.len() as f32;
    let mean = scores.iter().sum::<f32>() / n;
    let variance = scores.iter().map(|&x| (x - mean).powi(2)).sum::<f32>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return vec![0.0; scores.len()];
    }

    scores.iter().map(|&x| (x - mean) / stddev).collect()
}
