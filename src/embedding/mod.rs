//! Text embedding for the semantic back-end.
//!
//! The [`TextEmbedder`] trait is the seam between the fusion engine and
//! whatever produces dense vectors. The shipped implementation is a
//! corpus-fitted TF-IDF engine: deterministic, dependency-free, and fitted
//! once per corpus build so queries and chunks share one representation.

pub mod engine;

pub use engine::{EmbedderConfig, TfIdfEmbedder};

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to fixed-dimension dense vectors.
///
/// Implementations must be deterministic: embedding the same text twice
/// yields the same vector, which is what makes `search` reproducible.
pub trait TextEmbedder: Send + Sync {
    /// The output dimension. Fixed once the embedder is fitted.
    fn dimension(&self) -> usize;

    /// Whether the embedder has been fitted and can embed text.
    fn is_fitted(&self) -> bool;

    /// Embed a text into a dense vector of `dimension()` elements.
    fn embed(&self, text: &str) -> Result<Vector>;
}
