//! Hybrid fusion of lexical and semantic ranking signals.
//!
//! The fusion engine scores every indexed chunk with both back-ends, brings
//! the two raw score vectors onto a comparable scale with z-score
//! normalization, combines them with caller-supplied weights, keeps the best
//! chunk per role, and returns a ranked, truncated result list.

pub mod normalize;
pub mod searcher;

pub use normalize::zscore;
pub use searcher::{
    HybridSearcher, RankedResult, SearchRequest, SearchResponse, DEFAULT_LEXICAL_WEIGHT,
    DEFAULT_SEMANTIC_WEIGHT, DEFAULT_TOP_K,
};
