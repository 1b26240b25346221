//! # rolesearch
//!
//! Hybrid retrieval over occupational classification roles: each role (a
//! `dddd.dddd` role number plus a free-text description) is split into
//! overlapping token chunks, indexed by both a BM25 lexical back-end and an
//! embedding-cosine semantic back-end, and queried through a fusion engine
//! that z-score normalizes both signals, combines them with configurable
//! weights, and returns the best-scoring chunk per role.
//!
//! ## Features
//!
//! - Pure Rust implementation, fully in-memory
//! - Deterministic chunk ids and reproducible rankings
//! - Overlapping fixed-size token chunking
//! - BM25 lexical scoring over the complete chunk set
//! - Corpus-fitted TF-IDF embeddings with cosine similarity
//! - Z-score fused ranking with one result per role
//!
//! ## Example
//!
//! ```
//! use rolesearch::corpus::RoleCorpus;
//! use rolesearch::hybrid::{HybridSearcher, SearchRequest};
//! use rolesearch::index::IndexBuilder;
//!
//! # fn main() -> rolesearch::error::Result<()> {
//! let corpus = RoleCorpus::from_json_value(&serde_json::json!({
//!     "1111.0300": "Plans, organises and directs farm operations.",
//!     "2512.0100": "Designs, develops and tests software applications."
//! }))?;
//!
//! let index = IndexBuilder::new().build(&corpus)?;
//! let searcher = HybridSearcher::new(index);
//!
//! let response = searcher.search(&SearchRequest::new("software developer").top_k(1))?;
//! assert_eq!(response.results[0].role_number, "2512.0100");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod chunking;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod hybrid;
pub mod index;
pub mod lexical;
pub mod vector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
