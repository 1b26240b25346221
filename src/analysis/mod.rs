//! Text analysis for indexing and querying.
//!
//! Both back-ends and the chunker run the same word tokenization so the
//! token universe stays consistent from ingestion through query time.

pub mod tokenizer;

pub use tokenizer::{tokenize, tokenize_lowercase};
