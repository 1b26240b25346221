//! Unicode word tokenization.
//!
//! Splits text using Unicode word boundary rules (UAX #29) and keeps only
//! word segments, dropping punctuation and whitespace. The same splitter is
//! used for chunking, for building the lexical index, and for queries, so a
//! term that survives indexing always survives querying.
//!
//! # Examples
//!
//! ```
//! use rolesearch::analysis::tokenize;
//!
//! let tokens = tokenize("Plans, organises and directs work.");
//! assert_eq!(tokens, vec!["Plans", "organises", "and", "directs", "work"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

/// Split text into word tokens on Unicode word boundaries.
///
/// Case is preserved; chunk texts are rebuilt from these tokens so the
/// stored text keeps its original casing.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_owned).collect()
}

/// Split text into lowercased word tokens.
///
/// This is the form the lexical back-end indexes and queries with.
pub fn tokenize_lowercase(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(|word| word.to_lowercase())
        .collect()
}
