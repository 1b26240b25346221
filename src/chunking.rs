//! Fixed-size overlapping token chunking.
//!
//! Long role descriptions are split into token windows before indexing so
//! that both back-ends score bounded, topically dense pieces of text. Each
//! window holds up to `max_tokens` tokens and consecutive windows share
//! `overlap` tokens, except the final window which may be shorter and is not
//! overlapped further.
//!
//! # Examples
//!
//! ```
//! use rolesearch::chunking::ChunkingConfig;
//!
//! let config = ChunkingConfig::new(4, 1).unwrap();
//! let chunks = config.split("a b c d e f");
//! assert_eq!(chunks, vec!["a b c d", "d e f"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::tokenize;
use crate::error::{Result, RoleSearchError};

/// Configuration for the token chunker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum number of tokens per chunk.
    pub max_tokens: usize,
    /// Number of tokens shared between consecutive chunks.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 250,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    /// Create a validated chunking configuration.
    ///
    /// Returns a configuration error when `max_tokens` is zero or when
    /// `overlap >= max_tokens`, which would make the window fail to advance.
    pub fn new(max_tokens: usize, overlap: usize) -> Result<Self> {
        let config = Self {
            max_tokens,
            overlap,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the window parameters.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(RoleSearchError::configuration(
                "max_tokens must be positive",
            ));
        }
        if self.overlap >= self.max_tokens {
            return Err(RoleSearchError::configuration(format!(
                "overlap ({}) must be less than max_tokens ({})",
                self.overlap, self.max_tokens
            )));
        }
        Ok(())
    }

    /// Split text into overlapping token windows.
    ///
    /// Empty text yields no chunks; text of at most `max_tokens` tokens
    /// yields exactly one. Each chunk's text is its tokens rejoined with
    /// single spaces, in order.
    pub fn split(&self, text: &str) -> Vec<String> {
        let words = tokenize(text);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < words.len() {
            let end = (start + self.max_tokens).min(words.len());
            chunks.push(words[start..end].join(" "));
            if start + self.max_tokens >= words.len() {
                break;
            }
            // Slide back so the next window repeats the last `overlap` tokens.
            start = end - self.overlap;
        }

        chunks
    }
}
