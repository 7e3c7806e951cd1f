//! Error types for symtrie

use thiserror::Error;

/// Result type alias for fallible symtrie operations
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors raised while configuring a trie rendering
#[derive(Error, Debug)]
pub enum TrieError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glyph {glyph:?} for `{field}`: glyphs must be visible characters")]
    InvalidGlyph { field: &'static str, glyph: char },

    #[error("Glyph {0:?} is used both as the bar and as another glyph")]
    DuplicateGlyph(char),
}
