//! Token types and utilities for text analysis.
//!
//! Tokens are the units that flow from the tokenizer through the token filters
//! and finally into the feature extractor, which counts them.
//!
//! # Examples
//!
//! ```
//! use scutum::analysis::token::{Token, TokenType};
//!
//! let token = Token::with_offsets("www_spam_biz", 2, 11, 23)
//!     .with_original_text("www.spam.biz")
//!     .with_token_type(TokenType::Url);
//!
//! assert_eq!(token.text, "www_spam_biz");
//! assert_eq!(token.original_text(), "www.spam.biz");
//! assert!(token.is_url());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Whether this token has been marked as stopped (removed) by a filter
    pub stopped: bool,

    /// Additional metadata that can be attached to tokens
    pub metadata: Option<TokenMetadata>,
}

/// Token type classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Plain words
    Word,
    /// URLs and bare host names
    Url,
}

/// Additional metadata that can be attached to tokens
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// The text as it was before normalization filters rewrote it
    pub original_text: Option<String>,

    /// Token type classification
    pub token_type: Option<TokenType>,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Self::with_offsets(text, position, 0, 0)
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
            metadata: None,
        }
    }

    /// Length of the token text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Set the original text in metadata.
    ///
    /// Only the first call sticks, so chained normalization filters keep the
    /// text exactly as the tokenizer produced it.
    pub fn with_original_text<S: Into<String>>(mut self, original: S) -> Self {
        let metadata = self.metadata.get_or_insert_with(TokenMetadata::default);
        if metadata.original_text.is_none() {
            metadata.original_text = Some(original.into());
        }
        self
    }

    /// Set the token type in metadata.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        let metadata = self.metadata.get_or_insert_with(TokenMetadata::default);
        metadata.token_type = Some(token_type);
        self
    }

    /// The text before any normalization, or the current text if untouched.
    pub fn original_text(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.original_text.as_deref())
            .unwrap_or(&self.text)
    }

    /// The token type, if a filter classified it.
    pub fn token_type(&self) -> Option<TokenType> {
        self.metadata.as_ref().and_then(|m| m.token_type)
    }

    /// Whether a filter classified this token as a link.
    pub fn is_url(&self) -> bool {
        self.token_type() == Some(TokenType::Url)
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello", 0);
        assert_eq!(token.text, "hello");
        assert_eq!(token.position, 0);
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 0);
        assert!(!token.stopped);
        assert!(token.metadata.is_none());
    }

    #[test]
    fn test_original_text_sticks_to_first_value() {
        let token = Token::new("cafe", 0)
            .with_original_text("Café")
            .with_original_text("café");

        assert_eq!(token.original_text(), "Café");
        assert_eq!(Token::new("plain", 0).original_text(), "plain");
    }

    #[test]
    fn test_token_type() {
        let token = Token::new("http", 0).with_token_type(TokenType::Url);
        assert!(token.is_url());
        assert!(!Token::new("http", 0).is_url());
        let word = Token::new("http", 0).with_token_type(TokenType::Word);
        assert_eq!(word.token_type(), Some(TokenType::Word));
        assert!(!word.is_url());
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Token::new("ção", 0).char_len(), 3);
    }
}
