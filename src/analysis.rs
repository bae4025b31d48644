//! Text analysis module for Scutum.
//!
//! Raw comment text flows through a tokenizer and a chain of token filters
//! before the feature extractor counts what is left:
//!
//! ```text
//! Raw Text → RegexTokenizer (separator gaps)
//!          → LowercaseFilter → SlugFilter → MinLengthFilter
//!          → LinkFilter → RemoveStoppedFilter → Token Stream
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
