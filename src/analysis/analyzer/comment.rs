//! Analyzer for blog and forum comments.

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{
    LinkFilter, LowercaseFilter, MinLengthFilter, RemoveStoppedFilter, SlugFilter,
};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::analysis::tokenizer::regex::COMMENT_SEPARATOR_PATTERN;
use crate::error::Result;

/// Default minimum token length, in characters, after normalization.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// The comment analyzer splits on whitespace and markup punctuation,
/// lowercases, folds each token into its ASCII slug, drops tokens shorter
/// than the minimum length and tags links.
///
/// # Examples
///
/// ```
/// use scutum::analysis::analyzer::{Analyzer, CommentAnalyzer};
///
/// let analyzer = CommentAnalyzer::new().unwrap();
/// let tokens: Vec<_> = analyzer
///     .analyze("Olá! Visit http://www.spam.biz now")
///     .unwrap()
///     .collect();
///
/// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, vec!["ola", "visit", "http", "www_spam_biz", "now"]);
/// assert!(tokens[2].is_url());
/// assert!(tokens[3].is_url());
/// ```
#[derive(Clone, Debug)]
pub struct CommentAnalyzer {
    inner: PipelineAnalyzer,
}

impl CommentAnalyzer {
    /// Create a comment analyzer with the default separators and minimum length.
    pub fn new() -> Result<Self> {
        Self::with_settings(COMMENT_SEPARATOR_PATTERN, DEFAULT_MIN_TOKEN_LENGTH)
    }

    /// Create a comment analyzer with a custom separator pattern and minimum length.
    pub fn with_settings(separator_pattern: &str, min_token_length: usize) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_gaps(separator_pattern)?);
        let inner = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(SlugFilter::new()))
            .add_filter(Arc::new(MinLengthFilter::new(min_token_length)))
            .add_filter(Arc::new(LinkFilter::new()))
            .add_filter(Arc::new(RemoveStoppedFilter::new()))
            .with_name("comment");

        Ok(Self { inner })
    }
}

impl Analyzer for CommentAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "comment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(analyzer: &CommentAnalyzer, input: &str) -> Vec<String> {
        analyzer.analyze(input).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_short_tokens_are_dropped() {
        let analyzer = CommentAnalyzer::new().unwrap();
        assert_eq!(texts(&analyzer, "I am so ok"), Vec::<String>::new());
        assert_eq!(texts(&analyzer, "a big cat"), vec!["big", "cat"]);
    }

    #[test]
    fn test_length_is_checked_after_folding() {
        let analyzer = CommentAnalyzer::new().unwrap();
        // "é!" folds to "e", "(ab)" splits to "ab".
        assert_eq!(texts(&analyzer, "é! (ab) Ação"), vec!["acao"]);
    }

    #[test]
    fn test_custom_min_length() {
        let analyzer = CommentAnalyzer::with_settings(COMMENT_SEPARATOR_PATTERN, 5).unwrap();
        assert_eq!(texts(&analyzer, "tiny words remain"), vec!["words", "remain"]);
    }

    #[test]
    fn test_analyzer_name() {
        assert_eq!(CommentAnalyzer::new().unwrap().name(), "comment");
    }
}
