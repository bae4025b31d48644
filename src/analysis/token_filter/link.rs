//! Link detection filter.
//!
//! Comments carry links as separate tokens once the tokenizer splits on `/`:
//! `http://www.spam.biz/buy` yields `http:` and `www.spam.biz`. This filter
//! must run after [`SlugFilter`](super::SlugFilter) because it inspects both
//! the raw token (scheme prefix) and its slug form (`www_` prefix).

use super::Filter;
use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::error::Result;

const SCHEME_PREFIXES: [&str; 2] = ["http:", "https:"];
const HOST_PREFIX: &str = "www_";

/// A filter that tags URL-like tokens with [`TokenType::Url`] and every
/// other live token with [`TokenType::Word`].
#[derive(Clone, Debug, Default)]
pub struct LinkFilter;

impl LinkFilter {
    /// Create a new link filter.
    pub fn new() -> Self {
        LinkFilter
    }

    /// Whether the token looks like a link.
    pub fn is_link(token: &Token) -> bool {
        let raw = token.original_text().to_lowercase();
        SCHEME_PREFIXES.iter().any(|scheme| raw.starts_with(scheme))
            || token.text.starts_with(HOST_PREFIX)
    }
}

impl Filter for LinkFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else if Self::is_link(&token) {
                    token.with_token_type(TokenType::Url)
                } else {
                    token.with_token_type(TokenType::Word)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "link"
    }
}
