//! Slug filter: ASCII folding plus separator collapsing.
//!
//! Each token is decomposed (NFKD), stripped of combining marks, and a few
//! letters without a decomposition are transliterated (`ß` becomes `ss`,
//! `ø` becomes `o`). Every run of characters that are neither letters nor
//! digits collapses into a single `_`, and leading or trailing `_` are
//! trimmed, so `"www.spam.biz"` becomes `"www_spam_biz"` and `"http:"`
//! becomes `"http"`. Tokens that fold to nothing are stopped.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Replacement used between the alphanumeric runs of a token.
pub const SLUG_SEPARATOR: char = '_';

/// A filter that rewrites tokens into their slug form.
#[derive(Clone, Debug, Default)]
pub struct SlugFilter;

impl SlugFilter {
    /// Create a new slug filter.
    pub fn new() -> Self {
        SlugFilter
    }

    /// Fold a single string into its slug form.
    pub fn slugify(text: &str) -> String {
        let mut slug = String::with_capacity(text.len());
        let mut pending_separator = false;

        for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
            if c.is_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push(SLUG_SEPARATOR);
                }
                pending_separator = false;
                match transliterate(c) {
                    Some(replacement) => slug.push_str(replacement),
                    None => slug.push(c),
                }
            } else {
                pending_separator = true;
            }
        }

        slug
    }
}

/// Letters that NFKD leaves intact but which have a customary ASCII spelling.
fn transliterate(c: char) -> Option<&'static str> {
    let replacement = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'đ' => "d",
        'Đ' => "D",
        'ł' => "l",
        'Ł' => "L",
        'þ' => "th",
        'Þ' => "TH",
        'ð' => "d",
        'Ð' => "D",
        _ => return None,
    };
    Some(replacement)
}

impl Filter for SlugFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    return token;
                }
                let slug = Self::slugify(&token.text);
                let original = token.text.clone();
                let token = token.with_text(slug).with_original_text(original);
                if token.is_empty() { token.stop() } else { token }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "slug"
    }
}
