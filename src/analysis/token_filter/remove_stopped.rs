//! Filter that drops stopped tokens from the stream.

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A filter that removes every token marked as stopped.
#[derive(Clone, Debug, Default)]
pub struct RemoveStoppedFilter;

impl RemoveStoppedFilter {
    /// Create a new remove-stopped filter.
    pub fn new() -> Self {
        RemoveStoppedFilter
    }
}

impl Filter for RemoveStoppedFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(|token| !token.is_stopped())))
    }

    fn name(&self) -> &'static str {
        "remove_stopped"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_remove_stopped_filter() {
        let filter = RemoveStoppedFilter::new();
        let tokens = vec![
            Token::new("keep", 0),
            Token::new("drop", 1).stop(),
            Token::new("also", 2),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "keep");
        assert_eq!(result[1].text, "also");
    }
}
