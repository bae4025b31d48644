//! Raw text to feature vectors.

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, CommentAnalyzer};
use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::feature::vector::FeatureVector;

/// Turns raw comment text into a sparse token-frequency map.
///
/// Every vector starts with the links counter, then holds normalized tokens
/// in first-seen order. Tokens whose frequency within the document stays
/// below `min_frequency` are dropped once the whole text has been scanned;
/// the links counter is never dropped, even at zero.
#[derive(Clone)]
pub struct FeatureExtractor {
    analyzer: Arc<dyn Analyzer>,
    min_frequency: u32,
    links_feature: String,
}

impl FeatureExtractor {
    /// Create an extractor with the default comment analysis settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let analyzer =
            CommentAnalyzer::with_settings(&config.separator_pattern, config.min_token_length)?;
        Ok(Self::with_analyzer(
            Arc::new(analyzer),
            config.min_frequency,
            config.links_feature.clone(),
        ))
    }

    /// Create an extractor over any analyzer.
    pub fn with_analyzer<S: Into<String>>(
        analyzer: Arc<dyn Analyzer>,
        min_frequency: u32,
        links_feature: S,
    ) -> Self {
        FeatureExtractor {
            analyzer,
            min_frequency,
            links_feature: links_feature.into(),
        }
    }

    pub fn links_feature(&self) -> &str {
        &self.links_feature
    }

    pub fn min_frequency(&self) -> u32 {
        self.min_frequency
    }

    /// Extract the feature vector of one document.
    pub fn extract(&self, text: &str) -> Result<FeatureVector> {
        let mut features = FeatureVector::new();
        features.insert(self.links_feature.as_str(), 0);

        for token in self.analyzer.analyze(text)? {
            if token.is_url() {
                features.increment(&self.links_feature, 1);
            }
            // A token spelled like the links counter must not inflate it.
            if token.text != self.links_feature {
                features.increment(&token.text, 1);
            }
        }

        let links_feature = self.links_feature.as_str();
        let min_frequency = self.min_frequency;
        features.retain(|name, frequency| name == links_feature || frequency >= min_frequency);

        Ok(features)
    }

    /// Extract every document of a batch, preserving order.
    pub fn extract_all<'a, I>(&self, texts: I) -> Result<Vec<FeatureVector>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|text| self.extract(text)).collect()
    }
}

impl std::fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("analyzer", &self.analyzer.name())
            .field("min_frequency", &self.min_frequency)
            .field("links_feature", &self.links_feature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prunes_rare_tokens() {
        let extractor = FeatureExtractor::new().unwrap();
        let features = extractor
            .extract("money money money free free hello")
            .unwrap();

        assert_eq!(
            features.iter().collect::<Vec<_>>(),
            vec![("links_count", 0), ("money", 3)]
        );
    }

    #[test]
    fn test_extract_counts_links() {
        let extractor = FeatureExtractor::new().unwrap();
        let features = extractor
            .extract("http://a.example www.spam.biz www.spam.biz www.spam.biz")
            .unwrap();

        // "http:" and three "www_spam_biz" tokens are links.
        assert_eq!(features.get("links_count"), Some(4));
        assert_eq!(features.get("www_spam_biz"), Some(3));
        assert!(!features.contains("http"));
    }

    #[test]
    fn test_extract_folds_case_and_diacritics() {
        let extractor = FeatureExtractor::new().unwrap();
        let features = extractor.extract("Café CAFE cafe").unwrap();
        assert_eq!(features.get("cafe"), Some(3));
    }

    #[test]
    fn test_extract_empty_text() {
        let extractor = FeatureExtractor::new().unwrap();
        let features = extractor.extract("").unwrap();
        assert_eq!(features.iter().collect::<Vec<_>>(), vec![("links_count", 0)]);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let extractor = FeatureExtractor::new().unwrap();
        let text = "Buy buy BUY cheap cheap cheap pills <a href='http://x.biz'>now</a>";
        assert_eq!(extractor.extract(text).unwrap(), extractor.extract(text).unwrap());
    }

    #[test]
    fn test_min_frequency_from_config() {
        let config = ExtractionConfig {
            min_frequency: 1,
            ..ExtractionConfig::default()
        };
        let extractor = FeatureExtractor::from_config(&config).unwrap();
        let features = extractor.extract("hello friend").unwrap();

        assert_eq!(
            features.keys().collect::<Vec<_>>(),
            vec!["links_count", "hello", "friend"]
        );
    }
}
