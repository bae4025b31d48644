//! Sparse, insertion-ordered feature vectors.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Mapping from feature name to a non-negative frequency.
///
/// Iteration follows insertion order, which is what makes vocabulary
/// construction reproducible. Two vectors are equal when they hold the same
/// features with the same counts in the same order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(String, u32)>", into = "Vec<(String, u32)>")]
pub struct FeatureVector {
    entries: Vec<(String, u32)>,
    index: AHashMap<String, usize>,
}

impl FeatureVector {
    /// Create an empty feature vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty feature vector with room for `capacity` features.
    pub fn with_capacity(capacity: usize) -> Self {
        FeatureVector {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    /// Add `by` to a feature, inserting it at the end when absent.
    pub fn increment(&mut self, name: &str, by: u32) {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].1 += by,
            None => self.push(name.to_string(), by),
        }
    }

    /// Set a feature's frequency, inserting it at the end when absent.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: u32) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => self.entries[slot].1 = value,
            None => self.push(name, value),
        }
    }

    fn push(&mut self, name: String, value: u32) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
    }

    /// Frequency of a feature, or `None` when the feature is absent.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|&slot| self.entries[slot].1)
    }

    /// Whether the feature is present (even with frequency zero).
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Keep only the features for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, u32) -> bool) {
        self.entries.retain(|(name, value)| keep(name, *value));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, (name, _))| (name.clone(), slot))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, frequency)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Feature names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Frequencies in insertion order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(_, value)| *value)
    }

    /// Sum of all frequencies.
    pub fn total(&self) -> u64 {
        self.values().map(u64::from).sum()
    }
}

impl PartialEq for FeatureVector {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl From<Vec<(String, u32)>> for FeatureVector {
    fn from(entries: Vec<(String, u32)>) -> Self {
        let mut vector = FeatureVector::with_capacity(entries.len());
        for (name, value) in entries {
            vector.insert(name, value);
        }
        vector
    }
}

impl From<FeatureVector> for Vec<(String, u32)> {
    fn from(vector: FeatureVector) -> Self {
        vector.entries
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut vector = FeatureVector::new();
        for (name, value) in iter {
            vector.insert(name, value);
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_preserves_first_seen_order() {
        let mut vector = FeatureVector::new();
        vector.increment("money", 1);
        vector.increment("free", 1);
        vector.increment("money", 2);

        assert_eq!(vector.keys().collect::<Vec<_>>(), vec!["money", "free"]);
        assert_eq!(vector.get("money"), Some(3));
        assert_eq!(vector.get("absent"), None);
    }

    #[test]
    fn test_retain_reindexes() {
        let mut vector: FeatureVector = vec![("a", 1), ("b", 5), ("c", 3)].into_iter().collect();
        vector.retain(|_, value| value >= 3);

        assert_eq!(vector.len(), 2);
        assert_eq!(vector.get("c"), Some(3));
        vector.increment("c", 1);
        assert_eq!(vector.get("c"), Some(4));
        assert!(!vector.contains("a"));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let left: FeatureVector = vec![("a", 1), ("b", 2)].into_iter().collect();
        let right: FeatureVector = vec![("b", 2), ("a", 1)].into_iter().collect();
        let same: FeatureVector = vec![("a", 1), ("b", 2)].into_iter().collect();

        assert_ne!(left, right);
        assert_eq!(left, same);
    }

    #[test]
    fn test_serde_keeps_order() {
        let vector: FeatureVector = vec![("zeta", 4), ("alpha", 3)].into_iter().collect();
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"[["zeta",4],["alpha",3]]"#);

        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
        assert_eq!(back.get("alpha"), Some(3));
    }

    #[test]
    fn test_total() {
        let vector: FeatureVector = vec![("x", 2), ("y", 0)].into_iter().collect();
        assert_eq!(vector.total(), 2);
    }
}
