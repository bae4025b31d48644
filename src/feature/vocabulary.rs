//! Frozen, ordered vocabularies.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::feature::vector::FeatureVector;

/// Ordered set of distinct feature names recognised by a model.
///
/// Order is first-seen order over the training corpus. Once a model is
/// trained its vocabulary never grows; unknown features met at
/// classification time are discarded by [`Vocabulary::align`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    names: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feature unless it is already known. Returns whether it was added.
    pub fn observe(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
        true
    }

    /// Position of a feature in the vocabulary.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Project a feature vector onto this vocabulary.
    ///
    /// The result holds every vocabulary feature, in vocabulary order, with
    /// frequency 0 where the input lacks it. Features outside the vocabulary
    /// are dropped.
    pub fn align(&self, features: &FeatureVector) -> FeatureVector {
        let mut aligned = FeatureVector::with_capacity(self.names.len());
        for name in &self.names {
            aligned.insert(name.as_str(), features.get(name).unwrap_or(0));
        }
        aligned
    }

    /// Whether the vector's keys are exactly this vocabulary, in order.
    pub fn is_aligned(&self, features: &FeatureVector) -> bool {
        features.len() == self.names.len()
            && features.keys().zip(self.iter()).all(|(left, right)| left == right)
    }

    /// Zip a dense vector with the vocabulary into `(name, value)` pairs.
    pub fn label_values<'a, T: Copy>(
        &'a self,
        values: &'a [T],
    ) -> impl Iterator<Item = (&'a str, T)> + 'a {
        self.iter().zip(values.iter().copied())
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(names: Vec<String>) -> Self {
        let mut vocabulary = Vocabulary::new();
        for name in &names {
            vocabulary.observe(name);
        }
        vocabulary
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.names
    }
}

impl<'a> FromIterator<&'a str> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut vocabulary = Vocabulary::new();
        for name in iter {
            vocabulary.observe(name);
        }
        vocabulary
    }
}
