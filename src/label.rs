//! Class labels and per-label containers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScutumError};

/// The two classes a comment can belong to.
///
/// The declaration order matters: [`Label::ALL`] lists `Spam` first, and
/// classifiers resolve score ties in favour of the first label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Unsolicited content. Numeric value `+1`.
    Spam,
    /// Legitimate content. Numeric value `-1`.
    NotSpam,
}

impl Label {
    /// All labels, in tie-breaking order.
    pub const ALL: [Label; 2] = [Label::Spam, Label::NotSpam];

    /// Numeric representation used by margin-based learners.
    pub fn sign(self) -> f64 {
        match self {
            Label::Spam => 1.0,
            Label::NotSpam => -1.0,
        }
    }

    /// Label for a raw score; zero maps to `Spam`.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.0 {
            Label::Spam
        } else {
            Label::NotSpam
        }
    }

    /// Canonical string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::NotSpam => "not_spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ScutumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spam" | "1" | "true" => Ok(Label::Spam),
            "not_spam" | "not-spam" | "ham" | "-1" | "0" | "false" => Ok(Label::NotSpam),
            other => Err(ScutumError::invalid_argument(format!(
                "unknown label '{other}'"
            ))),
        }
    }
}

/// One value per label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerLabel<T> {
    pub spam: T,
    pub not_spam: T,
}

impl<T> PerLabel<T> {
    /// Build from a function of the label.
    pub fn from_fn(mut f: impl FnMut(Label) -> T) -> Self {
        PerLabel {
            spam: f(Label::Spam),
            not_spam: f(Label::NotSpam),
        }
    }

    pub fn get(&self, label: Label) -> &T {
        match label {
            Label::Spam => &self.spam,
            Label::NotSpam => &self.not_spam,
        }
    }

    pub fn get_mut(&mut self, label: Label) -> &mut T {
        match label {
            Label::Spam => &mut self.spam,
            Label::NotSpam => &mut self.not_spam,
        }
    }

    /// Iterate in [`Label::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &T)> {
        Label::ALL.into_iter().map(move |label| (label, self.get(label)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Label, &T) -> U) -> PerLabel<U> {
        PerLabel::from_fn(|label| f(label, self.get(label)))
    }
}
