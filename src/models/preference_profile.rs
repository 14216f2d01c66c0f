use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::services::keywords::keyword_tokens;

/// Learned user interest: keyword to cumulative occurrence count
///
/// Serializes as a flat JSON object, `{ "<keyword>": <count>, ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PreferenceProfile(BTreeMap<String, u64>);

impl PreferenceProfile {
    /// Creates an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence per input keyword token, repeats included
    ///
    /// Input is tokenized like extracted keywords: split on whitespace,
    /// case-folded, stopwords dropped. Blank input is ignored.
    pub fn record<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            for token in keyword_tokens(keyword.as_ref()) {
                let count = self.0.entry(token).or_insert(0);
                *count = count.saturating_add(1);
            }
        }
    }

    /// Count for a keyword, 0 when never seen
    pub fn count(&self, keyword: &str) -> u64 {
        self.0.get(keyword).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for PreferenceProfile {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
