// Word-frequency multiset and its serialized form, the on-disk contract
// between ingestion runs and analysis runs.
use serde::{Deserialize, Serialize};

/// Word counts for a single article, kept in first-seen order.
///
/// The persisted form is a JSON array of `(word, count)` pairs and must
/// round-trip exactly through [`WordCounts::parse_record`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCounts {
    pairs: Vec<(String, u32)>,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: Vec<(String, u32)>) -> Self {
        Self { pairs }
    }

    /// Counts one occurrence of `word`, appending it on first sight.
    pub fn add(&mut self, word: &str) {
        match self.pairs.iter_mut().find(|(w, _)| w == word) {
            Some((_, count)) => *count += 1,
            None => self.pairs.push((word.to_string(), 1)),
        }
    }

    pub fn count(&self, word: &str) -> u32 {
        self.pairs
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.pairs.iter().any(|(w, _)| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.pairs.iter().map(|(w, c)| (w.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn parse_record(record: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(record)
    }
}
