// Text normalization: raw article text into a content-word multiset.
use std::collections::HashSet;
use std::fs;

use crate::wordfreq::WordCounts;

const DEFAULT_STOPWORDS: &str = "a about above after again against all am an and \
any are as at be because been before being below between both but by could did \
do does doing down during each few for from further had has have having he her \
here hers herself him himself his how i if in into is it its itself just me \
more most my myself no nor not now of off on once only or other our ours \
ourselves out over own said same she should so some such than that the their \
theirs them themselves then there these they this those through to too under \
until up very was we were what when where which while who whom why will with \
would you your yours yourself yourselves";

/// Reduces raw article text to lowercase alphabetic content words with
/// stopwords removed and simple plurals singularized.
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Normalizer {
    /// Normalizer with the built-in stopword list.
    pub fn new() -> Self {
        Self::with_stopwords(DEFAULT_STOPWORDS)
    }

    /// Normalizer with a whitespace-separated stopword file.
    pub fn from_file(path: &str) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::with_stopwords(&content))
    }

    fn with_stopwords(words: &str) -> Self {
        Self {
            stopwords: words
                .split_whitespace()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Word counts of the normalized content words in `text`.
    pub fn word_counts(&self, text: &str) -> WordCounts {
        let mut counts = WordCounts::new();
        for token in text.split(|c: char| !c.is_alphabetic()) {
            if token.len() < 2 {
                continue;
            }
            let word = token.to_lowercase();
            if self.stopwords.contains(&word) {
                continue;
            }
            let word = singularize(&word);
            if self.stopwords.contains(&word) {
                continue;
            }
            counts.add(&word);
        }
        counts
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips the plural "s" from regular plurals. Words ending in "ss" or too
/// short to carry a plural suffix are left alone.
fn singularize(word: &str) -> String {
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}
