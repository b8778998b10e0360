// Word-vector lookup used for keyword screening and similarity scoring.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::debug;

use crate::model::EmbeddingError;

/// Embedding collaborator: vector coverage checks and pairwise word
/// similarity, nominally in [-1, 1].
pub trait Embedder {
    fn has_vector(&self, word: &str) -> bool;
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Dense word vectors loaded from a whitespace-separated text file
/// (`word v1 v2 ...` per line, the common word2vec/GloVe text layout).
pub struct WordVectors {
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    pub fn load(path: &str) -> Result<Self, EmbeddingError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut vectors = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = parts_of(&line);
            let Some(word) = parts.next() else {
                continue;
            };
            // word2vec text files open with a "vocab dimension" header line
            if idx == 0 && word.parse::<usize>().is_ok() && parts_of(&line).count() == 2 {
                continue;
            }
            let values = parts
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|_| EmbeddingError::Malformed(idx + 1))?;
            if values.is_empty() {
                return Err(EmbeddingError::Malformed(idx + 1));
            }
            vectors.insert(word.to_string(), values);
        }

        debug!("Loaded {} word vectors", vectors.len());
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn parts_of(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

impl Embedder for WordVectors {
    fn has_vector(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    /// Cosine similarity, or 0 when either word has no vector.
    fn similarity(&self, a: &str, b: &str) -> f64 {
        match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => cosine(va, vb),
            _ => 0.0,
        }
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x * y) as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (x * x) as f64).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (x * x) as f64).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
