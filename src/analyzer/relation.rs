use crate::analyzer::keywords;
use crate::embedding::Embedder;
use crate::model::{Company, RelationBounds, StorageError};
use crate::storage::SqliteStorage;

/// Raw similarities are rescaled by this factor and squared before summing,
/// so strong keyword matches dominate the aggregate.
const SIMILARITY_SCALE: f64 = 10.0 / 2.5;

/// Scores one company pair: builds the k×k keyword similarity matrix,
/// reduces it to the pair's relation value and persists both orderings.
///
/// The stored matrix for (B, A) is the transpose of the one for (A, B) and
/// both rows carry the same scalar. A side with fewer than `k` keywords
/// leaves its remaining cells at zero. Keyword selection is triggered here
/// when a company has none yet. Returns `Ok(false)` when the pair was
/// already scored.
pub fn score_pair(
    a: &mut Company,
    b: &mut Company,
    storage: &SqliteStorage,
    embedder: &dyn Embedder,
    k: usize,
) -> Result<bool, StorageError> {
    if storage.relation_exists(&a.name, &b.name)? {
        return Ok(false);
    }

    keywords::choose(a, storage, embedder, k)?;
    keywords::choose(b, storage, embedder, k)?;

    let mut forward = vec![0.0; k * k];
    let mut backward = vec![0.0; k * k];
    let mut final_value = 0.0;

    for (i, word_a) in a.keywords.iter().take(k).enumerate() {
        for (j, word_b) in b.keywords.iter().take(k).enumerate() {
            let similarity = embedder.similarity(word_a, word_b);
            forward[i * k + j] = similarity;
            backward[j * k + i] = similarity;
            final_value += (similarity * SIMILARITY_SCALE).powi(2);
        }
    }

    storage.save_relation(&a.name, &b.name, &forward, final_value)?;
    storage.save_relation(&b.name, &a.name, &backward, final_value)?;
    Ok(true)
}

/// Relation-value extremes over every ordered pair of the active set.
/// `None` when no pair has a stored relation yet.
pub fn bounds(
    companies: &[Company],
    storage: &SqliteStorage,
) -> Result<Option<RelationBounds>, StorageError> {
    let mut bounds: Option<RelationBounds> = None;
    for (i, a) in companies.iter().enumerate() {
        for (j, b) in companies.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(value) = storage.relation_value(&a.name, &b.name)? else {
                continue;
            };
            bounds = Some(match bounds {
                None => RelationBounds { max: value, min: value },
                Some(cur) => RelationBounds {
                    max: cur.max.max(value),
                    min: cur.min.min(value),
                },
            });
        }
    }
    Ok(bounds)
}
