use crate::embedding::Embedder;
use crate::model::{Company, Stage, StorageError};
use crate::storage::SqliteStorage;

/// Chooses up to `k` keywords for the company by walking its term-importance
/// ranking from the top and keeping only words the embedder can represent.
///
/// Keyword lists persist across runs: a stored list is loaded instead of
/// re-derived. Ending up with fewer than `k` keywords is not an error.
/// Returns `Ok(false)` when nothing new was chosen.
pub fn choose(
    company: &mut Company,
    storage: &SqliteStorage,
    embedder: &dyn Embedder,
    k: usize,
) -> Result<bool, StorageError> {
    if company.stage >= Stage::KeywordsChosen {
        return Ok(false);
    }

    if let Some(stored) = storage.keywords(&company.name)? {
        company.keywords = stored;
        company.stage = Stage::KeywordsChosen;
        return Ok(false);
    }

    if company.term_importance.is_empty() {
        return Ok(false);
    }

    let mut keywords = Vec::with_capacity(k);
    for (word, _) in &company.term_importance {
        if keywords.len() >= k {
            break;
        }
        if embedder.has_vector(word) {
            keywords.push(word.clone());
        }
    }

    storage.save_keywords(&company.name, &keywords)?;
    company.keywords = keywords;
    company.stage = Stage::KeywordsChosen;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEmbedder {
        known: Vec<&'static str>,
    }

    impl Embedder for FixedEmbedder {
        fn has_vector(&self, word: &str) -> bool {
            self.known.iter().any(|w| *w == word)
        }

        fn similarity(&self, _a: &str, _b: &str) -> f64 {
            0.0
        }
    }

    fn ranked_company() -> Company {
        let mut company = Company::new("ACME", "Acme");
        company.term_importance = vec![
            ("merger".to_string(), 5.0),
            ("xqzt".to_string(), 4.0),
            ("bank".to_string(), 3.0),
            ("bond".to_string(), 2.0),
            ("rate".to_string(), 1.0),
        ];
        company.stage = Stage::TermsComputed;
        company
    }

    #[test]
    fn keeps_rank_order_and_skips_unrepresentable_words() {
        let storage = SqliteStorage::in_memory().unwrap();
        let embedder = FixedEmbedder { known: vec!["merger", "bank", "bond", "rate"] };
        let mut company = ranked_company();

        assert!(choose(&mut company, &storage, &embedder, 3).unwrap());
        assert_eq!(company.keywords, vec!["merger", "bank", "bond"]);
        assert_eq!(company.stage, Stage::KeywordsChosen);
    }

    #[test]
    fn accepts_fewer_than_k_when_ranking_runs_out() {
        let storage = SqliteStorage::in_memory().unwrap();
        let embedder = FixedEmbedder { known: vec!["merger", "rate"] };
        let mut company = ranked_company();

        assert!(choose(&mut company, &storage, &embedder, 10).unwrap());
        assert_eq!(company.keywords, vec!["merger", "rate"]);
    }

    #[test]
    fn stored_list_is_loaded_instead_of_rederived() {
        let storage = SqliteStorage::in_memory().unwrap();
        let embedder = FixedEmbedder { known: vec!["merger", "bank"] };

        let mut company = ranked_company();
        assert!(choose(&mut company, &storage, &embedder, 2).unwrap());

        // a later run starts over with no term importance at all
        let mut revived = Company::new("ACME", "Acme");
        assert!(!choose(&mut revived, &storage, &embedder, 2).unwrap());
        assert_eq!(revived.keywords, vec!["merger", "bank"]);
        assert_eq!(revived.stage, Stage::KeywordsChosen);
    }

    #[test]
    fn empty_ranking_selects_nothing() {
        let storage = SqliteStorage::in_memory().unwrap();
        let embedder = FixedEmbedder { known: vec![] };
        let mut company = Company::new("ACME", "Acme");
        company.stage = Stage::TermsComputed;

        assert!(!choose(&mut company, &storage, &embedder, 5).unwrap());
        assert!(company.keywords.is_empty());
        assert!(storage.keywords("Acme").unwrap().is_none());
        assert_eq!(company.stage, Stage::TermsComputed);
    }

    #[test]
    fn repeat_invocation_is_a_no_op() {
        let storage = SqliteStorage::in_memory().unwrap();
        let embedder = FixedEmbedder { known: vec!["merger"] };
        let mut company = ranked_company();

        assert!(choose(&mut company, &storage, &embedder, 1).unwrap());
        assert!(!choose(&mut company, &storage, &embedder, 1).unwrap());
        assert_eq!(company.keywords, vec!["merger"]);
    }
}
