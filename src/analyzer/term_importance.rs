use crate::model::{Company, Stage, StorageError};
use crate::storage::SqliteStorage;

/// Derives the company's term-importance ranking from its tagged articles.
///
/// Term frequency is the per-word count summed across the company's articles.
/// The inverse-document-frequency factor is
/// `log10(total_articles / (1 + containing))`, where `total_articles` counts
/// every stored article and `containing` counts only this company's articles
/// holding the word. The resulting word scores are sorted descending.
///
/// Runs at most once per company: a repeat call returns `Ok(false)` and
/// leaves the ranking untouched.
pub fn compute(company: &mut Company, storage: &SqliteStorage) -> Result<bool, StorageError> {
    if company.stage >= Stage::TermsComputed {
        return Ok(false);
    }

    let articles = storage.articles_for_company(&company.name)?;
    let total_articles = storage.article_count()? as f64;

    let mut ranking: Vec<(String, f64)> = Vec::new();
    for article in &articles {
        for (word, count) in article.word_counts.iter() {
            match ranking.iter_mut().find(|(w, _)| w == word) {
                Some((_, score)) => *score += count as f64,
                None => ranking.push((word.to_string(), count as f64)),
            }
        }
    }

    for (word, score) in ranking.iter_mut() {
        let containing = storage.company_articles_containing(&company.name, word)?;
        *score *= (total_articles / (1.0 + containing as f64)).log10();
    }

    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    company.term_importance = ranking;
    company.stage = Stage::TermsComputed;
    Ok(true)
}
