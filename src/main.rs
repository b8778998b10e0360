mod analyzer;
mod config;
mod embedding;
mod market;
mod model;
mod normalizer;
mod parser;
mod storage;
mod wordfreq;

use std::fs;
use std::path::Path;

use futures::future::join_all;
use tracing::{error, info, warn};

use analyzer::{keywords, prediction, relation, significance, term_importance};
use config::load_config;
use embedding::WordVectors;
use market::{MarketData, YahooMarket};
use model::{Company, Horizon, PerHorizon, Prediction, Stage};
use normalizer::Normalizer;
use storage::SqliteStorage;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let normalizer = match &config.stopwords_path {
        Some(path) => match Normalizer::from_file(path) {
            Ok(n) => n,
            Err(e) => {
                error!("Stopword list load error: {}", e);
                return;
            }
        },
        None => Normalizer::new(),
    };

    // Ingest saved article pages before analysis, when a directory is configured
    if let Some(dir) = &config.articles_dir {
        ingest_pending_articles(dir, &normalizer, &storage);
    }

    let embedder = match WordVectors::load(&config.vectors_path) {
        Ok(v) => v,
        Err(e) => {
            error!("Word vector load error: {}", e);
            return;
        }
    };
    info!("Loaded {} word vectors", embedder.len());

    let mut companies: Vec<Company> = config
        .companies
        .iter()
        .map(|c| Company::new(&c.symbol, &c.name))
        .collect();
    info!("Companies to analyze: {}", companies.len());

    // Phase 1: term importance per company
    info!("Computing term importance...");
    for company in companies.iter_mut() {
        match term_importance::compute(company, &storage) {
            Ok(true) => info!("{}: {} ranked terms", company.name, company.term_importance.len()),
            Ok(false) => {}
            Err(e) => warn!("{}: term importance failed: {}", company.name, e),
        }
    }

    // Phase 2: keyword selection per company
    info!("Selecting keywords...");
    for company in companies.iter_mut() {
        match keywords::choose(company, &storage, &embedder, config.keyword_count) {
            Ok(_) => {
                if !company.keywords.is_empty() {
                    info!("{}: keywords {:?}", company.name, company.keywords);
                }
            }
            Err(e) => warn!("{}: keyword selection failed: {}", company.name, e),
        }
    }

    // Phase 3: relation scoring over all unordered pairs
    info!("Scoring company relations...");
    for i in 0..companies.len() {
        for j in (i + 1)..companies.len() {
            let (left, right) = companies.split_at_mut(j);
            let a = &mut left[i];
            let b = &mut right[0];
            if let Err(e) = relation::score_pair(a, b, &storage, &embedder, config.keyword_count) {
                warn!("Relation {} / {} failed: {}", a.name, b.name, e);
            }
        }
    }
    for company in companies.iter_mut() {
        if company.stage >= Stage::KeywordsChosen {
            company.stage = company.stage.max(Stage::RelationsComputed);
        }
    }

    // Phase 4: relation bounds over the active set
    let bounds = match relation::bounds(&companies, &storage) {
        Ok(b) => b,
        Err(e) => {
            error!("Relation bounds scan failed: {}", e);
            return;
        }
    };
    if let Some(b) = bounds {
        info!("Relation bounds: min {:.1}, max {:.1}", b.min, b.max);
    }

    // Phase 5: price history for both horizons, fetched concurrently
    info!("Retrieving price history...");
    let market = YahooMarket::new();
    let fetches = companies.iter().map(|company| {
        let symbol = company.symbol.clone();
        let market = &market;
        let short = &config.short_term;
        let long = &config.long_term;
        async move {
            let short_series = market.price_series(&symbol, &short.interval, &short.range).await;
            let long_series = market.price_series(&symbol, &long.interval, &long.range).await;
            (short_series, long_series)
        }
    });
    let results = join_all(fetches).await;

    for (company, (short_series, long_series)) in companies.iter_mut().zip(results) {
        match (short_series, long_series) {
            (Ok(short), Ok(long)) => {
                info!(
                    "{}: {} short samples, {} long samples",
                    company.symbol,
                    short.len(),
                    long.len()
                );
                company.set_prices(Horizon::Short, short);
                company.set_prices(Horizon::Long, long);
                company.stage = company.stage.max(Stage::PriceRetrieved);
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("{}: price retrieval failed: {}", company.symbol, e);
            }
        }
    }

    // Phase 6: significance classification
    for company in companies.iter_mut() {
        if significance::classify_company(company) {
            info!(
                "{}: change importance short={} long={}",
                company.symbol,
                flag_label(company.significant[Horizon::Short]),
                flag_label(company.significant[Horizon::Long])
            );
        }
    }

    report_relations(&companies, &storage);

    // Phase 7: prediction synthesis
    let Some(bounds) = bounds else {
        warn!("No stored relations; skipping predictions");
        return;
    };

    let mut predictions: Vec<Option<PerHorizon<Option<Prediction>>>> = Vec::new();
    for idx in 0..companies.len() {
        if companies[idx].stage < Stage::SignificanceClassified {
            predictions.push(None);
            continue;
        }
        match prediction::predict(&companies, idx, &storage, bounds) {
            Ok(result) => predictions.push(Some(result)),
            Err(e) => {
                warn!("{}: prediction failed: {}", companies[idx].name, e);
                predictions.push(None);
            }
        }
    }

    for (company, result) in companies.iter_mut().zip(predictions) {
        let Some(result) = result else { continue };
        company.stage = Stage::Predicted;
        log_prediction(company, &result);
    }
}

/// Walks `dir`, expecting one subdirectory per company name holding saved
/// `.html` article pages, and stores each page's word counts. A page already
/// stored under the same name only gains the company tag.
fn ingest_pending_articles(dir: &str, normalizer: &Normalizer, storage: &SqliteStorage) {
    info!("Ingesting saved articles from {}...", dir);
    let company_dirs = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read article directory {}: {}", dir, e);
            return;
        }
    };

    for company_entry in company_dirs.flatten() {
        if !company_entry.path().is_dir() {
            continue;
        }
        let company = company_entry.file_name().to_string_lossy().into_owned();
        let Ok(files) = fs::read_dir(company_entry.path()) else {
            continue;
        };
        for file in files.flatten() {
            let path = file.path();
            if path.extension().map_or(true, |ext| ext != "html") {
                continue;
            }
            let Some(link) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            ingest_article(&path, &link, &company, normalizer, storage);
        }
    }
}

fn ingest_article(
    path: &Path,
    link: &str,
    company: &str,
    normalizer: &Normalizer,
    storage: &SqliteStorage,
) {
    match storage.article_exists(link) {
        Ok(true) => {
            if let Err(e) = storage.tag_article(link, company) {
                warn!("{}: tagging failed: {}", link, e);
            }
            return;
        }
        Ok(false) => {}
        Err(e) => {
            warn!("{}: existence check failed: {}", link, e);
            return;
        }
    }

    let html = match fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) => {
            warn!("{}: unreadable: {}", path.display(), e);
            return;
        }
    };

    let text = parser::extract_text(&html);
    let word_counts = normalizer.word_counts(&text);
    if word_counts.is_empty() {
        warn!("{}: no content words extracted", link);
        return;
    }

    match storage.insert_article(link, &word_counts, &[company]) {
        Ok(()) => info!(
            "Stored article {} ({} distinct words) for {}",
            link,
            word_counts.len(),
            company
        ),
        Err(e) => warn!("{}: insert failed: {}", link, e),
    }
}

/// Logs every company's stored relation values, weakest pair first.
fn report_relations(companies: &[Company], storage: &SqliteStorage) {
    for company in companies {
        let mut rows = Vec::new();
        for other in companies {
            if other.name == company.name {
                continue;
            }
            match storage.relation_value(&company.name, &other.name) {
                Ok(Some(value)) => rows.push((other.name.clone(), value)),
                Ok(None) => {}
                Err(e) => warn!("Relation lookup {} / {}: {}", company.name, other.name, e),
            }
        }
        rows.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        for (other, value) in rows {
            info!("{} ~ {}: {:.1}", company.name, other, value);
        }
    }
}

fn log_prediction(company: &Company, result: &PerHorizon<Option<Prediction>>) {
    for horizon in Horizon::ALL {
        match &result[horizon] {
            Some(prediction) => {
                let related = if prediction.related.is_empty() {
                    "(none)".to_string()
                } else {
                    prediction
                        .related
                        .iter()
                        .map(|(name, weight)| format!("{} ({:.2})", name, weight))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                info!(
                    "{} {}: predicted {:+.2} USD ({:+.2}%), mainly related: {}",
                    company.name,
                    horizon.label(),
                    prediction.delta,
                    prediction.percent,
                    related
                );
            }
            None => info!("{} {}: prediction unavailable", company.name, horizon.label()),
        }
    }
}

fn flag_label(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "significant",
        Some(false) => "ordinary",
        None => "undefined",
    }
}
