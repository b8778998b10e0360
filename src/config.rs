use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    pub symbol: String,
    pub name: String,
}

/// One retrieval window, in chart-API notation ("1h"/"1mo", "1d"/"6mo").
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonConfig {
    pub interval: String,
    pub range: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub db_path: String,
    pub vectors_path: String,
    pub stopwords_path: Option<String>,
    /// Saved article pages to ingest before analysis, one subdirectory per
    /// company name.
    pub articles_dir: Option<String>,
    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,
    pub short_term: HorizonConfig,
    pub long_term: HorizonConfig,
    pub companies: Vec<CompanyConfig>,
}

fn default_keyword_count() -> usize {
    10
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
