// Market data module: price history retrieval for both analysis horizons.

pub mod yahoo;

pub use yahoo::YahooMarket;

use crate::model::MarketError;

/// Market-data collaborator: ordered mid-price samples for a symbol over one
/// retrieval window.
#[async_trait::async_trait]
pub trait MarketData: Send + Sync {
    async fn price_series(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<f64>, MarketError>;
}
