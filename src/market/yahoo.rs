use reqwest::Client;
use serde::Deserialize;

use crate::market::MarketData;
use crate::model::MarketError;

/// Price history client backed by the Yahoo Finance chart endpoint.
pub struct YahooMarket {
    client: Client,
    base_url: String,
}

impl YahooMarket {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) tickerlink/0.1")
            .build()
            .unwrap();

        Self {
            client,
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }

    fn chart_url(&self, symbol: &str, interval: &str, range: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?interval={}&range={}",
            self.base_url, symbol, interval, range
        )
    }
}

impl Default for YahooMarket {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
}

#[async_trait::async_trait]
impl MarketData for YahooMarket {
    async fn price_series(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<f64>, MarketError> {
        let url = self.chart_url(symbol, interval, range);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(MarketError::InvalidResponse(format!(
                "status {} for {}",
                response.status(),
                symbol
            )));
        }

        let payload: ChartResponse = response.json().await?;
        let result = payload
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))?;
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))?;

        let series = mid_prices(&quote.high, &quote.low);
        if series.is_empty() {
            return Err(MarketError::NoData(symbol.to_string()));
        }
        Ok(series)
    }
}

/// Mid price `(high + low) / 2` per sample. Samples with a missing side carry
/// the previous mid forward; leading holes are dropped.
fn mid_prices(high: &[Option<f64>], low: &[Option<f64>]) -> Vec<f64> {
    let mut series = Vec::with_capacity(high.len());
    let mut last = None;
    for (h, l) in high.iter().zip(low.iter()) {
        let mid = match (h, l) {
            (Some(h), Some(l)) => Some((h + l) / 2.0),
            _ => last,
        };
        if let Some(value) = mid {
            series.push(value);
            last = Some(value);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_prices_average_high_and_low() {
        let high = vec![Some(10.0), Some(12.0)];
        let low = vec![Some(8.0), Some(10.0)];
        assert_eq!(mid_prices(&high, &low), vec![9.0, 11.0]);
    }

    #[test]
    fn holes_carry_previous_sample_forward() {
        let high = vec![Some(10.0), None, Some(12.0)];
        let low = vec![Some(8.0), Some(9.0), Some(10.0)];
        assert_eq!(mid_prices(&high, &low), vec![9.0, 9.0, 11.0]);
    }

    #[test]
    fn leading_holes_are_dropped() {
        let high = vec![None, Some(10.0)];
        let low = vec![None, Some(8.0)];
        assert_eq!(mid_prices(&high, &low), vec![9.0]);
    }

    #[test]
    fn chart_payload_deserializes() {
        let raw = r#"{
            "chart": {
                "result": [{
                    "indicators": {
                        "quote": [{"high": [10.0, null], "low": [8.0, null]}]
                    }
                }]
            }
        }"#;

        let payload: ChartResponse = serde_json::from_str(raw).unwrap();
        let result = payload.chart.result.unwrap();
        let quote = &result[0].indicators.quote[0];
        assert_eq!(quote.high.len(), 2);
        assert_eq!(quote.high[1], None);
    }
}
