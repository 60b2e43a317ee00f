use crate::core::price::{HistoryProvider, PriceProvider, PriceValue, is_valid_price};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

/// Spot price from `/api/v3/simple/price`, shaped `{"bitcoin": {"usd": <price>}}`.
pub struct CoinGeckoPriceProvider {
    base_url: String,
}

impl CoinGeckoPriceProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoPriceProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct SimplePriceResponse {
    bitcoin: SimplePriceEntry,
}

#[derive(Deserialize, Debug)]
struct SimplePriceEntry {
    usd: PriceValue,
}

#[async_trait]
impl PriceProvider for CoinGeckoPriceProvider {
    fn id(&self) -> &str {
        "coingecko"
    }

    fn url(&self) -> String {
        format!(
            "{}/api/v3/simple/price?ids=bitcoin&vs_currencies=usd",
            self.base_url
        )
    }

    fn parse(&self, body: &str) -> Result<f64> {
        let data: SimplePriceResponse = serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse JSON response for coingecko: {}", e))?;
        data.bitcoin.usd.to_f64()
    }
}

/// Daily closes from `/api/v3/coins/bitcoin/market_chart`, shaped
/// `{"prices": [[timestamp_ms, price], ...]}`.
pub struct CoinGeckoHistoryProvider {
    base_url: String,
}

impl CoinGeckoHistoryProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoHistoryProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

#[async_trait]
impl HistoryProvider for CoinGeckoHistoryProvider {
    fn id(&self) -> &str {
        "coingecko"
    }

    #[instrument(name = "CoinGeckoHistoryFetch", skip(self, client))]
    async fn fetch_history(&self, client: &reqwest::Client, days: u32) -> Result<Vec<f64>> {
        let url = format!(
            "{}/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days={}",
            self.base_url, days
        );
        debug!("Requesting historical prices from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request error for historical prices URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for historical prices",
                response.status()
            ));
        }

        let text = response.text().await?;
        let data: MarketChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for market chart: {}", e))?;

        if data.prices.is_empty() {
            return Err(anyhow!("Market chart contained no prices"));
        }
        if let Some((ts, price)) = data.prices.iter().find(|(_, p)| !is_valid_price(*p)) {
            return Err(anyhow!("Invalid historical price {} at timestamp {}", price, ts));
        }

        debug!(count = data.prices.len(), "Received historical prices");
        Ok(data.prices.into_iter().map(|(_, price)| price).collect())
    }
}
