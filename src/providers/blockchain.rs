use crate::core::price::{PriceProvider, PriceValue};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://blockchain.info";

/// Spot price from the `/ticker` endpoint, shaped `{"USD": {"last": <price>, ...}, ...}`.
pub struct BlockchainProvider {
    base_url: String,
}

impl BlockchainProvider {
    pub fn new(base_url: &str) -> Self {
        BlockchainProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct TickerResponse {
    #[serde(rename = "USD")]
    usd: TickerEntry,
}

#[derive(Deserialize, Debug)]
struct TickerEntry {
    last: PriceValue,
}

#[async_trait]
impl PriceProvider for BlockchainProvider {
    fn id(&self) -> &str {
        "blockchain"
    }

    fn url(&self) -> String {
        format!("{}/ticker", self.base_url)
    }

    fn parse(&self, body: &str) -> Result<f64> {
        let data: TickerResponse = serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse JSON response for blockchain: {}", e))?;
        data.usd.last.to_f64()
    }
}
