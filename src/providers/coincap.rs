use crate::core::price::{PriceProvider, PriceValue};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.coincap.io";

/// Spot price from `/v2/assets/bitcoin`, shaped `{"data": {"priceUsd": "<price>"}}`.
pub struct CoinCapProvider {
    base_url: String,
}

impl CoinCapProvider {
    pub fn new(base_url: &str) -> Self {
        CoinCapProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct AssetResponse {
    data: AssetData,
}

#[derive(Deserialize, Debug)]
struct AssetData {
    #[serde(alias = "priceUsd")]
    price_usd: PriceValue,
}

#[async_trait]
impl PriceProvider for CoinCapProvider {
    fn id(&self) -> &str {
        "coincap"
    }

    fn url(&self) -> String {
        format!("{}/v2/assets/bitcoin", self.base_url)
    }

    fn parse(&self, body: &str) -> Result<f64> {
        let data: AssetResponse = serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse JSON response for coincap: {}", e))?;
        data.data.price_usd.to_f64()
    }
}
