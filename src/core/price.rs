//! Pricing abstractions and core types

use crate::core::error::CalcError;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

/// Where a [`PriceSeries`] came from. Synthetic and remote prices are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesOrigin {
    Remote,
    Synthetic,
}

impl Display for SeriesOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SeriesOrigin::Remote => "remote",
                SeriesOrigin::Synthetic => "synthetic",
            }
        )
    }
}

/// Chronologically ordered daily prices. Always non-empty, every value positive and finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    prices: Vec<f64>,
    origin: SeriesOrigin,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>, origin: SeriesOrigin) -> Result<Self, CalcError> {
        if prices.is_empty() {
            return Err(CalcError::Computation("price series is empty".to_string()));
        }
        if let Some((index, price)) = prices
            .iter()
            .enumerate()
            .find(|(_, p)| !is_valid_price(**p))
        {
            return Err(CalcError::Computation(format!(
                "invalid price {price} at index {index}"
            )));
        }
        Ok(Self { prices, origin })
    }

    /// Skips validation; callers must only pass positive finite prices.
    pub(crate) fn new_unchecked(prices: Vec<f64>, origin: SeriesOrigin) -> Self {
        Self { prices, origin }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn origin(&self) -> SeriesOrigin {
        self.origin
    }
}

pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// A price field that providers encode either as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    pub fn to_f64(&self) -> Result<f64> {
        let price = match self {
            PriceValue::Number(n) => *n,
            PriceValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Price is not numeric: '{s}'"))?,
        };
        if !is_valid_price(price) {
            return Err(anyhow!("Price must be positive and finite, got {}", price));
        }
        Ok(price)
    }
}

/// A source of the current BTC/USD spot price.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &str;

    fn url(&self) -> String;

    /// Extracts the price from a raw response body.
    fn parse(&self, body: &str) -> Result<f64>;

    async fn fetch_price(&self, client: &reqwest::Client) -> Result<f64> {
        let url = self.url();
        debug!("Requesting price data from {}", url);

        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request error for provider: {} URL: {}", self.id(), url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for provider: {}",
                response.status(),
                self.id()
            ));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for provider: {}", self.id()))?;

        self.parse(&body)
    }
}

/// A source of trailing daily close prices.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn fetch_history(&self, client: &reqwest::Client, days: u32) -> Result<Vec<f64>>;
}
