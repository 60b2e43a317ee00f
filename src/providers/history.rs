use super::fallback::FallbackPriceSource;
use crate::core::price::{HistoryProvider, PriceSeries, SeriesOrigin, is_valid_price};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const DEFAULT_HISTORY_DAYS: u32 = 365;
pub const DEFAULT_FALLBACK_PRICE: f64 = 30000.0;

/// Relative amplitude of the synthetic oscillation.
const SYNTHETIC_AMPLITUDE: f64 = 0.2;
/// Days per radian of the synthetic oscillation.
const SYNTHETIC_PERIOD_DAYS: f64 = 30.0;

enum HistoryState {
    Fetching,
    Failed(anyhow::Error),
    Synthesizing,
    Done(PriceSeries),
}

/// Trailing daily prices; degrades to a synthetic series instead of failing.
pub struct HistoricalDataSource {
    provider: Box<dyn HistoryProvider>,
    price_source: Arc<FallbackPriceSource>,
    client: reqwest::Client,
    fallback_price: f64,
}

impl HistoricalDataSource {
    pub fn new(
        provider: Box<dyn HistoryProvider>,
        price_source: Arc<FallbackPriceSource>,
        client: reqwest::Client,
    ) -> Self {
        HistoricalDataSource {
            provider,
            price_source,
            client,
            fallback_price: DEFAULT_FALLBACK_PRICE,
        }
    }

    /// Anchor price used when neither history nor a current price is available.
    pub fn with_fallback_price(mut self, fallback_price: f64) -> Self {
        if is_valid_price(fallback_price) {
            self.fallback_price = fallback_price;
        }
        self
    }

    /// Never fails: a failed remote fetch yields a synthetic series of exactly `days` prices.
    #[instrument(name = "HistoricalPriceFetch", skip(self))]
    pub async fn get_historical_prices(&self, days: u32) -> PriceSeries {
        let days = days.max(1);
        let mut state = HistoryState::Fetching;
        loop {
            state = match state {
                HistoryState::Fetching => match self.fetch_remote(days).await {
                    Ok(series) => HistoryState::Done(series),
                    Err(e) => HistoryState::Failed(e),
                },
                HistoryState::Failed(e) => {
                    warn!(provider = self.provider.id(), error = %e, "Using fallback historical data");
                    HistoryState::Synthesizing
                }
                HistoryState::Synthesizing => {
                    let anchor = self.anchor_price().await;
                    HistoryState::Done(synthetic_series(days, anchor))
                }
                HistoryState::Done(series) => return series,
            };
        }
    }

    async fn fetch_remote(&self, days: u32) -> Result<PriceSeries> {
        let prices = self.provider.fetch_history(&self.client, days).await?;
        Ok(PriceSeries::new(prices, SeriesOrigin::Remote)?)
    }

    async fn anchor_price(&self) -> f64 {
        match self.price_source.get_current_price().await {
            Ok(price) => price,
            Err(e) => {
                warn!(
                    error = ?e,
                    fallback = self.fallback_price,
                    "No current price for synthetic history, using default"
                );
                self.fallback_price
            }
        }
    }
}

/// Deterministic oscillation of ±20% around `average`, one value per day.
pub fn synthetic_series(days: u32, average: f64) -> PriceSeries {
    let average = if is_valid_price(average) {
        average
    } else {
        DEFAULT_FALLBACK_PRICE
    };
    let prices = (0..days.max(1))
        .map(|i| {
            let fluctuation =
                (f64::from(i) / SYNTHETIC_PERIOD_DAYS).sin() * average * SYNTHETIC_AMPLITUDE;
            average + fluctuation
        })
        .collect::<Vec<_>>();
    debug!(days, average, "Synthesized historical prices");
    PriceSeries::new_unchecked(prices, SeriesOrigin::Synthetic)
}
