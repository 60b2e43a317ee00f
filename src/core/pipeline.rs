//! Calculation pipeline: validate input, fetch market data, compute metrics.

use crate::core::config::AppConfig;
use crate::core::error::{CalcError, ErrorKind};
use crate::core::input::validate_base_investment;
use crate::core::metrics::{MetricsResult, compute_metrics};
use crate::providers::coingecko::CoinGeckoHistoryProvider;
use crate::providers::fallback::default_chain;
use crate::providers::util::build_client;
use crate::providers::{FallbackPriceSource, HistoricalDataSource};
use anyhow::Result;
use futures::future::join;
use std::sync::Arc;
use tracing::{debug, error, instrument};

const RETRY_DELAY_MS: u64 = 500;

/// Receives the outcome of a calculation. Rendering state lives entirely here.
pub trait Presenter {
    fn on_result(&self, result: &MetricsResult);
    fn on_error(&self, kind: ErrorKind, message: &str);
}

pub struct Calculator {
    prices: Arc<FallbackPriceSource>,
    history: HistoricalDataSource,
    history_days: u32,
}

impl Calculator {
    pub fn new(
        prices: Arc<FallbackPriceSource>,
        history: HistoricalDataSource,
        history_days: u32,
    ) -> Self {
        Calculator {
            prices,
            history,
            history_days,
        }
    }

    /// Wires the hardcoded provider chain using the endpoints and limits in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        let prices = Arc::new(
            FallbackPriceSource::new(default_chain(&config.providers), client.clone())
                .with_retries(config.retries, RETRY_DELAY_MS),
        );
        let history = HistoricalDataSource::new(
            Box::new(CoinGeckoHistoryProvider::new(
                &config.providers.coingecko.base_url,
            )),
            Arc::clone(&prices),
            client,
        )
        .with_fallback_price(config.fallback_price);

        Ok(Self::new(prices, history, config.history_days))
    }

    /// Runs one calculation. Invalid input fails before any request is made.
    #[instrument(name = "Calculate", skip(self))]
    pub async fn calculate(&self, base_amount: f64) -> Result<MetricsResult, CalcError> {
        let base_amount = validate_base_investment(base_amount)?;

        let (current_price, history) = join(
            self.prices.get_current_price(),
            self.history.get_historical_prices(self.history_days),
        )
        .await;
        let current_price = current_price?;
        debug!(
            current_price,
            history_len = history.prices().len(),
            origin = %history.origin(),
            "Market data loaded"
        );

        compute_metrics(current_price, &history, base_amount)
    }

    /// Runs a calculation and reports the outcome to `presenter`.
    pub async fn on_calculate_requested(&self, base_amount: f64, presenter: &dyn Presenter) {
        match self.calculate(base_amount).await {
            Ok(result) => presenter.on_result(&result),
            Err(e) => {
                error!(error = ?e, "Calculation failed");
                presenter.on_error(e.kind(), &e.to_string());
            }
        }
    }
}
