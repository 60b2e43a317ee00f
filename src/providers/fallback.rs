use super::blockchain::BlockchainProvider;
use super::coincap::CoinCapProvider;
use super::coingecko::CoinGeckoPriceProvider;
use super::util::with_retry;
use crate::core::config::ProvidersConfig;
use crate::core::error::CalcError;
use crate::core::price::PriceProvider;
use tracing::{debug, instrument, warn};

const RETRY_DELAY_MS: u64 = 500;

/// The hardcoded provider precedence: CoinGecko, CoinCap, then Blockchain.info.
pub fn default_chain(config: &ProvidersConfig) -> Vec<Box<dyn PriceProvider>> {
    vec![
        Box::new(CoinGeckoPriceProvider::new(&config.coingecko.base_url)),
        Box::new(CoinCapProvider::new(&config.coincap.base_url)),
        Box::new(BlockchainProvider::new(&config.blockchain.base_url)),
    ]
}

/// Current spot price with ordered fallback across providers.
pub struct FallbackPriceSource {
    providers: Vec<Box<dyn PriceProvider>>,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl FallbackPriceSource {
    pub fn new(providers: Vec<Box<dyn PriceProvider>>, client: reqwest::Client) -> Self {
        FallbackPriceSource {
            providers,
            client,
            retries: 0,
            retry_delay_ms: RETRY_DELAY_MS,
        }
    }

    /// Extra attempts per provider before moving on to the next one.
    pub fn with_retries(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Returns the first price any provider yields, in precedence order.
    #[instrument(name = "CurrentPriceFetch", skip(self))]
    pub async fn get_current_price(&self) -> Result<f64, CalcError> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let result = with_retry(
                || provider.fetch_price(&self.client),
                self.retries,
                self.retry_delay_ms,
            )
            .await;

            match result {
                Ok(price) => {
                    debug!(provider = provider.id(), price, "Fetched current price");
                    return Ok(price);
                }
                Err(e) => {
                    warn!(provider = provider.id(), error = %e, "Price provider failed");
                    failures.push(format!("{}: {e}", provider.id()));
                }
            }
        }

        if failures.is_empty() {
            return Err(CalcError::DataUnavailable(
                "no price providers configured".to_string(),
            ));
        }
        Err(CalcError::DataUnavailable(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::build_client;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, url_path: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn source(server: &MockServer) -> FallbackPriceSource {
        let uri = server.uri();
        let providers: Vec<Box<dyn PriceProvider>> = vec![
            Box::new(CoinGeckoPriceProvider::new(&uri)),
            Box::new(CoinCapProvider::new(&uri)),
            Box::new(BlockchainProvider::new(&uri)),
        ];
        FallbackPriceSource::new(providers, build_client(Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/api/v3/simple/price",
            ResponseTemplate::new(200).set_body_string(r#"{"bitcoin":{"usd":61000.0}}"#),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/v2/assets/bitcoin"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert_eq!(source(&server).get_current_price().await.unwrap(), 61000.0);
    }

    #[tokio::test]
    async fn test_falls_back_on_error_status() {
        let server = MockServer::start().await;
        mount(&server, "/api/v3/simple/price", ResponseTemplate::new(500)).await;
        mount(
            &server,
            "/v2/assets/bitcoin",
            ResponseTemplate::new(200).set_body_string(r#"{"data":{"priceUsd":"62000.5"}}"#),
        )
        .await;

        assert_eq!(source(&server).get_current_price().await.unwrap(), 62000.5);
    }

    #[tokio::test]
    async fn test_falls_back_on_malformed_bodies() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/api/v3/simple/price",
            ResponseTemplate::new(200).set_body_string("not json"),
        )
        .await;
        mount(
            &server,
            "/v2/assets/bitcoin",
            ResponseTemplate::new(200).set_body_string(r#"{"data":{}}"#),
        )
        .await;
        mount(
            &server,
            "/ticker",
            ResponseTemplate::new(200).set_body_string(r#"{"USD":{"last":63000.25}}"#),
        )
        .await;

        assert_eq!(source(&server).get_current_price().await.unwrap(), 63000.25);
    }

    #[tokio::test]
    async fn test_all_providers_fail() {
        let server = MockServer::start().await;
        mount(&server, "/api/v3/simple/price", ResponseTemplate::new(503)).await;
        mount(&server, "/v2/assets/bitcoin", ResponseTemplate::new(404)).await;
        mount(&server, "/ticker", ResponseTemplate::new(500)).await;

        let err = source(&server).get_current_price().await.unwrap_err();
        match err {
            CalcError::DataUnavailable(detail) => {
                assert!(detail.contains("coingecko"));
                assert!(detail.contains("coincap"));
                assert!(detail.contains("blockchain"));
            }
            other => panic!("Expected DataUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retries_before_advancing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;
        mount(
            &server,
            "/v2/assets/bitcoin",
            ResponseTemplate::new(200).set_body_string(r#"{"data":{"priceUsd":"1.5"}}"#),
        )
        .await;

        let price = source(&server)
            .with_retries(1, 1)
            .get_current_price()
            .await
            .unwrap();
        assert_eq!(price, 1.5);
    }

    #[tokio::test]
    async fn test_no_providers() {
        let source = FallbackPriceSource::new(vec![], build_client(Duration::from_secs(1)).unwrap());
        assert!(matches!(
            source.get_current_price().await,
            Err(CalcError::DataUnavailable(_))
        ));
    }
}
