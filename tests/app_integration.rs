use std::fs;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_json(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub fn write_config(server_uri: &str, extra: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
providers:
  coingecko:
    base_url: {server_uri}
  coincap:
    base_url: {server_uri}
  blockchain:
    base_url: {server_uri}
retries: 0
request_timeout_secs: 5
{extra}
"#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_json(
        &mock_server,
        "/api/v3/simple/price",
        200,
        r#"{"bitcoin":{"usd":95000.0}}"#,
    )
    .await;
    test_utils::mount_json(
        &mock_server,
        "/api/v3/coins/bitcoin/market_chart",
        200,
        r#"{"prices":[[1700000000000,60000.0],[1700086400000,70000.0]]}"#,
    )
    .await;

    let config_file = test_utils::write_config(&mock_server.uri(), "history_days: 2");

    let result = ahr999::run_command(
        ahr999::AppCommand::Calculate {
            base: Some("250".to_string()),
            days: None,
            json: true,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_provider_fallback_and_synthetic_history() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_json(&mock_server, "/api/v3/simple/price", 500, "").await;
    test_utils::mount_json(&mock_server, "/v2/assets/bitcoin", 502, "").await;
    test_utils::mount_json(
        &mock_server,
        "/ticker",
        200,
        r#"{"USD":{"last":88000.5,"symbol":"USD"}}"#,
    )
    .await;
    test_utils::mount_json(&mock_server, "/api/v3/coins/bitcoin/market_chart", 500, "").await;

    let config_file = test_utils::write_config(&mock_server.uri(), "");

    let result = ahr999::run_command(
        ahr999::AppCommand::Calculate {
            base: None,
            days: Some(30),
            json: false,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_all_providers_down() {
    use ahr999::core::CalcError;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_json(&mock_server, "/api/v3/simple/price", 503, "").await;
    test_utils::mount_json(&mock_server, "/v2/assets/bitcoin", 503, "").await;
    test_utils::mount_json(&mock_server, "/ticker", 503, "").await;
    test_utils::mount_json(&mock_server, "/api/v3/coins/bitcoin/market_chart", 503, "").await;

    let config_file = test_utils::write_config(&mock_server.uri(), "");

    let result = ahr999::run_command(
        ahr999::AppCommand::Calculate {
            base: Some("100".to_string()),
            days: None,
            json: true,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Expected calculation to fail");
    assert!(matches!(
        err.downcast_ref::<CalcError>(),
        Some(CalcError::DataUnavailable(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_path() {
    let result = ahr999::run_command(
        ahr999::AppCommand::Calculate {
            base: None,
            days: None,
            json: true,
        },
        Some("/nonexistent/ahr999/config.yaml"),
    )
    .await;
    let err = result.expect_err("Expected missing config to fail");
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test_log::test(tokio::test)]
async fn test_calculator_against_mock_with_presenter() {
    use ahr999::core::config::AppConfig;
    use ahr999::core::{Calculator, ErrorKind, MetricsResult, Presenter, SeriesOrigin};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Option<Result<MetricsResult, (ErrorKind, String)>>>);

    impl Presenter for Capture {
        fn on_result(&self, result: &MetricsResult) {
            *self.0.lock().unwrap() = Some(Ok(result.clone()));
        }

        fn on_error(&self, kind: ErrorKind, message: &str) {
            *self.0.lock().unwrap() = Some(Err((kind, message.to_string())));
        }
    }

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_json(&mock_server, "/api/v3/simple/price", 404, "").await;
    test_utils::mount_json(
        &mock_server,
        "/v2/assets/bitcoin",
        200,
        r#"{"data":{"priceUsd":"50000.0000"}}"#,
    )
    .await;
    test_utils::mount_json(
        &mock_server,
        "/api/v3/coins/bitcoin/market_chart",
        200,
        r#"{"prices":[[1,30000],[2,50000]]}"#,
    )
    .await;

    let config_file = test_utils::write_config(&mock_server.uri(), "history_days: 2");
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let calculator = Calculator::from_config(&config).unwrap();

    let capture = Capture::default();
    calculator.on_calculate_requested(1000.0, &capture).await;

    let outcome = capture.0.lock().unwrap().take();
    match outcome {
        Some(Ok(metrics)) => {
            info!(?metrics, "Received metrics");
            assert_eq!(metrics.current_price, 50000.0);
            assert_eq!(metrics.dca_cost, 40000.0);
            assert_eq!(metrics.history_origin, SeriesOrigin::Remote);
            assert!(metrics.recommended_investment <= 10_000.0);
        }
        other => {
            error!(?other, "Unexpected outcome");
            panic!("Expected metrics, got {other:?}");
        }
    }
}

#[test_log::test(tokio::test)]
#[ignore = "hits live market data APIs"]
async fn test_real_price_providers() {
    use ahr999::core::config::AppConfig;
    use ahr999::core::Calculator;

    let calculator = Calculator::from_config(&AppConfig::default()).unwrap();
    match calculator.calculate(100.0).await {
        Ok(metrics) => {
            info!(?metrics, "Real API metrics");
            assert!(metrics.current_price > 0.0, "Price should be positive");
            assert!(metrics.ahr999 > 0.0);
        }
        Err(e) => {
            error!("Calculation against live APIs failed: {e}\n{e:?}");
            panic!("Calculation against live APIs failed: {e}");
        }
    }
}

#[test]
fn test_setup_writes_loadable_config() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    ahr999::cli::setup::setup_at_path(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("coingecko"));
    let config = ahr999::core::config::AppConfig::load_from_path(&path).unwrap();
    assert_eq!(config.history_days, 365);
}
