//! End-to-end tests: config file -> Binance client -> guard cycle

use notional_guard::config::Config;
use notional_guard::exchange::{BinanceConfig, BinanceFuturesClient};
use notional_guard::guard::{Guard, GuardError};
use rust_decimal_macros::dec;
use std::io::Write;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(base_url: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [guard]
        exposure_ceiling = 100
        poll_interval_secs = 1

        [exchange]
        base_url = "{base_url}"

        [credentials]
        api_key = "e2e-key"
        api_secret = "e2e-secret"
        "#
    )
    .unwrap();
    file
}

async fn mount_exchange_info(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/fapi/v1/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "symbols": [
                {"symbol": "BTCUSDT", "filters": [{"filterType": "LOT_SIZE", "stepSize": "0.001"}]},
                {"symbol": "ETHUSDT", "filters": [{"filterType": "LOT_SIZE", "stepSize": "0.001"}]}
            ]
        })))
        .mount(server)
        .await;
}

async fn guard_for(server: &MockServer) -> Guard<BinanceFuturesClient> {
    let file = write_config(&server.uri());
    let config = Config::load(file.path()).unwrap();
    config.validate().unwrap();

    let credentials = config.credentials.resolve().unwrap();
    let client =
        BinanceFuturesClient::with_config(BinanceConfig::from(&config.exchange), credentials)
            .unwrap();

    Guard::start(client, &config.guard).await.unwrap()
}

#[tokio::test]
async fn test_guard_trims_oversized_long() {
    let server = MockServer::start().await;
    mount_exchange_info(&server).await;

    Mock::given(method("GET"))
        .and(path("/fapi/v2/positionRisk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"symbol": "BTCUSDT", "positionAmt": "0.010", "entryPrice": "60000.0"},
            {"symbol": "ETHUSDT", "positionAmt": "-2.000", "entryPrice": "40.00"},
            {"symbol": "XRPUSDT", "positionAmt": "0", "entryPrice": "0.0"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("side", "SELL"))
        .and(query_param("quantity", "0.008"))
        .and(query_param("reduceOnly", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": 1001,
            "clientOrderId": "ng-e2e",
            "status": "NEW"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let guard = guard_for(&server).await;
    assert_eq!(guard.directory().step_size("BTCUSDT"), Some(dec!(0.001)));

    let report = guard.run_cycle().await.unwrap();
    assert_eq!(report.evaluated, 2);
    assert_eq!(report.flat, 1);
    assert_eq!(report.submitted, 1);
    assert_eq!(report.rejected, 0);
}

#[tokio::test]
async fn test_fetch_failure_submits_nothing() {
    let server = MockServer::start().await;
    mount_exchange_info(&server).await;

    Mock::given(method("GET"))
        .and(path("/fapi/v2/positionRisk"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "code": -1001,
            "msg": "Internal error; unable to process your request. Please try again."
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let guard = guard_for(&server).await;

    let err = guard.run_cycle().await.unwrap_err();
    assert!(matches!(err, GuardError::PositionFetch(_)));
    assert!(guard.poll_once().await.is_none());
}

#[tokio::test]
async fn test_rejection_is_localized_to_symbol() {
    let server = MockServer::start().await;
    mount_exchange_info(&server).await;

    Mock::given(method("GET"))
        .and(path("/fapi/v2/positionRisk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"symbol": "BTCUSDT", "positionAmt": "0.010", "entryPrice": "60000.0"},
            {"symbol": "ETHUSDT", "positionAmt": "-1.000", "entryPrice": "3000.00"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": -2022,
            "msg": "ReduceOnly Order is rejected."
        })))
        .expect(1)
        .mount(&server)
        .await;

    // target -0.0333..., excess 0.9666... -> 0.966
    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("side", "BUY"))
        .and(query_param("quantity", "0.966"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "orderId": 2002,
            "clientOrderId": "ng-eth"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let guard = guard_for(&server).await;
    let report = guard.run_cycle().await.unwrap();

    assert_eq!(report.rejected, 1);
    assert_eq!(report.submitted, 1);
}
