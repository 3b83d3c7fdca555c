//! Integration tests for the gateway layer

use notional_guard::config::Credentials;
use notional_guard::exchange::{
    BinanceConfig, BinanceFuturesClient, ExchangeGateway, GatewayError, PaperGateway,
};
use notional_guard::guard::Guard;
use notional_guard::risk::{LotSizeDirectory, ReduceSide};
use rust_decimal_macros::dec;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BinanceFuturesClient {
    let config = BinanceConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    let credentials = Credentials {
        api_key: "k".to_string(),
        api_secret: "s".to_string(),
    };
    BinanceFuturesClient::with_config(config, credentials).unwrap()
}

#[tokio::test]
async fn test_paper_mode_never_posts_orders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fapi/v2/positionRisk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"symbol": "BTCUSDT", "positionAmt": "-0.010", "entryPrice": "60000.0"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let directory: LotSizeDirectory = [("BTCUSDT".to_string(), dec!(0.001))]
        .into_iter()
        .collect();
    let guard = Guard::new(
        PaperGateway::new(client(&server)),
        directory,
        dec!(100),
        Duration::from_secs(5),
    );

    let report = guard.run_cycle().await.unwrap();
    assert_eq!(report.submitted, 1);

    let orders = guard.gateway().orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.side, ReduceSide::ReduceShort);
    assert_eq!(orders[0].order.quantity, dec!(0.008));
}

#[tokio::test]
async fn test_unreachable_venue_maps_to_operation_errors() {
    // Nothing listens on the discard port
    let config = BinanceConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let credentials = Credentials {
        api_key: "k".to_string(),
        api_secret: "s".to_string(),
    };
    let client = BinanceFuturesClient::with_config(config, credentials).unwrap();

    assert!(matches!(
        client.exchange_metadata().await,
        Err(GatewayError::MetadataUnavailable(_))
    ));
    assert!(matches!(
        client.open_positions().await,
        Err(GatewayError::PositionFetchFailed(_))
    ));
}
