//! Binance USDⓈ-M futures REST gateway
//!
//! Signed requests carry `timestamp` and `recvWindow` in the query string,
//! an HMAC-SHA256 `signature` over that query, and the API key in the
//! `X-MBX-APIKEY` header.

use super::{new_client_order_id, ExchangeGateway, ExchangeMetadata, GatewayError, OrderAck};
use crate::config::{Credentials, ExchangeConfig};
use crate::risk::{CorrectionOrder, Position};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Binance USDⓈ-M futures REST base URL
pub const BINANCE_FUTURES_URL: &str = "https://fapi.binance.com";

const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
const POSITION_RISK_PATH: &str = "/fapi/v2/positionRisk";
const ORDER_PATH: &str = "/fapi/v1/order";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Configuration for the Binance client
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST base URL
    pub base_url: String,
    /// Signed request validity window in milliseconds
    pub recv_window_ms: u64,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_FUTURES_URL.to_string(),
            recv_window_ms: 5000,
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ExchangeConfig> for BinanceConfig {
    fn from(config: &ExchangeConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recv_window_ms: config.recv_window_ms,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Failure of a single REST call, before it is classified by operation
#[derive(Debug, Error)]
enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: code {code}: {msg}")]
    Venue { status: u16, code: i64, msg: String },
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Error body returned by the venue on non-2xx responses
#[derive(Debug, Deserialize)]
struct VenueErrorBody {
    code: i64,
    msg: String,
}

/// One entry of `/fapi/v2/positionRisk`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionRisk {
    symbol: String,
    position_amt: Decimal,
    entry_price: Decimal,
}

impl From<PositionRisk> for Position {
    fn from(raw: PositionRisk) -> Self {
        Position::new(raw.symbol, raw.position_amt, raw.entry_price)
    }
}

/// Binance USDⓈ-M futures client
pub struct BinanceFuturesClient {
    config: BinanceConfig,
    credentials: Credentials,
    client: Client,
}

impl BinanceFuturesClient {
    /// Create a client against the production endpoint
    pub fn new(credentials: Credentials) -> Result<Self, GatewayError> {
        Self::with_config(BinanceConfig::default(), credentials)
    }

    /// Create a client with custom configuration
    pub fn with_config(
        config: BinanceConfig,
        credentials: Credentials,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            credentials,
            client,
        })
    }

    /// Build the signed query string for `params`
    fn signed_query(&self, params: &[(&str, String)]) -> Result<String, ApiError> {
        let timestamp = Utc::now().timestamp_millis();

        let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.push(format!("recvWindow={}", self.config.recv_window_ms));
        pairs.push(format!("timestamp={timestamp}"));
        let query = pairs.join("&");

        let signature = sign(&self.credentials.api_secret, &query)?;
        Ok(format!("{query}&signature={signature}"))
    }

    async fn send_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);

        tracing::debug!(url = %url, "Sending public request");

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let query = self.signed_query(params)?;
        let url = format!("{}{}?{}", self.config.base_url, path, query);

        tracing::debug!(%method, path, "Sending signed request");

        let response = self
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<VenueErrorBody>(&body) {
                Ok(err) => ApiError::Venue {
                    status: status.as_u16(),
                    code: err.code,
                    msg: err.msg,
                },
                Err(_) => ApiError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Hex-encoded HMAC-SHA256 of `payload` keyed with `secret`
fn sign(secret: &str, payload: &str) -> Result<String, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::Signing(format!("invalid key length: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl ExchangeGateway for BinanceFuturesClient {
    async fn exchange_metadata(&self) -> Result<ExchangeMetadata, GatewayError> {
        self.send_public(EXCHANGE_INFO_PATH)
            .await
            .map_err(|e| GatewayError::MetadataUnavailable(e.to_string()))
    }

    async fn open_positions(&self) -> Result<Vec<Position>, GatewayError> {
        let positions: Vec<PositionRisk> = self
            .send_signed(Method::GET, POSITION_RISK_PATH, &[])
            .await
            .map_err(|e| GatewayError::PositionFetchFailed(e.to_string()))?;

        Ok(positions.into_iter().map(Position::from).collect())
    }

    async fn submit_reduce_only_market_order(
        &self,
        order: &CorrectionOrder,
    ) -> Result<OrderAck, GatewayError> {
        let params = [
            ("symbol", order.symbol.clone()),
            ("side", order.side.venue_side().to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", order.quantity_str()),
            ("reduceOnly", "true".to_string()),
            ("newClientOrderId", new_client_order_id()),
        ];

        self.send_signed(Method::POST, ORDER_PATH, &params)
            .await
            .map_err(|e| GatewayError::OrderRejected {
                symbol: order.symbol.clone(),
                reason: e.to_string(),
            })
    }
}
