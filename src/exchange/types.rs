//! Exchange types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Filter type carrying the minimum quantity increment
pub const LOT_SIZE_FILTER: &str = "LOT_SIZE";

/// Prefix for client order ids assigned by the guard
pub const CLIENT_ORDER_ID_PREFIX: &str = "ng-";

/// Per-symbol trading rules published by the venue
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeMetadata {
    pub symbols: Vec<SymbolRules>,
}

/// Trading rules for a single symbol
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolRules {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// One entry of a symbol's filter list.
///
/// Only the fields the guard reads are modelled; `step_size` is present on
/// `LOT_SIZE` and `MARKET_LOT_SIZE` filters.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolFilter {
    #[serde(rename = "filterType")]
    pub filter_type: String,
    #[serde(rename = "stepSize", default)]
    pub step_size: Option<Decimal>,
}

/// Venue acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: i64,
    pub client_order_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Generate a fresh client order id (`ng-` plus 32 hex chars, within the
/// venue's 36 character limit)
pub fn new_client_order_id() -> String {
    format!("{}{}", CLIENT_ORDER_ID_PREFIX, Uuid::new_v4().simple())
}

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Exchange metadata could not be fetched or parsed
    #[error("exchange metadata unavailable: {0}")]
    MetadataUnavailable(String),
    /// Open positions could not be fetched or parsed
    #[error("position fetch failed: {0}")]
    PositionFetchFailed(String),
    /// The venue refused the order, or it never reached the venue
    #[error("order rejected for {symbol}: {reason}")]
    OrderRejected { symbol: String, reason: String },
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_metadata_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "timezone": "UTC",
            "serverTime": 1704067200000,
            "symbols": [
                {
                    "symbol": "BTCUSDT",
                    "status": "TRADING",
                    "filters": [
                        {"filterType": "PRICE_FILTER", "tickSize": "0.10", "minPrice": "556.80"},
                        {"filterType": "LOT_SIZE", "stepSize": "0.001", "minQty": "0.001", "maxQty": "1000"}
                    ]
                },
                {"symbol": "NOFILTERS"}
            ]
        }"#;

        let metadata: ExchangeMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.symbols.len(), 2);
        assert_eq!(metadata.symbols[0].filters[1].filter_type, "LOT_SIZE");
        assert_eq!(metadata.symbols[0].filters[1].step_size, Some(dec!(0.001)));
        assert!(metadata.symbols[0].filters[0].step_size.is_none());
        assert!(metadata.symbols[1].filters.is_empty());
    }

    #[test]
    fn test_order_ack_deserialize() {
        let json = r#"{"orderId": 283194212, "clientOrderId": "ng-abc", "status": "NEW", "symbol": "BTCUSDT"}"#;
        let ack: OrderAck = serde_json::from_str(json).unwrap();
        assert_eq!(ack.order_id, 283194212);
        assert_eq!(ack.client_order_id, "ng-abc");
        assert_eq!(ack.status.as_deref(), Some("NEW"));
    }

    #[test]
    fn test_client_order_id_format() {
        let id = new_client_order_id();
        assert!(id.starts_with(CLIENT_ORDER_ID_PREFIX));
        assert_eq!(id.len(), 35);
        assert_ne!(id, new_client_order_id());
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::OrderRejected {
            symbol: "BTCUSDT".to_string(),
            reason: "Order's notional must be no smaller than 5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "order rejected for BTCUSDT: Order's notional must be no smaller than 5"
        );
    }
}
