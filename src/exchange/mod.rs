//! Exchange gateway module
//!
//! Position queries, exchange metadata and reduce-only order submission
//! against the futures venue (live or paper)

mod binance;
mod paper;
mod types;

pub use binance::{BinanceConfig, BinanceFuturesClient, BINANCE_FUTURES_URL};
pub use paper::{PaperGateway, PaperOrder};
pub use types::{
    new_client_order_id, ExchangeMetadata, GatewayError, OrderAck, SymbolFilter, SymbolRules,
    CLIENT_ORDER_ID_PREFIX, LOT_SIZE_FILTER,
};

use crate::risk::{CorrectionOrder, Position};
use async_trait::async_trait;

/// Trait for venue gateway implementations
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Fetch per-symbol trading rules
    async fn exchange_metadata(&self) -> Result<ExchangeMetadata, GatewayError>;
    /// Fetch all position snapshots, flat ones included
    async fn open_positions(&self) -> Result<Vec<Position>, GatewayError>;
    /// Submit a reduce-only market order
    async fn submit_reduce_only_market_order(
        &self,
        order: &CorrectionOrder,
    ) -> Result<OrderAck, GatewayError>;
}
