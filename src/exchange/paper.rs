//! Paper trading gateway
//!
//! Reads pass through to the wrapped gateway so the guard sees the real
//! account; orders are recorded locally and never reach the venue.

use super::{
    new_client_order_id, ExchangeGateway, ExchangeMetadata, GatewayError, OrderAck,
};
use crate::risk::{CorrectionOrder, Position};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An order accepted by the paper gateway
#[derive(Debug, Clone)]
pub struct PaperOrder {
    pub ack: OrderAck,
    pub order: CorrectionOrder,
    pub timestamp: DateTime<Utc>,
}

/// Dry-run gateway wrapping a live one
pub struct PaperGateway<G> {
    inner: G,
    orders: Arc<RwLock<Vec<PaperOrder>>>,
}

impl<G: ExchangeGateway> PaperGateway<G> {
    /// Wrap a gateway; its order submission is never called
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            orders: Arc::new(RwLock::new(vec![])),
        }
    }

    /// Orders recorded so far, oldest first
    pub async fn orders(&self) -> Vec<PaperOrder> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl<G: ExchangeGateway> ExchangeGateway for PaperGateway<G> {
    async fn exchange_metadata(&self) -> Result<ExchangeMetadata, GatewayError> {
        self.inner.exchange_metadata().await
    }

    async fn open_positions(&self) -> Result<Vec<Position>, GatewayError> {
        self.inner.open_positions().await
    }

    async fn submit_reduce_only_market_order(
        &self,
        order: &CorrectionOrder,
    ) -> Result<OrderAck, GatewayError> {
        let mut orders = self.orders.write().await;

        let ack = OrderAck {
            order_id: orders.len() as i64 + 1,
            client_order_id: new_client_order_id(),
            status: Some("PAPER".to_string()),
        };

        let recorded = PaperOrder {
            ack: ack.clone(),
            order: order.clone(),
            timestamp: Utc::now(),
        };

        tracing::info!(
            symbol = %recorded.order.symbol,
            side = %recorded.order.side,
            quantity = %recorded.order.quantity_str(),
            order_id = recorded.ack.order_id,
            recorded_at = %recorded.timestamp.to_rfc3339(),
            "Paper order recorded"
        );

        orders.push(recorded);

        Ok(ack)
    }
}
