//! Lot-size directory
//!
//! Symbol to quantity-increment lookup built once from exchange metadata.
//! The directory is never refreshed while the guard runs; a symbol listed
//! after startup, or one whose increment changes, keeps its startup state
//! until the process restarts.

use crate::exchange::{ExchangeGateway, ExchangeMetadata, GatewayError, LOT_SIZE_FILTER};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read-only map from symbol to minimum order-quantity increment
#[derive(Debug, Clone, Default)]
pub struct LotSizeDirectory {
    steps: HashMap<String, Decimal>,
}

impl LotSizeDirectory {
    /// Build the directory from exchange metadata.
    ///
    /// Symbols without a `LOT_SIZE` filter, or with a non-positive step,
    /// are left out.
    pub fn build(metadata: &ExchangeMetadata) -> Self {
        let steps = metadata
            .symbols
            .iter()
            .filter_map(|rules| {
                rules
                    .filters
                    .iter()
                    .find(|f| f.filter_type == LOT_SIZE_FILTER)
                    .and_then(|f| f.step_size)
                    .filter(|step| *step > Decimal::ZERO)
                    .map(|step| (rules.symbol.clone(), step.normalize()))
            })
            .collect();

        Self { steps }
    }

    /// Fetch metadata through the gateway and build the directory
    pub async fn load<G>(gateway: &G, ceiling: Decimal) -> Result<Self, GatewayError>
    where
        G: ExchangeGateway + ?Sized,
    {
        let metadata = gateway.exchange_metadata().await?;
        let directory = Self::build(&metadata);

        tracing::info!(
            symbols = directory.len(),
            exposure_ceiling = %ceiling,
            "Loaded step sizes"
        );

        Ok(directory)
    }

    /// Step size for a symbol, if the venue publishes one
    pub fn step_size(&self, symbol: &str) -> Option<Decimal> {
        self.steps.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for LotSizeDirectory {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
