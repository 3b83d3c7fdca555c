//! Guard control loop

use super::{CycleReport, GuardError};
use crate::config::GuardConfig;
use crate::exchange::{ExchangeGateway, GatewayError};
use crate::risk::{evaluate, CorrectionOrder, EvaluationSkip, LotSizeDirectory, Position};
use crate::telemetry::{record_latency, set_gauge, GaugeMetric, LatencyMetric};
use rust_decimal::Decimal;
use std::future::Future;
use std::time::{Duration, Instant};

/// Position risk guard bound to one gateway
pub struct Guard<G> {
    gateway: G,
    directory: LotSizeDirectory,
    ceiling: Decimal,
    poll_interval: Duration,
}

impl<G: ExchangeGateway> Guard<G> {
    /// Create a guard from an already loaded directory
    pub fn new(
        gateway: G,
        directory: LotSizeDirectory,
        ceiling: Decimal,
        poll_interval: Duration,
    ) -> Self {
        Self {
            gateway,
            directory,
            ceiling,
            poll_interval,
        }
    }

    /// Load the lot-size directory through `gateway` and build the guard.
    ///
    /// Fails with `MetadataUnavailable` when the venue metadata cannot be
    /// fetched; the caller treats that as fatal.
    pub async fn start(gateway: G, config: &GuardConfig) -> Result<Self, GatewayError> {
        let directory = LotSizeDirectory::load(&gateway, config.exposure_ceiling).await?;
        Ok(Self::new(
            gateway,
            directory,
            config.exposure_ceiling,
            config.poll_interval(),
        ))
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn directory(&self) -> &LotSizeDirectory {
        &self.directory
    }

    /// Run cycles until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            exposure_ceiling = %self.ceiling,
            poll_interval_secs = self.poll_interval.as_secs_f64(),
            "Guard running"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Received shutdown signal, stopping guard");
                    return;
                }
                _ = self.poll_then_sleep() => {}
            }
        }
    }

    async fn poll_then_sleep(&self) {
        self.poll_once().await;
        tokio::time::sleep(self.poll_interval).await;
    }

    /// Run one cycle and log its outcome. Errors end the cycle, never the
    /// guard.
    pub async fn poll_once(&self) -> Option<CycleReport> {
        let started = Instant::now();
        let result = self.run_cycle().await;
        record_latency(LatencyMetric::Cycle, started.elapsed());

        match result {
            Ok(report) => {
                if report.is_quiet() {
                    tracing::debug!(?report, "Cycle complete");
                } else {
                    tracing::info!(
                        evaluated = report.evaluated,
                        submitted = report.submitted,
                        rejected = report.rejected,
                        missing_lot_size = report.missing_lot_size,
                        below_step = report.below_step,
                        "Cycle complete"
                    );
                }
                Some(report)
            }
            Err(GuardError::PositionFetch(e)) => {
                tracing::error!(error = %e, "Cycle aborted: position fetch failed");
                None
            }
        }
    }

    /// One pass over all positions.
    ///
    /// A failed position fetch aborts the pass before anything is
    /// evaluated. Failed order submissions are counted and logged; the
    /// remaining positions are still processed.
    pub async fn run_cycle(&self) -> Result<CycleReport, GuardError> {
        let started = Instant::now();
        let positions = self
            .gateway
            .open_positions()
            .await
            .map_err(GuardError::PositionFetch)?;
        record_latency(LatencyMetric::PositionFetch, started.elapsed());

        let mut report = CycleReport::default();
        let mut max_notional = Decimal::ZERO;

        for position in &positions {
            if position.is_flat() {
                report.flat += 1;
                continue;
            }

            report.evaluated += 1;
            max_notional = max_notional.max(position.notional());
            self.check_position(position, &mut report).await;
        }

        set_gauge(GaugeMetric::OpenPositions, Decimal::from(report.evaluated));
        set_gauge(GaugeMetric::MaxNotional, max_notional);

        Ok(report)
    }

    async fn check_position(&self, position: &Position, report: &mut CycleReport) {
        let symbol = position.symbol.as_str();

        tracing::info!(
            symbol,
            quantity = %position.signed_quantity,
            entry_price = %position.entry_price,
            notional = %position.notional().round_dp(2),
            "Position"
        );

        let step_size = self.directory.step_size(symbol);

        match evaluate(position, self.ceiling, step_size) {
            Ok(None) => {}
            Ok(Some(order)) => self.submit(&order, report).await,
            Err(skip @ EvaluationSkip::MissingLotSize { .. }) => {
                report.missing_lot_size += 1;
                tracing::warn!(symbol, "{}, skipping", skip);
            }
            Err(skip @ EvaluationSkip::BelowStepSize { .. }) => {
                report.below_step += 1;
                tracing::info!(symbol, "{}, skipping", skip);
            }
        }
    }

    async fn submit(&self, order: &CorrectionOrder, report: &mut CycleReport) {
        let started = Instant::now();
        let result = self.gateway.submit_reduce_only_market_order(order).await;
        record_latency(LatencyMetric::OrderSubmission, started.elapsed());

        match result {
            Ok(ack) => {
                report.submitted += 1;
                tracing::info!(
                    symbol = %order.symbol,
                    side = %order.side,
                    quantity = %order.quantity_str(),
                    order_id = ack.order_id,
                    client_order_id = %ack.client_order_id,
                    "Closed excess"
                );
            }
            Err(e) => {
                report.rejected += 1;
                tracing::error!(
                    symbol = %order.symbol,
                    side = %order.side,
                    quantity = %order.quantity_str(),
                    error = %e,
                    "Order rejected"
                );
            }
        }
    }
}
