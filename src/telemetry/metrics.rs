//! Guard metrics
//!
//! Emitted as debug-level tracing events so they can be scraped from the
//! log stream.

use rust_decimal::Decimal;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Position list fetch
    PositionFetch,
    /// Reduce-only order submission
    OrderSubmission,
    /// One full polling cycle
    Cycle,
}

impl LatencyMetric {
    pub fn name(&self) -> &'static str {
        match self {
            LatencyMetric::PositionFetch => "notional_guard_position_fetch_latency_ms",
            LatencyMetric::OrderSubmission => "notional_guard_order_submission_latency_ms",
            LatencyMetric::Cycle => "notional_guard_cycle_latency_ms",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Non-flat positions seen in the last cycle
    OpenPositions,
    /// Largest single-position notional seen in the last cycle
    MaxNotional,
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::OpenPositions => "notional_guard_open_positions",
            GaugeMetric::MaxNotional => "notional_guard_max_notional_usd",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    tracing::debug!(
        metric = metric.name(),
        value_ms = duration.as_millis() as u64,
        "Recording latency"
    );
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: Decimal) {
    tracing::debug!(metric = metric.name(), value = %value, "Setting gauge");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for metric in [
            LatencyMetric::PositionFetch,
            LatencyMetric::OrderSubmission,
            LatencyMetric::Cycle,
        ] {
            assert!(metric.name().starts_with("notional_guard_"));
        }
        assert!(GaugeMetric::MaxNotional.name().ends_with("_usd"));
    }
}
