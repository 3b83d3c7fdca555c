//! notional-guard: position risk guard for Binance USDⓈ-M futures
//!
//! Polls open positions and, whenever a position's notional exceeds the
//! configured ceiling, submits a reduce-only market order that trims it
//! back under the ceiling (rounded down to the symbol's lot size).
//!
//! - `exchange`: venue gateway (Binance REST, paper mode)
//! - `risk`: exposure evaluation and the lot-size directory
//! - `guard`: the polling loop
//! - `config`, `telemetry`, `cli`: ambient plumbing

pub mod cli;
pub mod config;
pub mod exchange;
pub mod guard;
pub mod risk;
pub mod telemetry;
