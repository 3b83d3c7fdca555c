//! Guard types

use crate::exchange::GatewayError;
use thiserror::Error;

/// Errors that end a polling cycle early
#[derive(Debug, Error)]
pub enum GuardError {
    /// The position list could not be fetched; nothing was evaluated
    #[error("position fetch failed, cycle aborted: {0}")]
    PositionFetch(#[source] GatewayError),
}

/// Outcome counters for one polling cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Non-flat positions run through the evaluator
    pub evaluated: usize,
    /// Flat positions ignored
    pub flat: usize,
    /// Correction orders acknowledged by the gateway
    pub submitted: usize,
    /// Correction orders the gateway refused or failed to deliver
    pub rejected: usize,
    /// Over-ceiling positions without a known step size
    pub missing_lot_size: usize,
    /// Over-ceiling positions whose excess is under one step
    pub below_step: usize,
}

impl CycleReport {
    /// True when the cycle neither placed nor skipped any correction
    pub fn is_quiet(&self) -> bool {
        self.submitted == 0 && self.rejected == 0 && self.missing_lot_size == 0 && self.below_step == 0
    }
}
