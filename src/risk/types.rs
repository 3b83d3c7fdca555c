//! Risk types

use rust_decimal::Decimal;
use thiserror::Error;

/// A snapshot of one open position as reported by the venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Trading symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Position size; positive for long, negative for short
    pub signed_quantity: Decimal,
    /// Average entry price
    pub entry_price: Decimal,
}

impl Position {
    /// Create a new position snapshot
    pub fn new(symbol: impl Into<String>, signed_quantity: Decimal, entry_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            signed_quantity,
            entry_price,
        }
    }

    /// A flat position carries no exposure and is never evaluated
    pub fn is_flat(&self) -> bool {
        self.signed_quantity.is_zero()
    }

    pub fn is_long(&self) -> bool {
        self.signed_quantity.is_sign_positive() && !self.is_flat()
    }

    /// Absolute quote-currency exposure, `|quantity * entry_price|`
    pub fn notional(&self) -> Decimal {
        (self.signed_quantity * self.entry_price).abs()
    }
}

/// Direction of a corrective order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceSide {
    /// Shrink a long position (venue SELL)
    ReduceLong,
    /// Shrink a short position (venue BUY)
    ReduceShort,
}

impl ReduceSide {
    /// Venue order side for this correction
    pub fn venue_side(&self) -> &'static str {
        match self {
            ReduceSide::ReduceLong => "SELL",
            ReduceSide::ReduceShort => "BUY",
        }
    }
}

impl std::fmt::Display for ReduceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.venue_side())
    }
}

/// A reduce-only order that trims a position back under the ceiling.
///
/// `quantity` is strictly positive, a multiple of the symbol's step size
/// and normalized so it renders without trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOrder {
    pub symbol: String,
    pub side: ReduceSide,
    pub quantity: Decimal,
}

impl CorrectionOrder {
    /// Quantity as the plain decimal string the venue accepts
    pub fn quantity_str(&self) -> String {
        self.quantity.normalize().to_string()
    }
}

/// Reasons an over-ceiling position is left without a correction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationSkip {
    /// No lot-size filter is known for the symbol
    #[error("step size not found for {symbol}")]
    MissingLotSize { symbol: String },
    /// Excess exposure is smaller than one tradable increment
    #[error("excess {excess} for {symbol} is below step size {step_size}")]
    BelowStepSize {
        symbol: String,
        excess: Decimal,
        step_size: Decimal,
    },
}
