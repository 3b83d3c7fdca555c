//! Exposure evaluation
//!
//! Turns a position snapshot into the reduce-only order that brings its
//! notional back under the ceiling. The quantity is truncated to the
//! symbol's step size, so a correction never crosses the ceiling but may
//! leave up to one step of residual exposure above it.

use super::{CorrectionOrder, EvaluationSkip, Position, ReduceSide};
use rust_decimal::Decimal;

/// Evaluate one non-flat position against the exposure ceiling.
///
/// Callers filter flat positions first; a flat one has zero notional and
/// evaluates to `Ok(None)`.
///
/// Returns `Ok(None)` when the position is within the ceiling,
/// `Ok(Some(order))` when it must be trimmed, and `Err(skip)` when it is
/// over the ceiling but no valid order can be built.
pub fn evaluate(
    position: &Position,
    ceiling: Decimal,
    step_size: Option<Decimal>,
) -> Result<Option<CorrectionOrder>, EvaluationSkip> {
    if position.notional() <= ceiling {
        return Ok(None);
    }

    let Some(step_size) = step_size else {
        return Err(EvaluationSkip::MissingLotSize {
            symbol: position.symbol.clone(),
        });
    };

    let (side, sign) = if position.is_long() {
        (ReduceSide::ReduceLong, Decimal::ONE)
    } else {
        (ReduceSide::ReduceShort, Decimal::NEGATIVE_ONE)
    };

    let target_quantity = ceiling / position.entry_price * sign;
    let excess = (position.signed_quantity - target_quantity).abs();
    let quantity = round_down_to_step(excess, step_size);

    if quantity < step_size {
        return Err(EvaluationSkip::BelowStepSize {
            symbol: position.symbol.clone(),
            excess,
            step_size,
        });
    }

    Ok(Some(CorrectionOrder {
        symbol: position.symbol.clone(),
        side,
        quantity,
    }))
}

/// Truncate `quantity` toward zero to a whole multiple of `step_size`
pub fn round_down_to_step(quantity: Decimal, step_size: Decimal) -> Decimal {
    if step_size <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (quantity - quantity % step_size).normalize()
}
