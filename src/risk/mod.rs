//! Risk module
//!
//! Exposure evaluation against the notional ceiling and the lot-size
//! directory that makes correction quantities exchange-compliant.

mod evaluator;
mod lot_size;
mod types;

pub use evaluator::{evaluate, round_down_to_step};
pub use lot_size::LotSizeDirectory;
pub use types::{CorrectionOrder, EvaluationSkip, Position, ReduceSide};
