//! Monitoring loop
//!
//! Polls positions, trims anything above the exposure ceiling and sleeps a
//! fixed interval between cycles. Venue errors end the current cycle at
//! worst; the loop itself only stops on shutdown.

mod monitor;
mod types;

pub use monitor::Guard;
pub use types::{CycleReport, GuardError};
