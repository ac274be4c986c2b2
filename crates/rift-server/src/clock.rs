//! Tick timing constants for the host simulation loop.

use std::time::Duration;

/// Fixed tick rate of the host simulation.
pub const TICK_RATE: u32 = 20;

/// Duration of a single tick at [`TICK_RATE`].
pub const TICK_DURATION: Duration = Duration::from_millis(1000 / TICK_RATE as u64);
