//! The single-threaded tick driver wiring the portal engine together.
//!
//! Everything runs on the host's main simulation thread, once per fixed
//! tick: activity and view signals arrive first, then [`PortalEngine::tick`]
//! closes out the tick. Nothing here blocks or suspends.

mod clock;
mod engine;

pub use clock::{TICK_DURATION, TICK_RATE};
pub use engine::{EngineError, EngineSettings, PortalEngine};
