//! Portal geometry and per-tick activity tracking.
//!
//! A portal is a paired origin/destination region with a fixed relative
//! rotation. This crate owns the geometry types, the transform bundle that
//! maps state between the two sides, and the state machine deciding which
//! portals need replication each tick.

mod activity;
mod facing;
mod portal;
mod position;
mod transformations;

pub use activity::{PortalActivityManager, PortalHooks};
pub use facing::PortalFacing;
pub use portal::{Portal, PortalId};
pub use position::PortalPosition;
pub use transformations::PortalTransformations;
