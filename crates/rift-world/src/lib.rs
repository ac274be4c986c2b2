//! Handles and capability traits for reaching the host game engine.
//!
//! The engine never stores live references into the host's world: entities
//! are opaque ids resolved through [`WorldSource`] every tick, so a handle
//! whose entity was removed simply stops resolving instead of dangling.

mod bridge;
mod ids;
mod state;

pub use bridge::{BridgeError, BridgeSelector, HostVersion, VersionRange, WorldSource};
pub use ids::{ClientId, EntityId, EntityUniqueId, WorldId};
pub use state::{EntityState, EquipmentSlot, ItemStack};
