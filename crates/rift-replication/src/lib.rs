//! Entity faking for portal views.
//!
//! Each real entity near a portal's destination gets one synthetic "shadow"
//! copy per observing portal, kept consistent for viewing clients by diffing
//! its state against the last broadcast every tick and emitting only the
//! necessary protocol updates. Shadows carry their own protocol ids so they
//! can coexist with the real entity on the same client.

mod deferred;
mod entity_info;
mod entity_list;
mod equipment;
mod ids;
mod manager;
mod packets;
mod tracker;

pub use deferred::DeferredPacketQueue;
pub use entity_info::{EntityInfo, RenderedPose};
pub use entity_list::PortalEntityList;
pub use equipment::EquipmentWatcher;
pub use ids::{SyntheticIdAllocator, random_unique_id};
pub use manager::EntityTrackingManager;
pub use packets::{AnimationType, EntityPacket, PacketSender, SendError, send_or_log};
pub use tracker::{EntityTracker, PROFILE_REMOVE_DELAY_TICKS, TrackingError};
