use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Slots a living entity can hold equipment in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Feet,
    Legs,
    Chest,
    Head,
}

impl EquipmentSlot {
    /// All slots in canonical order.
    pub const ALL: [EquipmentSlot; 6] = [
        EquipmentSlot::MainHand,
        EquipmentSlot::OffHand,
        EquipmentSlot::Feet,
        EquipmentSlot::Legs,
        EquipmentSlot::Chest,
        EquipmentSlot::Head,
    ];
}

/// A stack of items occupying one equipment slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Material name (e.g. "iron_sword").
    pub item: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

/// One tick's authoritative snapshot of a real entity, read from the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub position: DVec3,
    /// Unit look vector of the entity's body.
    pub direction: DVec3,
    pub velocity: DVec3,
    /// Head yaw in degrees, driven by the entity's own yaw rather than its
    /// velocity direction.
    pub head_yaw: f64,
    /// Entities riding this one, in seat order.
    pub passengers: Vec<EntityId>,
    /// Current loadout; empty for non-living entities.
    pub equipment: Vec<(EquipmentSlot, ItemStack)>,
    pub is_living: bool,
    pub is_player: bool,
    /// Host-encoded metadata blob, forwarded opaquely.
    pub metadata: Vec<u8>,
}

impl Default for EntityState {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            direction: DVec3::Z,
            velocity: DVec3::ZERO,
            head_yaw: 0.0,
            passengers: Vec::new(),
            equipment: Vec::new(),
            is_living: false,
            is_player: false,
            metadata: Vec::new(),
        }
    }
}
