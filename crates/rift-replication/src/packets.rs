//! The logical packet model.
//!
//! Encoding into wire bytes belongs to the packet-sender collaborator; the
//! engine only decides *which* update to send and with *what* computed
//! values. All positions and directions here are already in rendered
//! (origin-side) space.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use rift_world::{ClientId, EntityId, EntityUniqueId, EquipmentSlot, ItemStack};

/// Entity animation kinds forwarded through portals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationType {
    SwingMainArm,
    SwingOffHand,
    TakeDamage,
    LeaveBed,
    CriticalEffect,
    MagicCriticalEffect,
}

/// One logical protocol update for a synthetic entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityPacket {
    /// Spawn the synthetic entity at the given rendered pose.
    Show {
        id: EntityId,
        unique_id: EntityUniqueId,
        position: DVec3,
        direction: DVec3,
        head_yaw: f64,
    },
    /// Remove synthetic entities from the client.
    Hide { ids: Vec<EntityId> },
    /// Absolute position update, used when a relative move would overflow
    /// the protocol's ±8 per-axis range.
    Teleport {
        id: EntityId,
        position: DVec3,
        direction: DVec3,
    },
    /// Relative movement, each axis strictly within ±8.
    RelativeMove { id: EntityId, offset: DVec3 },
    /// Look direction change only.
    Look { id: EntityId, direction: DVec3 },
    /// Combined relative move and look.
    MoveLook {
        id: EntityId,
        offset: DVec3,
        direction: DVec3,
    },
    /// Head yaw, tracked separately from the body direction.
    HeadRotation { id: EntityId, head_yaw: f64 },
    Velocity { id: EntityId, velocity: DVec3 },
    /// Only the slots that changed; `None` clears a slot.
    Equipment {
        id: EntityId,
        slots: Vec<(EquipmentSlot, Option<ItemStack>)>,
    },
    /// The entity's current passenger list, by synthetic id.
    Mount {
        id: EntityId,
        passengers: Vec<EntityId>,
    },
    Animation {
        id: EntityId,
        animation: AnimationType,
    },
    /// `collector` picked up the item entity `collected`.
    PickupItem {
        collector: EntityId,
        collected: EntityId,
    },
    /// Synthetic player profile, sent before showing a faked player so the
    /// client renders the skin.
    AddPlayerProfile {
        id: EntityId,
        unique_id: EntityUniqueId,
    },
    RemovePlayerProfile { unique_id: EntityUniqueId },
    /// Full metadata snapshot (opaque host encoding).
    Metadata { id: EntityId, metadata: Vec<u8> },
}

/// Failure to deliver a packet.
#[derive(Debug, Error)]
pub enum SendError {
    /// The recipient disconnected between tracking and delivery.
    #[error("client {0:?} is disconnected")]
    Disconnected(ClientId),

    /// The transport refused the packet.
    #[error("packet rejected by transport: {0}")]
    Rejected(String),
}

/// Collaborator that encodes and delivers entity packets.
///
/// Sends are fire-and-forget: the engine never retries. Implementations
/// must preserve per-recipient FIFO delivery order; ordering between packet
/// kinds beyond what the tracker emits in sequence is not promised.
pub trait PacketSender {
    fn send(&self, packet: &EntityPacket, recipients: &[ClientId]) -> Result<(), SendError>;
}

/// Sends a packet, downgrading delivery failures to a warning.
///
/// A dead client must not take down the remaining trackers in the tick.
/// Packets with no recipients are skipped outright.
pub fn send_or_log<S: PacketSender>(sender: &S, packet: &EntityPacket, recipients: &[ClientId]) {
    if recipients.is_empty() {
        return;
    }
    if let Err(err) = sender.send(packet, recipients) {
        warn!("dropping entity packet: {err}");
    }
}
