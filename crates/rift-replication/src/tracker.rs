//! Per-entity diffing against the last broadcast state.

use std::collections::HashSet;

use glam::DVec3;
use rift_portal::PortalId;
use rift_world::{ClientId, EntityId, EntityState};
use thiserror::Error;

use crate::deferred::DeferredPacketQueue;
use crate::entity_info::{EntityInfo, RenderedPose};
use crate::equipment::EquipmentWatcher;
use crate::packets::{AnimationType, EntityPacket, PacketSender, send_or_log};

/// Relative-move packets cap out at this many blocks per axis; any larger
/// jump must go out as an absolute teleport.
const MAX_RELATIVE_MOVE: f64 = 8.0;

/// Ticks between sending a faked player's profile and pulling it again.
///
/// The profile only needs to exist long enough for the client to accept the
/// spawn; leaving it would show the fake in the player list.
pub const PROFILE_REMOVE_DELAY_TICKS: u64 = 20;

/// Observer bookkeeping errors. These indicate a coordinator bug rather
/// than a runtime condition, so the failing call leaves all state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    #[error("client {0:?} is already tracking this entity")]
    AlreadyTracking(ClientId),

    #[error("client {0:?} was not tracking this entity")]
    NotTracking(ClientId),
}

/// Keeps one client-visible synthetic entity consistent with its real
/// counterpart.
///
/// One tracker exists per (entity, portal) pair and is never shared: the
/// same real entity viewed through two portals gets two trackers with
/// independent synthetic identities. The last-broadcast snapshot is seeded
/// from the entity's state at creation, so the first update of a stationary
/// entity emits nothing but its interval metadata.
pub struct EntityTracker {
    info: EntityInfo,
    portal: PortalId,
    observers: HashSet<ClientId>,
    /// Present only for living entities; others have no equipment.
    equipment_watcher: Option<EquipmentWatcher>,
    is_player: bool,

    last_position: DVec3,
    last_direction: DVec3,
    last_velocity: DVec3,
    last_head_yaw: f64,
    last_passengers: Vec<EntityId>,

    metadata_update_interval: u64,
    ticks_since_created: u64,
}

impl EntityTracker {
    pub fn new(
        info: EntityInfo,
        portal: PortalId,
        initial: &EntityState,
        metadata_update_interval: u64,
    ) -> Self {
        let pose = info.rendered_pose(initial);
        Self {
            info,
            portal,
            observers: HashSet::new(),
            equipment_watcher: initial.is_living.then(EquipmentWatcher::new),
            is_player: initial.is_player,
            last_position: pose.position,
            last_direction: pose.direction,
            last_velocity: pose.velocity,
            last_head_yaw: pose.head_yaw,
            last_passengers: initial.passengers.clone(),
            metadata_update_interval,
            ticks_since_created: 0,
        }
    }

    /// One tick of diffing against the last broadcast.
    ///
    /// `visible_passengers` is the entity's current passenger list already
    /// resolved to synthetic ids by the manager; passengers without a
    /// visible tracker are omitted from mount packets.
    pub fn update<S: PacketSender>(
        &mut self,
        state: &EntityState,
        visible_passengers: Vec<EntityId>,
        sender: &S,
    ) {
        let recipients: Vec<ClientId> = self.observers.iter().copied().collect();
        let id = self.info.synthetic_id();
        let pose = self.info.rendered_pose(state);

        self.send_movement_updates(&pose, sender, &recipients);

        if let Some(watcher) = &mut self.equipment_watcher {
            let changes = watcher.check_for_changes(&state.equipment);
            if !changes.is_empty() {
                send_or_log(
                    sender,
                    &EntityPacket::Equipment { id, slots: changes },
                    &recipients,
                );
            }
        }

        // Mounts diff by list equality, not element-wise.
        if state.passengers != self.last_passengers {
            self.last_passengers = state.passengers.clone();
            send_or_log(
                sender,
                &EntityPacket::Mount {
                    id,
                    passengers: visible_passengers,
                },
                &recipients,
            );
        }

        // The metadata packet carries a lot (sneaking, poses, beds on newer
        // hosts) and is expensive, so it refreshes on an interval instead of
        // diffing every tick.
        if self.ticks_since_created % self.metadata_update_interval == 0 {
            send_or_log(
                sender,
                &EntityPacket::Metadata {
                    id,
                    metadata: state.metadata.clone(),
                },
                &recipients,
            );
        }

        if pose.velocity != self.last_velocity {
            self.last_velocity = pose.velocity;
            send_or_log(
                sender,
                &EntityPacket::Velocity {
                    id,
                    velocity: pose.velocity,
                },
                &recipients,
            );
        }

        self.ticks_since_created += 1;
    }

    fn send_movement_updates<S: PacketSender>(
        &mut self,
        pose: &RenderedPose,
        sender: &S,
        recipients: &[ClientId],
    ) {
        let id = self.info.synthetic_id();
        let offset = pose.position - self.last_position;
        let position_changed = pose.position != self.last_position;
        let direction_changed = pose.direction != self.last_direction;
        self.last_position = pose.position;
        self.last_direction = pose.direction;

        let within_relative_range = offset.abs().max_element() < MAX_RELATIVE_MOVE;
        // Move and look must be combined when both change, or newer hosts
        // desync the body rotation.
        if position_changed && !within_relative_range {
            send_or_log(
                sender,
                &EntityPacket::Teleport {
                    id,
                    position: pose.position,
                    direction: pose.direction,
                },
                recipients,
            );
        } else if position_changed && direction_changed {
            send_or_log(
                sender,
                &EntityPacket::MoveLook {
                    id,
                    offset,
                    direction: pose.direction,
                },
                recipients,
            );
        } else if position_changed {
            send_or_log(sender, &EntityPacket::RelativeMove { id, offset }, recipients);
        } else if direction_changed {
            send_or_log(
                sender,
                &EntityPacket::Look {
                    id,
                    direction: pose.direction,
                },
                recipients,
            );
        }

        // Head yaw is driven by the entity's own yaw, not its velocity, and
        // diffs independently of the body branch above.
        if pose.head_yaw != self.last_head_yaw {
            self.last_head_yaw = pose.head_yaw;
            send_or_log(
                sender,
                &EntityPacket::HeadRotation {
                    id,
                    head_yaw: pose.head_yaw,
                },
                recipients,
            );
        }
    }

    /// Forwards an animation immediately; animations carry no state to diff.
    pub fn on_animation<S: PacketSender>(&self, animation: AnimationType, sender: &S) {
        let recipients: Vec<ClientId> = self.observers.iter().copied().collect();
        send_or_log(
            sender,
            &EntityPacket::Animation {
                id: self.info.synthetic_id(),
                animation,
            },
            &recipients,
        );
    }

    /// Forwards an item pickup immediately.
    pub fn on_pickup<S: PacketSender>(&self, picked_up: &EntityInfo, sender: &S) {
        let recipients: Vec<ClientId> = self.observers.iter().copied().collect();
        send_or_log(
            sender,
            &EntityPacket::PickupItem {
                collector: self.info.synthetic_id(),
                collected: picked_up.synthetic_id(),
            },
            &recipients,
        );
    }

    /// Starts showing this entity to `client`.
    ///
    /// A faked player identity needs a player profile on the client before
    /// the show packet will render a skin; the profile is pulled again
    /// [`PROFILE_REMOVE_DELAY_TICKS`] later through the deferred queue so
    /// the fake does not linger in the player list.
    pub fn add_tracking<S: PacketSender>(
        &mut self,
        client: ClientId,
        state: &EntityState,
        sender: &S,
        deferred: &mut DeferredPacketQueue,
        current_tick: u64,
    ) -> Result<(), TrackingError> {
        if self.observers.contains(&client) {
            return Err(TrackingError::AlreadyTracking(client));
        }
        self.observers.insert(client);

        let sending_player_profile = self.is_player && self.info.is_projected();
        if sending_player_profile {
            send_or_log(
                sender,
                &EntityPacket::AddPlayerProfile {
                    id: self.info.synthetic_id(),
                    unique_id: self.info.synthetic_unique_id(),
                },
                &[client],
            );
        }

        let pose = self.info.rendered_pose(state);
        send_or_log(
            sender,
            &EntityPacket::Show {
                id: self.info.synthetic_id(),
                unique_id: self.info.synthetic_unique_id(),
                position: pose.position,
                direction: pose.direction,
                head_yaw: pose.head_yaw,
            },
            &[client],
        );

        if sending_player_profile {
            deferred.schedule(
                current_tick + PROFILE_REMOVE_DELAY_TICKS,
                EntityPacket::RemovePlayerProfile {
                    unique_id: self.info.synthetic_unique_id(),
                },
                vec![client],
            );
        }
        Ok(())
    }

    /// Stops showing this entity to `client`. The hide packet is optional so
    /// batch teardown can replace per-tracker hides with one bulk hide.
    pub fn remove_tracking<S: PacketSender>(
        &mut self,
        client: ClientId,
        send_hide: bool,
        sender: &S,
    ) -> Result<(), TrackingError> {
        if !self.observers.remove(&client) {
            return Err(TrackingError::NotTracking(client));
        }
        if send_hide {
            send_or_log(
                sender,
                &EntityPacket::Hide {
                    ids: vec![self.info.synthetic_id()],
                },
                &[client],
            );
        }
        Ok(())
    }

    pub fn info(&self) -> &EntityInfo {
        &self.info
    }

    pub fn portal(&self) -> PortalId {
        self.portal
    }

    pub fn observers(&self) -> &HashSet<ClientId> {
        &self.observers
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
