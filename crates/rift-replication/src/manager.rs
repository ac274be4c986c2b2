//! Ownership and lifecycle of all entity trackers.

use std::collections::{HashMap, HashSet};

use rift_portal::{Portal, PortalId};
use rift_world::{ClientId, EntityId, WorldSource};
use tracing::debug;

use crate::deferred::DeferredPacketQueue;
use crate::entity_info::EntityInfo;
use crate::ids::SyntheticIdAllocator;
use crate::packets::{AnimationType, EntityPacket, PacketSender, send_or_log};
use crate::tracker::{EntityTracker, TrackingError};

/// Owns every live [`EntityTracker`], keyed by (portal, entity).
///
/// Invariants: at most one tracker per pair, and every tracker created here
/// is destroyed here. An orphaned tracker would leave a synthetic entity on
/// clients with nothing updating or hiding it.
pub struct EntityTrackingManager {
    trackers: HashMap<(PortalId, EntityId), EntityTracker>,
    allocator: SyntheticIdAllocator,
    metadata_update_interval: u64,
}

impl EntityTrackingManager {
    pub fn new(metadata_update_interval: u64) -> Self {
        Self {
            trackers: HashMap::new(),
            allocator: SyntheticIdAllocator::new(),
            metadata_update_interval,
        }
    }

    fn synthetic_ids_in_use(&self) -> HashSet<EntityId> {
        self.trackers
            .values()
            .map(|t| t.info().synthetic_id())
            .collect()
    }

    /// Creates a tracker for `entity` seen through `portal` unless one
    /// already exists. No tracker is created for an entity the world can no
    /// longer resolve.
    fn ensure_tracker<W: WorldSource>(&mut self, portal: &Portal, entity: EntityId, world: &W) {
        if self.trackers.contains_key(&(portal.id(), entity)) {
            return;
        }
        let Some(state) = world.entity_state(entity) else {
            debug!(?entity, "not tracking entity the world cannot resolve");
            return;
        };

        let in_use = self.synthetic_ids_in_use();
        let info = EntityInfo::projected(
            portal.transformations(),
            entity,
            &mut self.allocator,
            &in_use,
        );
        debug!(?entity, portal = ?portal.id(), synthetic = ?info.synthetic_id(), "tracking entity");
        self.trackers.insert(
            (portal.id(), entity),
            EntityTracker::new(info, portal.id(), &state, self.metadata_update_interval),
        );
    }

    /// Reconciles the portal's trackers against its freshly-refreshed
    /// destination listing: entities new to the listing gain trackers,
    /// departed ones are torn down with a hide to every observer.
    pub fn reconcile<W: WorldSource, S: PacketSender>(
        &mut self,
        portal: &Portal,
        current: &[EntityId],
        world: &W,
        sender: &S,
    ) {
        let current_set: HashSet<EntityId> = current.iter().copied().collect();
        let departed: Vec<EntityId> = self
            .trackers
            .keys()
            .filter(|(p, e)| *p == portal.id() && !current_set.contains(e))
            .map(|&(_, e)| e)
            .collect();
        for entity in departed {
            self.destroy_tracker(portal.id(), entity, sender);
        }

        for &entity in current {
            self.ensure_tracker(portal, entity, world);
        }
    }

    fn destroy_tracker<S: PacketSender>(
        &mut self,
        portal: PortalId,
        entity: EntityId,
        sender: &S,
    ) {
        if let Some(tracker) = self.trackers.remove(&(portal, entity)) {
            debug!(?entity, ?portal, "destroying tracker");
            let hide = EntityPacket::Hide {
                ids: vec![tracker.info().synthetic_id()],
            };
            // One hide per observing client; failures stay per-client.
            for &client in tracker.observers() {
                send_or_log(sender, &hide, &[client]);
            }
        }
    }

    /// Tears down every tracker belonging to `portal`, replacing the
    /// per-tracker hides with one bulk hide per observer.
    pub fn on_portal_deactivated<S: PacketSender>(&mut self, portal: PortalId, sender: &S) {
        let keys: Vec<(PortalId, EntityId)> = self
            .trackers
            .keys()
            .filter(|(p, _)| *p == portal)
            .copied()
            .collect();

        let mut hidden_per_client: HashMap<ClientId, Vec<EntityId>> = HashMap::new();
        for key in &keys {
            let tracker = &self.trackers[key];
            for &client in tracker.observers() {
                hidden_per_client
                    .entry(client)
                    .or_default()
                    .push(tracker.info().synthetic_id());
            }
        }
        for (client, ids) in hidden_per_client {
            send_or_log(sender, &EntityPacket::Hide { ids }, &[client]);
        }

        for key in keys {
            self.trackers.remove(&key);
        }
    }

    /// One pass of per-tracker updates. Entities the world no longer
    /// resolves are torn down instead of updated; a failure on one tracker
    /// never aborts the rest.
    pub fn update<W: WorldSource, S: PacketSender>(&mut self, world: &W, sender: &S) {
        // Snapshot which (portal, entity) pairs are visible under which
        // synthetic id before the mutable pass, for mount resolution.
        let visible: HashMap<(PortalId, EntityId), EntityId> = self
            .trackers
            .iter()
            .map(|(&key, tracker)| (key, tracker.info().synthetic_id()))
            .collect();

        let mut dead: Vec<(PortalId, EntityId)> = Vec::new();
        for (&(portal, entity), tracker) in &mut self.trackers {
            let Some(state) = world.entity_state(entity) else {
                dead.push((portal, entity));
                continue;
            };

            let visible_passengers: Vec<EntityId> = state
                .passengers
                .iter()
                .filter_map(|passenger| visible.get(&(portal, *passenger)).copied())
                .collect();
            tracker.update(&state, visible_passengers, sender);
        }

        for (portal, entity) in dead {
            self.destroy_tracker(portal, entity, sender);
        }
    }

    /// Starts showing `entity` (seen through `portal`) to `client`,
    /// creating the tracker on demand. A double-add reports a usage error
    /// and changes nothing; an entity the world cannot resolve is skipped
    /// with a debug log, since it will drop from the listing shortly anyway.
    pub fn set_tracking<W: WorldSource, S: PacketSender>(
        &mut self,
        portal: &Portal,
        entity: EntityId,
        client: ClientId,
        world: &W,
        sender: &S,
        deferred: &mut DeferredPacketQueue,
        current_tick: u64,
    ) -> Result<(), TrackingError> {
        self.ensure_tracker(portal, entity, world);
        let Some(tracker) = self.trackers.get_mut(&(portal.id(), entity)) else {
            debug!(?entity, "cannot track entity that no longer exists");
            return Ok(());
        };
        let Some(state) = world.entity_state(entity) else {
            debug!(?entity, "cannot track entity that no longer exists");
            return Ok(());
        };
        tracker.add_tracking(client, &state, sender, deferred, current_tick)
    }

    /// Stops showing `entity` to `client`. Removing a client that was not
    /// observing is a usage error.
    pub fn set_no_longer_tracking<S: PacketSender>(
        &mut self,
        portal: PortalId,
        entity: EntityId,
        client: ClientId,
        send_hide: bool,
        sender: &S,
    ) -> Result<(), TrackingError> {
        match self.trackers.get_mut(&(portal, entity)) {
            Some(tracker) => tracker.remove_tracking(client, send_hide, sender),
            None => Err(TrackingError::NotTracking(client)),
        }
    }

    /// Forwards an animation on `entity` to every portal view of it.
    pub fn on_animation<S: PacketSender>(
        &self,
        entity: EntityId,
        animation: AnimationType,
        sender: &S,
    ) {
        for tracker in self
            .trackers
            .values()
            .filter(|t| t.info().entity() == entity)
        {
            tracker.on_animation(animation, sender);
        }
    }

    /// Forwards `collector` picking up `collected`, for each portal view
    /// where both entities are visible.
    pub fn on_pickup<S: PacketSender>(
        &self,
        collector: EntityId,
        collected: EntityId,
        sender: &S,
    ) {
        for (&(portal, entity), tracker) in &self.trackers {
            if entity == collector
                && let Some(collected_tracker) = self.trackers.get(&(portal, collected))
            {
                tracker.on_pickup(collected_tracker.info(), sender);
            }
        }
    }

    /// The tracker rendering `entity` through `portal`, if any. Used for
    /// mount-chain rendering.
    pub fn tracker(&self, portal: PortalId, entity: EntityId) -> Option<&EntityTracker> {
        self.trackers.get(&(portal, entity))
    }

    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
