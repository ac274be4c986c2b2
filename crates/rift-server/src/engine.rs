//! The per-tick driver.
//!
//! One [`PortalEngine`] exists per server process, explicitly constructed
//! and handed its collaborators (the world bridge and the packet sender)
//! rather than reaching for globals. The host calls the signal methods any
//! number of times during a tick and [`tick`](PortalEngine::tick) exactly
//! once afterwards.

use std::collections::HashMap;

use glam::DVec3;
use rift_config::Config;
use rift_portal::{Portal, PortalActivityManager, PortalHooks, PortalId};
use rift_replication::{
    DeferredPacketQueue, EntityTrackingManager, PacketSender, PortalEntityList, TrackingError,
};
use rift_world::{ClientId, EntityId, WorldSource};
use thiserror::Error;
use tracing::{debug, error, info};

/// Tunables the engine reads at construction.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Ticks between full entity metadata snapshots.
    pub metadata_update_interval: u64,
    /// Ticks between nearby-entity list refreshes.
    pub entity_check_interval: u64,
    /// Half-extents of the watched box around each portal endpoint.
    pub entity_range: DVec3,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            metadata_update_interval: config.render.entity_metadata_update_interval,
            entity_check_interval: config.world.entity_check_interval,
            entity_range: DVec3::new(
                config.render.portal_effect_size_xz,
                config.render.portal_effect_size_y,
                config.render.portal_effect_size_xz,
            ),
        }
    }
}

/// Faults that stop the engine from processing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A supervising error handler declared the in-memory state suspect;
    /// the engine refuses to run further rather than risk corrupt
    /// replication reaching clients.
    #[error("engine halted after a critical error")]
    Halted,

    /// A signal referenced a portal the engine does not own.
    #[error("unknown portal {0:?}")]
    UnknownPortal(PortalId),

    /// Observer bookkeeping failed; see [`TrackingError`].
    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

/// Per-portal state that only exists while the portal is active.
struct PortalRuntime {
    entity_list: PortalEntityList,
    ticks_since_activated: u64,
}

/// The portal rendering and entity replication engine.
pub struct PortalEngine<W: WorldSource, S: PacketSender> {
    world: W,
    sender: S,
    settings: EngineSettings,
    portals: HashMap<PortalId, Portal>,
    activity: PortalActivityManager,
    tracking: EntityTrackingManager,
    runtimes: HashMap<PortalId, PortalRuntime>,
    deferred: DeferredPacketQueue,
    tick: u64,
    halted: bool,
}

/// Reactions to activity transitions: build the portal runtime on
/// activation, keep the entity listing fresh while active, and tear
/// everything down on deactivation.
struct LifecycleHooks<'a, W: WorldSource, S: PacketSender> {
    world: &'a W,
    sender: &'a S,
    settings: &'a EngineSettings,
    portals: &'a HashMap<PortalId, Portal>,
    tracking: &'a mut EntityTrackingManager,
    runtimes: &'a mut HashMap<PortalId, PortalRuntime>,
}

impl<W: WorldSource, S: PacketSender> PortalHooks for LifecycleHooks<'_, W, S> {
    fn on_activate(&mut self, portal: PortalId) {
        info!(?portal, "portal activated");
        self.runtimes.insert(
            portal,
            PortalRuntime {
                entity_list: PortalEntityList::new(
                    true,
                    self.settings.entity_check_interval,
                    self.settings.entity_range,
                ),
                ticks_since_activated: 0,
            },
        );
    }

    fn on_update(&mut self, portal: PortalId) {
        let Some(p) = self.portals.get(&portal) else {
            return;
        };
        let Some(runtime) = self.runtimes.get_mut(&portal) else {
            return;
        };

        let refreshed = runtime
            .entity_list
            .update(runtime.ticks_since_activated, p, self.world);
        runtime.ticks_since_activated += 1;

        if refreshed {
            let current = runtime.entity_list.destination_entities().to_vec();
            self.tracking.reconcile(p, &current, self.world, self.sender);
        }
    }

    fn on_deactivate(&mut self, portal: PortalId) {
        info!(?portal, "portal deactivated");
        self.tracking.on_portal_deactivated(portal, self.sender);
        self.runtimes.remove(&portal);
    }

    fn on_view_activate(&mut self, portal: PortalId) {
        debug!(?portal, "portal gained its first viewer");
    }

    fn on_view_update(&mut self, _portal: PortalId) {}

    fn on_view_deactivate(&mut self, portal: PortalId) {
        debug!(?portal, "portal lost its last viewer");
    }
}

impl<W: WorldSource, S: PacketSender> PortalEngine<W, S> {
    pub fn new(world: W, sender: S, settings: EngineSettings) -> Self {
        let tracking = EntityTrackingManager::new(settings.metadata_update_interval);
        Self {
            world,
            sender,
            settings,
            portals: HashMap::new(),
            activity: PortalActivityManager::new(),
            tracking,
            runtimes: HashMap::new(),
            deferred: DeferredPacketQueue::new(),
            tick: 0,
            halted: false,
        }
    }

    /// Registers a portal. The engine reads its geometry but never changes
    /// it.
    pub fn add_portal(&mut self, portal: Portal) {
        self.portals.insert(portal.id(), portal);
    }

    /// Removes a portal outright, tearing down its trackers the way a
    /// deactivation would.
    pub fn remove_portal(&mut self, portal: PortalId) {
        self.tracking.on_portal_deactivated(portal, &self.sender);
        self.runtimes.remove(&portal);
        self.activity.forget(portal);
        self.portals.remove(&portal);
    }

    /// Signals that `portal` needs replication this tick. Callable 0..N
    /// times per tick per portal; repeats are collapsed by the activity
    /// manager.
    pub fn signal_activated(&mut self, portal: PortalId) -> Result<(), EngineError> {
        self.ensure_running()?;
        if !self.portals.contains_key(&portal) {
            return Err(EngineError::UnknownPortal(portal));
        }
        let mut hooks = LifecycleHooks {
            world: &self.world,
            sender: &self.sender,
            settings: &self.settings,
            portals: &self.portals,
            tracking: &mut self.tracking,
            runtimes: &mut self.runtimes,
        };
        self.activity.on_portal_activated_this_tick(portal, &mut hooks);
        Ok(())
    }

    /// Signals that at least one client views `portal` this tick.
    pub fn signal_viewed(&mut self, portal: PortalId) -> Result<(), EngineError> {
        self.ensure_running()?;
        if !self.portals.contains_key(&portal) {
            return Err(EngineError::UnknownPortal(portal));
        }
        let mut hooks = LifecycleHooks {
            world: &self.world,
            sender: &self.sender,
            settings: &self.settings,
            portals: &self.portals,
            tracking: &mut self.tracking,
            runtimes: &mut self.runtimes,
        };
        self.activity.on_portal_viewed_this_tick(portal, &mut hooks);
        Ok(())
    }

    /// Starts showing `entity` (as seen through `portal`) to `client`.
    pub fn set_tracking(
        &mut self,
        portal: PortalId,
        entity: EntityId,
        client: ClientId,
    ) -> Result<(), EngineError> {
        self.ensure_running()?;
        let p = self
            .portals
            .get(&portal)
            .ok_or(EngineError::UnknownPortal(portal))?;
        self.tracking.set_tracking(
            p,
            entity,
            client,
            &self.world,
            &self.sender,
            &mut self.deferred,
            self.tick,
        )?;
        Ok(())
    }

    /// Stops showing `entity` to `client`; `send_hide` may be false when a
    /// bulk hide already covered the entity.
    pub fn set_no_longer_tracking(
        &mut self,
        portal: PortalId,
        entity: EntityId,
        client: ClientId,
        send_hide: bool,
    ) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.tracking
            .set_no_longer_tracking(portal, entity, client, send_hide, &self.sender)?;
        Ok(())
    }

    /// Closes out one tick. Call exactly once per host tick, after all
    /// activity and view signals for that tick.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        self.ensure_running()?;

        self.tracking.update(&self.world, &self.sender);

        let mut hooks = LifecycleHooks {
            world: &self.world,
            sender: &self.sender,
            settings: &self.settings,
            portals: &self.portals,
            tracking: &mut self.tracking,
            runtimes: &mut self.runtimes,
        };
        self.activity.post_update(&mut hooks);

        self.deferred.drain_due(self.tick, &self.sender);
        self.tick += 1;
        Ok(())
    }

    /// Marks the engine halted. Called by the host's supervising error
    /// handler when a fault leaves in-memory state suspect; every
    /// subsequent call then fails with [`EngineError::Halted`].
    pub fn halt(&mut self) {
        error!("portal engine halted; refusing further processing");
        self.halted = true;
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.halted {
            return Err(EngineError::Halted);
        }
        Ok(())
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn portal(&self, portal: PortalId) -> Option<&Portal> {
        self.portals.get(&portal)
    }

    pub fn tracking(&self) -> &EntityTrackingManager {
        &self.tracking
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
