use glam::DVec3;
use rift_math::Aabb;
use rift_portal::{Portal, PortalPosition};
use rift_world::{EntityId, WorldSource};

/// The entity listings a portal cares about: entities around its origin,
/// and (when the far side is rendered) around its destination.
///
/// Listings refresh on an interval rather than every tick; a box query over
/// the whole effect region is too expensive for 20 Hz.
#[derive(Debug)]
pub struct PortalEntityList {
    require_destination: bool,
    check_interval: u64,
    half_extents: DVec3,
    origin_entities: Vec<EntityId>,
    destination_entities: Vec<EntityId>,
}

impl PortalEntityList {
    pub fn new(require_destination: bool, check_interval: u64, half_extents: DVec3) -> Self {
        Self {
            require_destination,
            check_interval,
            half_extents,
            origin_entities: Vec::new(),
            destination_entities: Vec::new(),
        }
    }

    /// Refreshes the listings when the check interval elapses. Returns true
    /// when a refresh happened.
    pub fn update<W: WorldSource>(
        &mut self,
        ticks_since_activated: u64,
        portal: &Portal,
        world: &W,
    ) -> bool {
        if ticks_since_activated % self.check_interval != 0 {
            return false;
        }

        self.origin_entities = self.nearby(world, portal.origin());
        if self.require_destination {
            self.destination_entities = self.nearby(world, portal.destination());
        }
        true
    }

    fn nearby<W: WorldSource>(&self, world: &W, position: &PortalPosition) -> Vec<EntityId> {
        let bounds = Aabb::from_center_half_extents(position.position, self.half_extents);
        world.entities_within(position.world, &bounds)
    }

    pub fn origin_entities(&self) -> &[EntityId] {
        &self.origin_entities
    }

    pub fn destination_entities(&self) -> &[EntityId] {
        &self.destination_entities
    }
}
