use glam::DVec3;
use rift_world::WorldId;

use crate::PortalFacing;

/// A portal endpoint: where the frame sits and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalPosition {
    pub world: WorldId,
    /// Center of the portal window.
    pub position: DVec3,
    pub facing: PortalFacing,
}

impl PortalPosition {
    pub fn new(world: WorldId, position: DVec3, facing: PortalFacing) -> Self {
        Self {
            world,
            position,
            facing,
        }
    }

    /// Unit vector pointing out of the portal face.
    pub fn direction(&self) -> DVec3 {
        self.facing.unit_vector()
    }
}
