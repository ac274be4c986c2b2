use glam::DVec2;

use crate::{PortalPosition, PortalTransformations};

/// Identifier for a portal, unique within one engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(pub u64);

/// A paired origin/destination region with a fixed relative rotation.
///
/// Created by portal-management code and handed to the engine, which
/// replicates state through it but treats the geometry as read-only.
#[derive(Clone, Debug)]
pub struct Portal {
    id: PortalId,
    origin: PortalPosition,
    destination: PortalPosition,
    /// Width and height of the portal window in blocks.
    size: DVec2,
    transformations: PortalTransformations,
    cross_world: bool,
}

impl Portal {
    pub fn new(
        id: PortalId,
        origin: PortalPosition,
        destination: PortalPosition,
        size: DVec2,
    ) -> Self {
        let transformations = PortalTransformations::new(&origin, &destination);
        let cross_world = origin.world != destination.world;
        Self {
            id,
            origin,
            destination,
            size,
            transformations,
            cross_world,
        }
    }

    pub fn id(&self) -> PortalId {
        self.id
    }

    pub fn origin(&self) -> &PortalPosition {
        &self.origin
    }

    pub fn destination(&self) -> &PortalPosition {
        &self.destination
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn transformations(&self) -> &PortalTransformations {
        &self.transformations
    }

    /// Whether the two endpoints sit in different worlds.
    pub fn is_cross_world(&self) -> bool {
        self.cross_world
    }
}
