use std::collections::HashSet;

use glam::DVec3;
use rift_math::{Transform, direction_to_yaw, yaw_to_direction};
use rift_portal::PortalTransformations;
use rift_world::{EntityId, EntityState, EntityUniqueId};

use crate::ids::{SyntheticIdAllocator, random_unique_id};

/// A synthetic identity plus the transform pair for one real entity.
///
/// Wrapping the real entity makes packet emission ergonomic: every outgoing
/// packet needs the transformed pose and the synthetic ids, never the real
/// ones. The synthetic numeric id is kept separate from the real id so the
/// real entity and its shadow can be on the same client's screen at once.
#[derive(Clone, Debug)]
pub struct EntityInfo {
    entity: EntityId,
    synthetic_id: EntityId,
    synthetic_unique_id: EntityUniqueId,
    translation: Transform,
    rotation: Transform,
    projected: bool,
}

/// A real entity's kinematic state mapped to where it renders on the near
/// side of a portal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderedPose {
    pub position: DVec3,
    pub direction: DVec3,
    pub velocity: DVec3,
    pub head_yaw: f64,
}

impl EntityInfo {
    /// Identity for viewing `entity` through a portal: fresh synthetic ids,
    /// destination-side state mapped back into origin space.
    pub fn projected(
        transformations: &PortalTransformations,
        entity: EntityId,
        allocator: &mut SyntheticIdAllocator,
        in_use: &HashSet<EntityId>,
    ) -> Self {
        Self {
            entity,
            synthetic_id: allocator.allocate(in_use),
            synthetic_unique_id: random_unique_id(),
            translation: transformations.destination_to_origin(),
            rotation: transformations.rotate_to_origin(),
            projected: true,
        }
    }

    /// Identity for hiding or reshowing the entity where it really is: the
    /// real ids, no relocation.
    pub fn in_place(entity: EntityId, unique_id: EntityUniqueId) -> Self {
        Self {
            entity,
            synthetic_id: entity,
            synthetic_unique_id: unique_id,
            translation: Transform::identity(),
            rotation: Transform::identity(),
            projected: false,
        }
    }

    /// The real entity this identity stands in for.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn synthetic_id(&self) -> EntityId {
        self.synthetic_id
    }

    pub fn synthetic_unique_id(&self) -> EntityUniqueId {
        self.synthetic_unique_id
    }

    /// True when this identity relocates the entity through a portal rather
    /// than standing in for it in place.
    pub fn is_projected(&self) -> bool {
        self.projected
    }

    /// Where and how the entity renders: position through the translation
    /// matrix, directions through the rotation-only matrix. Pure.
    pub fn rendered_pose(&self, state: &EntityState) -> RenderedPose {
        let head_direction = self.rotation.apply_direction(yaw_to_direction(state.head_yaw));
        RenderedPose {
            position: self.translation.apply_point(state.position),
            direction: self.rotation.apply_direction(state.direction),
            velocity: self.rotation.apply_direction(state.velocity),
            head_yaw: direction_to_yaw(head_direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use rift_portal::{PortalFacing, PortalPosition};
    use rift_world::WorldId;

    fn transformations() -> PortalTransformations {
        let origin = PortalPosition::new(WorldId(0), DVec3::new(0.0, 64.0, 0.0), PortalFacing::South);
        let destination = PortalPosition::new(
            WorldId(0),
            DVec3::new(100.0, 64.0, 0.0),
            PortalFacing::South,
        );
        PortalTransformations::new(&origin, &destination)
    }

    #[test]
    fn test_projected_gets_fresh_ids() {
        let t = transformations();
        let mut allocator = SyntheticIdAllocator::new();
        let in_use = HashSet::new();

        let a = EntityInfo::projected(&t, EntityId(500), &mut allocator, &in_use);
        let b = EntityInfo::projected(&t, EntityId(500), &mut allocator, &in_use);

        assert_ne!(a.synthetic_id(), b.synthetic_id());
        assert_ne!(a.synthetic_unique_id(), b.synthetic_unique_id());
        assert!(a.is_projected());
    }

    #[test]
    fn test_in_place_keeps_real_ids_and_pose() {
        let uid = EntityUniqueId(42);
        let info = EntityInfo::in_place(EntityId(9), uid);
        assert_eq!(info.synthetic_id(), EntityId(9));
        assert_eq!(info.synthetic_unique_id(), uid);
        assert!(!info.is_projected());

        let state = EntityState {
            position: DVec3::new(1.0, 2.0, 3.0),
            ..EntityState::default()
        };
        let pose = info.rendered_pose(&state);
        assert_eq!(pose.position, state.position);
        assert_eq!(pose.direction, state.direction);
    }

    #[test]
    fn test_projected_pose_is_translated() {
        let t = transformations();
        let mut allocator = SyntheticIdAllocator::new();
        let info = EntityInfo::projected(&t, EntityId(1), &mut allocator, &HashSet::new());

        // Entity standing two blocks in front of the destination renders two
        // blocks in front of the origin.
        let state = EntityState {
            position: DVec3::new(102.0, 64.0, 0.0),
            ..EntityState::default()
        };
        let pose = info.rendered_pose(&state);
        assert!((pose.position - DVec3::new(2.0, 64.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_head_yaw_rotates_with_the_portal() {
        let origin = PortalPosition::new(WorldId(0), DVec3::ZERO, PortalFacing::South);
        let destination = PortalPosition::new(WorldId(0), DVec3::ZERO, PortalFacing::East);
        let t = PortalTransformations::new(&origin, &destination);
        let mut allocator = SyntheticIdAllocator::new();
        let info = EntityInfo::projected(&t, EntityId(1), &mut allocator, &HashSet::new());

        // Destination faces east (+X); its directions rotate back into the
        // origin's south (+Z) frame, turning a 0° head yaw into 90°.
        let state = EntityState {
            head_yaw: 0.0,
            ..EntityState::default()
        };
        let pose = info.rendered_pose(&state);
        assert!(
            (pose.head_yaw - 90.0).abs() < 1e-6,
            "expected 90 degrees, got {}",
            pose.head_yaw
        );
    }
}
