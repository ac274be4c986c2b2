use rift_math::Transform;

use crate::PortalPosition;

/// The four matrices that move state between a portal's two sides.
///
/// Derived once from the endpoint pair and immutable afterwards; a portal
/// whose geometry is redefined rebuilds the whole bundle.
///
/// The point transforms recenter on one endpoint, rotate between the two
/// facings, then recenter on the other. The rotation-only pair is for
/// direction vectors (look direction, velocity), which must not pick up the
/// translation.
#[derive(Clone, Copy, Debug)]
pub struct PortalTransformations {
    origin_to_destination: Transform,
    destination_to_origin: Transform,
    rotate_to_origin: Transform,
    rotate_to_destination: Transform,
}

impl PortalTransformations {
    pub fn new(origin: &PortalPosition, destination: &PortalPosition) -> Self {
        let rotate_to_destination =
            Transform::rotation_arc(origin.direction(), destination.direction());
        // Built as the exact inverse rather than a second arc, so the pair
        // round-trips even when the facings are antiparallel.
        let rotate_to_origin = rotate_to_destination.inverse();

        let origin_to_destination = Transform::from_translation(destination.position)
            .compose(&rotate_to_destination)
            .compose(&Transform::from_translation(-origin.position));
        let destination_to_origin = Transform::from_translation(origin.position)
            .compose(&rotate_to_origin)
            .compose(&Transform::from_translation(-destination.position));

        Self {
            origin_to_destination,
            destination_to_origin,
            rotate_to_origin,
            rotate_to_destination,
        }
    }

    /// Maps a point at the origin to where it sits at the destination.
    pub fn origin_to_destination(&self) -> Transform {
        self.origin_to_destination
    }

    /// Maps a point at the destination to where it renders at the origin.
    pub fn destination_to_origin(&self) -> Transform {
        self.destination_to_origin
    }

    /// Rotation-only: destination-side directions into origin space.
    pub fn rotate_to_origin(&self) -> Transform {
        self.rotate_to_origin
    }

    /// Rotation-only: origin-side directions into destination space.
    pub fn rotate_to_destination(&self) -> Transform {
        self.rotate_to_destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PortalFacing;
    use glam::DVec3;
    use rift_world::WorldId;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: DVec3, b: DVec3) {
        assert!(
            (a - b).length() < EPSILON,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    fn sample_pair() -> (PortalPosition, PortalPosition) {
        let origin = PortalPosition::new(
            WorldId(0),
            DVec3::new(10.0, 64.0, -20.0),
            PortalFacing::South,
        );
        let destination = PortalPosition::new(
            WorldId(1),
            DVec3::new(-300.0, 70.0, 45.0),
            PortalFacing::East,
        );
        (origin, destination)
    }

    #[test]
    fn test_origin_center_maps_to_destination_center() {
        let (origin, destination) = sample_pair();
        let t = PortalTransformations::new(&origin, &destination);
        assert_close(
            t.origin_to_destination().apply_point(origin.position),
            destination.position,
        );
        assert_close(
            t.destination_to_origin().apply_point(destination.position),
            origin.position,
        );
    }

    #[test]
    fn test_point_round_trip() {
        let (origin, destination) = sample_pair();
        let t = PortalTransformations::new(&origin, &destination);
        let p = DVec3::new(12.5, 65.0, -18.0);
        let there = t.origin_to_destination().apply_point(p);
        assert_close(t.destination_to_origin().apply_point(there), p);
    }

    #[test]
    fn test_direction_round_trip() {
        let (origin, destination) = sample_pair();
        let t = PortalTransformations::new(&origin, &destination);
        let d = DVec3::new(0.2, -0.5, 0.84).normalize();
        let rotated = t.rotate_to_destination().apply_direction(d);
        assert_close(t.rotate_to_origin().apply_direction(rotated), d);
    }

    #[test]
    fn test_direction_round_trip_with_antiparallel_facings() {
        let origin = PortalPosition::new(WorldId(0), DVec3::ZERO, PortalFacing::North);
        let destination =
            PortalPosition::new(WorldId(0), DVec3::new(100.0, 0.0, 0.0), PortalFacing::South);
        let t = PortalTransformations::new(&origin, &destination);
        let d = DVec3::new(0.6, 0.0, 0.8);
        let rotated = t.rotate_to_destination().apply_direction(d);
        assert_close(t.rotate_to_origin().apply_direction(rotated), d);
    }

    #[test]
    fn test_rotation_maps_facing_vectors() {
        let (origin, destination) = sample_pair();
        let t = PortalTransformations::new(&origin, &destination);
        assert_close(
            t.rotate_to_destination().apply_direction(origin.direction()),
            destination.direction(),
        );
    }

    #[test]
    fn test_same_facing_rotation_is_identity_on_directions() {
        let origin = PortalPosition::new(WorldId(0), DVec3::ZERO, PortalFacing::West);
        let destination =
            PortalPosition::new(WorldId(0), DVec3::new(0.0, 30.0, 0.0), PortalFacing::West);
        let t = PortalTransformations::new(&origin, &destination);
        let d = DVec3::new(1.0, 2.0, 3.0);
        assert_close(t.rotate_to_destination().apply_direction(d), d);
    }
}
