//! Yaw angle conversions.
//!
//! The game measures yaw in degrees, clockwise when viewed from above, with
//! 0° looking along +Z. Head rotation travels on the wire as a yaw, but
//! rotating it through a portal requires a direction vector, so both
//! conversions live here.

use glam::DVec3;

/// Horizontal unit direction for a yaw in degrees.
pub fn yaw_to_direction(yaw_degrees: f64) -> DVec3 {
    let yaw = yaw_degrees.to_radians();
    DVec3::new(-yaw.sin(), 0.0, yaw.cos())
}

/// Yaw in degrees for a direction vector, normalized to [-180, 180).
/// The vertical component is ignored.
pub fn direction_to_yaw(direction: DVec3) -> f64 {
    (-direction.x).atan2(direction.z).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_cardinal_yaws() {
        assert!((yaw_to_direction(0.0) - DVec3::Z).length() < EPSILON);
        assert!((yaw_to_direction(90.0) - DVec3::NEG_X).length() < EPSILON);
        assert!((yaw_to_direction(180.0) - DVec3::NEG_Z).length() < EPSILON);
        assert!((yaw_to_direction(-90.0) - DVec3::X).length() < EPSILON);
    }

    #[test]
    fn test_yaw_round_trip() {
        for yaw in [-179.0, -90.0, -45.5, 0.0, 30.0, 90.0, 179.9] {
            let recovered = direction_to_yaw(yaw_to_direction(yaw));
            assert!(
                (recovered - yaw).abs() < 1e-6,
                "yaw {} round-tripped to {}",
                yaw,
                recovered
            );
        }
    }

    #[test]
    fn test_vertical_component_ignored() {
        let flat = direction_to_yaw(DVec3::new(0.0, 0.0, 1.0));
        let pitched = direction_to_yaw(DVec3::new(0.0, 0.9, 1.0));
        assert!((flat - pitched).abs() < EPSILON);
    }
}
