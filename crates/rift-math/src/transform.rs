use glam::{DMat4, DQuat, DVec3};

/// Immutable affine transform over 3D space.
///
/// Wraps a column-major 4×4 matrix; every operation returns a new value.
/// Built once when a portal's geometry is defined and only read afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: DMat4,
}

impl Transform {
    /// The identity transform, neutral element of [`compose`](Self::compose).
    pub fn identity() -> Self {
        Self {
            matrix: DMat4::IDENTITY,
        }
    }

    /// Pure translation by `offset`.
    pub fn from_translation(offset: DVec3) -> Self {
        Self {
            matrix: DMat4::from_translation(offset),
        }
    }

    /// Pure rotation carrying the direction `from` onto the direction `to`
    /// along the shortest arc. Inputs need not be normalized.
    pub fn rotation_arc(from: DVec3, to: DVec3) -> Self {
        Self {
            matrix: DMat4::from_quat(DQuat::from_rotation_arc(from.normalize(), to.normalize())),
        }
    }

    /// Composition: the result applies `other` first, then `self`.
    ///
    /// Order matters: `a.compose(b)` and `b.compose(a)` differ whenever the
    /// two transforms do not commute.
    #[must_use]
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Applies the full affine map (rotation and translation) to a point.
    pub fn apply_point(&self, point: DVec3) -> DVec3 {
        self.matrix.transform_point3(point)
    }

    /// Applies only the linear part to a direction; translation is ignored.
    pub fn apply_direction(&self, direction: DVec3) -> DVec3 {
        self.matrix.transform_vector3(direction)
    }

    /// The inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Transform {
        Transform {
            matrix: self.matrix.inverse(),
        }
    }
}
