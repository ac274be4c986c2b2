use glam::DVec3;

/// The six cardinal orientations a portal frame can face.
///
/// Follows the game convention: north = −Z, south = +Z, east = +X,
/// west = −X, up = +Y, down = −Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortalFacing {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl PortalFacing {
    /// All six facings in canonical order.
    pub const ALL: [PortalFacing; 6] = [
        PortalFacing::North,
        PortalFacing::South,
        PortalFacing::East,
        PortalFacing::West,
        PortalFacing::Up,
        PortalFacing::Down,
    ];

    /// Outward unit normal of a portal facing this way.
    #[must_use]
    pub fn unit_vector(self) -> DVec3 {
        match self {
            PortalFacing::North => DVec3::NEG_Z,
            PortalFacing::South => DVec3::Z,
            PortalFacing::East => DVec3::X,
            PortalFacing::West => DVec3::NEG_X,
            PortalFacing::Up => DVec3::Y,
            PortalFacing::Down => DVec3::NEG_Y,
        }
    }

    /// The opposite facing (e.g. `North` → `South`).
    #[must_use]
    pub fn opposite(self) -> PortalFacing {
        match self {
            PortalFacing::North => PortalFacing::South,
            PortalFacing::South => PortalFacing::North,
            PortalFacing::East => PortalFacing::West,
            PortalFacing::West => PortalFacing::East,
            PortalFacing::Up => PortalFacing::Down,
            PortalFacing::Down => PortalFacing::Up,
        }
    }

    /// Looks a facing up by its lowercase name.
    pub fn from_name(name: &str) -> Option<PortalFacing> {
        match name {
            "north" => Some(PortalFacing::North),
            "south" => Some(PortalFacing::South),
            "east" => Some(PortalFacing::East),
            "west" => Some(PortalFacing::West),
            "up" => Some(PortalFacing::Up),
            "down" => Some(PortalFacing::Down),
            _ => None,
        }
    }
}
