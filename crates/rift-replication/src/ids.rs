use std::collections::HashSet;

use rift_world::{EntityId, EntityUniqueId};

/// First id handed out by [`SyntheticIdAllocator`].
const FIRST_SYNTHETIC_ID: i32 = 1;

/// Allocates protocol entity ids for synthetic entities.
///
/// Ids are positive and increase monotonically for the lifetime of the
/// engine instance. On wraparound the allocator skips ids still held by a
/// live tracker, so a client can never see two synthetic entities share an
/// id. Collision with the host's own entity ids remains possible and is
/// accepted; the host allocates from the same positive space and the
/// overlap window is a full i32 range.
#[derive(Debug)]
pub struct SyntheticIdAllocator {
    next: i32,
}

impl SyntheticIdAllocator {
    pub fn new() -> Self {
        Self {
            next: FIRST_SYNTHETIC_ID,
        }
    }

    /// Returns the next id not present in `in_use`.
    pub fn allocate(&mut self, in_use: &HashSet<EntityId>) -> EntityId {
        loop {
            let candidate = EntityId(self.next);
            self.next = if self.next == i32::MAX {
                FIRST_SYNTHETIC_ID
            } else {
                self.next + 1
            };
            if !in_use.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for SyntheticIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh random unique id for a synthetic entity.
pub fn random_unique_id() -> EntityUniqueId {
    EntityUniqueId(rand::random())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_positive_and_monotonic() {
        let mut allocator = SyntheticIdAllocator::new();
        let in_use = HashSet::new();
        let mut previous = 0;
        for _ in 0..100 {
            let id = allocator.allocate(&in_use);
            assert!(id.0 > previous, "ids must increase: {} after {}", id.0, previous);
            previous = id.0;
        }
    }

    #[test]
    fn test_live_ids_are_skipped() {
        let mut allocator = SyntheticIdAllocator::new();
        let in_use: HashSet<EntityId> = [EntityId(1), EntityId(2), EntityId(4)].into();
        assert_eq!(allocator.allocate(&in_use), EntityId(3));
        assert_eq!(allocator.allocate(&in_use), EntityId(5));
    }

    #[test]
    fn test_wraparound_skips_live_ids() {
        let mut allocator = SyntheticIdAllocator {
            next: i32::MAX - 1,
        };
        let in_use: HashSet<EntityId> = [EntityId(i32::MAX), EntityId(1)].into();
        assert_eq!(allocator.allocate(&in_use), EntityId(i32::MAX - 1));
        // MAX is live, 1 is live: the allocator wraps past both.
        assert_eq!(allocator.allocate(&in_use), EntityId(2));
    }

    #[test]
    fn test_unique_ids_are_distinct() {
        let a = random_unique_id();
        let b = random_unique_id();
        assert_ne!(a, b);
    }
}
