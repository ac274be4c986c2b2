//! Driver-level tests: the full signal → tick → packet flow.

use super::*;
use glam::{DVec2, DVec3};
use rift_math::Aabb;
use rift_portal::{PortalFacing, PortalPosition};
use rift_replication::{EntityPacket, PROFILE_REMOVE_DELAY_TICKS, SendError};
use rift_world::{EntityState, EntityUniqueId, WorldId};
use std::cell::RefCell;
use std::collections::HashMap as StdHashMap;
use std::rc::Rc;

/// Mutable in-memory world shared between the test and the engine.
#[derive(Default, Clone)]
struct TestWorld {
    entities: Rc<RefCell<StdHashMap<EntityId, EntityState>>>,
}

impl TestWorld {
    fn insert(&self, entity: EntityId, state: EntityState) {
        self.entities.borrow_mut().insert(entity, state);
    }

    fn remove(&self, entity: EntityId) {
        self.entities.borrow_mut().remove(&entity);
    }

    fn move_entity(&self, entity: EntityId, offset: DVec3) {
        let mut entities = self.entities.borrow_mut();
        if let Some(state) = entities.get_mut(&entity) {
            state.position += offset;
        }
    }
}

impl WorldSource for TestWorld {
    fn entity_state(&self, entity: EntityId) -> Option<EntityState> {
        self.entities.borrow().get(&entity).cloned()
    }

    fn entity_unique_id(&self, entity: EntityId) -> Option<EntityUniqueId> {
        self.entities
            .borrow()
            .contains_key(&entity)
            .then(|| EntityUniqueId(entity.0 as u128))
    }

    fn entities_within(&self, _world: WorldId, bounds: &Aabb) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = self
            .entities
            .borrow()
            .iter()
            .filter(|(_, state)| bounds.contains_point(state.position))
            .map(|(&id, _)| id)
            .collect();
        found.sort();
        found
    }
}

#[derive(Default, Clone)]
struct RecordingSender {
    sent: Rc<RefCell<Vec<(EntityPacket, Vec<ClientId>)>>>,
}

impl RecordingSender {
    fn packets(&self) -> Vec<EntityPacket> {
        self.sent.borrow().iter().map(|(p, _)| p.clone()).collect()
    }

    fn clear(&self) {
        self.sent.borrow_mut().clear();
    }

    fn count_matching(&self, predicate: impl Fn(&EntityPacket) -> bool) -> usize {
        self.sent.borrow().iter().filter(|(p, _)| predicate(p)).count()
    }
}

impl PacketSender for RecordingSender {
    fn send(&self, packet: &EntityPacket, recipients: &[ClientId]) -> Result<(), SendError> {
        self.sent
            .borrow_mut()
            .push((packet.clone(), recipients.to_vec()));
        Ok(())
    }
}

const PORTAL: PortalId = PortalId(1);
const ENTITY: EntityId = EntityId(10);
const CLIENT: ClientId = ClientId(1);
const DESTINATION: DVec3 = DVec3::new(100.0, 64.0, 0.0);

fn settings() -> EngineSettings {
    EngineSettings {
        metadata_update_interval: 5,
        entity_check_interval: 1,
        entity_range: DVec3::new(15.0, 10.0, 15.0),
    }
}

fn test_portal() -> Portal {
    Portal::new(
        PORTAL,
        PortalPosition::new(WorldId(0), DVec3::new(0.0, 64.0, 0.0), PortalFacing::South),
        PortalPosition::new(WorldId(0), DESTINATION, PortalFacing::South),
        DVec2::new(2.0, 3.0),
    )
}

fn engine_with_entity() -> (PortalEngine<TestWorld, RecordingSender>, TestWorld, RecordingSender)
{
    let world = TestWorld::default();
    world.insert(
        ENTITY,
        EntityState {
            position: DESTINATION,
            ..EntityState::default()
        },
    );
    let sender = RecordingSender::default();
    let mut engine = PortalEngine::new(world.clone(), sender.clone(), settings());
    engine.add_portal(test_portal());
    (engine, world, sender)
}

fn is_movement(packet: &EntityPacket) -> bool {
    matches!(
        packet,
        EntityPacket::Teleport { .. }
            | EntityPacket::RelativeMove { .. }
            | EntityPacket::MoveLook { .. }
    )
}

#[test]
fn test_end_to_end_track_move_and_leave() {
    let (mut engine, world, sender) = engine_with_entity();

    // Tick 0: the portal activates, the listing refresh creates a tracker,
    // and a client starts observing.
    engine.signal_activated(PORTAL).unwrap();
    assert_eq!(engine.tracking().tracker_count(), 1);
    engine.set_tracking(PORTAL, ENTITY, CLIENT).unwrap();
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Show { .. })),
        1
    );
    engine.tick().unwrap();
    sender.clear();

    // Ticks 1-5: stationary. No movement packets; metadata exactly once,
    // at the interval boundary.
    for _ in 1..=5 {
        engine.signal_activated(PORTAL).unwrap();
        engine.tick().unwrap();
    }
    assert_eq!(sender.count_matching(is_movement), 0, "{:?}", sender.packets());
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Metadata { .. })),
        1
    );
    sender.clear();

    // Tick 6: a 10-block jump exceeds the relative-move range.
    world.move_entity(ENTITY, DVec3::new(10.0, 0.0, 0.0));
    engine.signal_activated(PORTAL).unwrap();
    engine.tick().unwrap();
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Teleport { .. })),
        1
    );
    assert_eq!(sender.count_matching(is_movement), 1, "teleport only, no move");
    sender.clear();

    // Tick 7: the entity disappears; the refreshed listing tears the
    // tracker down with exactly one hide for the observer.
    world.remove(ENTITY);
    engine.signal_activated(PORTAL).unwrap();
    engine.tick().unwrap();
    assert_eq!(engine.tracking().tracker_count(), 0);
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Hide { .. })),
        1
    );
}

#[test]
fn test_missed_signal_deactivates_and_bulk_hides() {
    let (mut engine, _world, sender) = engine_with_entity();

    engine.signal_activated(PORTAL).unwrap();
    engine.set_tracking(PORTAL, ENTITY, CLIENT).unwrap();
    engine.tick().unwrap();
    sender.clear();

    // No signal this tick: the portal deactivates during post-update.
    engine.tick().unwrap();
    assert_eq!(engine.tracking().tracker_count(), 0);
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Hide { .. })),
        1
    );
    sender.clear();

    // Continued silence fires nothing further.
    engine.tick().unwrap();
    assert_eq!(sender.packets().len(), 0);
}

#[test]
fn test_small_move_stays_relative() {
    let (mut engine, world, sender) = engine_with_entity();

    engine.signal_activated(PORTAL).unwrap();
    engine.set_tracking(PORTAL, ENTITY, CLIENT).unwrap();
    engine.tick().unwrap();
    sender.clear();

    world.move_entity(ENTITY, DVec3::new(0.5, 0.0, 0.0));
    engine.signal_activated(PORTAL).unwrap();
    engine.tick().unwrap();
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::RelativeMove { .. })),
        1
    );
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Teleport { .. })),
        0
    );
}

#[test]
fn test_faked_player_profile_removed_after_delay() {
    let (mut engine, world, sender) = engine_with_entity();
    world.insert(
        ENTITY,
        EntityState {
            position: DESTINATION,
            is_living: true,
            is_player: true,
            ..EntityState::default()
        },
    );

    engine.set_tracking(PORTAL, ENTITY, CLIENT).unwrap();
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::AddPlayerProfile { .. })),
        1
    );
    sender.clear();

    for _ in 0..PROFILE_REMOVE_DELAY_TICKS {
        engine.tick().unwrap();
    }
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::RemovePlayerProfile { .. })),
        0,
        "removal must not fire early"
    );

    engine.tick().unwrap();
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::RemovePlayerProfile { .. })),
        1
    );
}

#[test]
fn test_unknown_portal_is_rejected() {
    let world = TestWorld::default();
    let sender = RecordingSender::default();
    let mut engine = PortalEngine::new(world, sender, settings());

    let missing = PortalId(404);
    assert!(matches!(
        engine.signal_activated(missing),
        Err(EngineError::UnknownPortal(_))
    ));
    assert!(matches!(
        engine.set_tracking(missing, ENTITY, CLIENT),
        Err(EngineError::UnknownPortal(_))
    ));
}

#[test]
fn test_double_tracking_error_propagates() {
    let (mut engine, _world, _sender) = engine_with_entity();

    engine.set_tracking(PORTAL, ENTITY, CLIENT).unwrap();
    assert!(matches!(
        engine.set_tracking(PORTAL, ENTITY, CLIENT),
        Err(EngineError::Tracking(TrackingError::AlreadyTracking(_)))
    ));
}

#[test]
fn test_halted_engine_refuses_everything() {
    let (mut engine, _world, _sender) = engine_with_entity();

    engine.halt();
    assert!(engine.is_halted());
    assert!(matches!(engine.tick(), Err(EngineError::Halted)));
    assert!(matches!(
        engine.signal_activated(PORTAL),
        Err(EngineError::Halted)
    ));
    assert!(matches!(
        engine.set_tracking(PORTAL, ENTITY, CLIENT),
        Err(EngineError::Halted)
    ));
}

#[test]
fn test_remove_portal_tears_down_trackers() {
    let (mut engine, _world, sender) = engine_with_entity();

    engine.signal_activated(PORTAL).unwrap();
    engine.set_tracking(PORTAL, ENTITY, CLIENT).unwrap();
    sender.clear();

    engine.remove_portal(PORTAL);
    assert_eq!(engine.tracking().tracker_count(), 0);
    assert_eq!(
        sender.count_matching(|p| matches!(p, EntityPacket::Hide { .. })),
        1
    );
    assert!(engine.portal(PORTAL).is_none());
}
