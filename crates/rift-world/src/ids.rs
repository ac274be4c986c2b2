use serde::{Deserialize, Serialize};

/// Identifier for a world (dimension) on the host server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u64);

/// Protocol-level numeric entity id.
///
/// Also used for synthetic entities, whose ids are allocated by the engine
/// and exist only in replicated traffic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub i32);

/// The host's stable 128-bit unique id for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityUniqueId(pub u128);

/// A connected client able to receive entity packets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u64);
