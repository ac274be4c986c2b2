use rift_world::ClientId;

use crate::packets::{EntityPacket, PacketSender, send_or_log};

/// One-shot packet sends scheduled against a future tick.
///
/// The queue is drained once per tick by the driver, on the same thread that
/// runs the simulation, never by a background timer. There is no
/// cancellation: an entry whose client has since disconnected fires anyway
/// and dies harmlessly at the transport.
#[derive(Debug, Default)]
pub struct DeferredPacketQueue {
    entries: Vec<DeferredEntry>,
}

#[derive(Debug)]
struct DeferredEntry {
    due_tick: u64,
    packet: EntityPacket,
    recipients: Vec<ClientId>,
}

impl DeferredPacketQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Schedules `packet` for delivery once the driver reaches `due_tick`.
    pub fn schedule(&mut self, due_tick: u64, packet: EntityPacket, recipients: Vec<ClientId>) {
        self.entries.push(DeferredEntry {
            due_tick,
            packet,
            recipients,
        });
    }

    /// Sends every entry due at or before `tick`.
    pub fn drain_due<S: PacketSender>(&mut self, tick: u64, sender: &S) {
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].due_tick <= tick {
                let entry = self.entries.swap_remove(index);
                send_or_log(sender, &entry.packet, &entry.recipients);
            } else {
                index += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
