use std::collections::HashMap;

use rift_world::{EquipmentSlot, ItemStack};

/// Watches a living entity's equipment and reports per-slot changes.
///
/// The watcher starts with nothing known, so the first check reports the
/// entire current loadout, which is what a fresh observer needs after the
/// show packet.
#[derive(Debug, Default)]
pub struct EquipmentWatcher {
    last_known: HashMap<EquipmentSlot, ItemStack>,
}

impl EquipmentWatcher {
    pub fn new() -> Self {
        Self {
            last_known: HashMap::new(),
        }
    }

    /// Diffs `current` against the last-known loadout and returns only the
    /// slots that changed, in canonical slot order. A slot that emptied
    /// diffs to `None`.
    pub fn check_for_changes(
        &mut self,
        current: &[(EquipmentSlot, ItemStack)],
    ) -> Vec<(EquipmentSlot, Option<ItemStack>)> {
        let current_map: HashMap<EquipmentSlot, ItemStack> = current.iter().cloned().collect();

        let mut changes = Vec::new();
        for slot in EquipmentSlot::ALL {
            let new_item = current_map.get(&slot);
            if self.last_known.get(&slot) != new_item {
                changes.push((slot, new_item.cloned()));
            }
        }

        self.last_known = current_map;
        changes
    }
}
