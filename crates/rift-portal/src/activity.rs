//! Per-tick portal activity and view tracking.
//!
//! Many call sites can report the same portal as active or viewed within one
//! tick (once per nearby player). Activation and deactivation work is
//! expensive (it builds and tears down entity trackers and block caches),
//! so the hooks here fire exactly once per state *transition*, never once
//! per signal. Deactivation is deferred by one full tick: a portal only
//! deactivates after a tick passes with no signal at all, so a signal
//! arriving late in the same tick cannot cause flicker.

use std::collections::HashMap;

use tracing::debug;

use crate::PortalId;

/// Callbacks invoked by [`PortalActivityManager`] at activity transitions.
///
/// World activity (block replication needed) and view activity (at least one
/// observing client) are tracked independently; activating one never fires
/// the other's hooks.
pub trait PortalHooks {
    /// The portal needs replication and was not active last tick.
    fn on_activate(&mut self, portal: PortalId);

    /// Fired once per tick for every portal active this tick.
    fn on_update(&mut self, portal: PortalId);

    /// The portal was active last tick and received no signal this tick.
    fn on_deactivate(&mut self, portal: PortalId);

    /// The portal gained its first viewer since the last view-deactivation.
    fn on_view_activate(&mut self, portal: PortalId);

    /// Fired once per tick for every portal viewed this tick.
    fn on_view_update(&mut self, portal: PortalId);

    /// The portal was viewed last tick and by nobody this tick.
    fn on_view_deactivate(&mut self, portal: PortalId);
}

#[derive(Clone, Copy, Debug, Default)]
struct PortalActivity {
    activated_this_tick: bool,
    was_active_last_tick: bool,
    viewed_this_tick: bool,
    was_viewed_last_tick: bool,
}

impl PortalActivity {
    fn is_idle(&self) -> bool {
        !self.activated_this_tick
            && !self.was_active_last_tick
            && !self.viewed_this_tick
            && !self.was_viewed_last_tick
    }
}

/// Collapses per-tick activity and view signals into edge-triggered hook
/// calls, one record per portal.
///
/// Records are created lazily on the first signal and dropped again once a
/// portal is neither active nor viewed, so idle portals cost nothing.
#[derive(Debug, Default)]
pub struct PortalActivityManager {
    records: HashMap<PortalId, PortalActivity>,
}

impl PortalActivityManager {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Signals that `portal` needs world-state replication this tick.
    /// Callable any number of times per tick; only the first call fires
    /// hooks.
    pub fn on_portal_activated_this_tick(&mut self, portal: PortalId, hooks: &mut dyn PortalHooks) {
        let record = self.records.entry(portal).or_default();
        if record.activated_this_tick {
            return;
        }
        record.activated_this_tick = true;

        if !record.was_active_last_tick {
            debug!(?portal, "portal activated");
            hooks.on_activate(portal);
        }
        hooks.on_update(portal);
    }

    /// Signals that at least one client views `portal` this tick. Same
    /// idempotency rules as [`on_portal_activated_this_tick`](Self::on_portal_activated_this_tick),
    /// on a fully independent boolean track.
    pub fn on_portal_viewed_this_tick(&mut self, portal: PortalId, hooks: &mut dyn PortalHooks) {
        let record = self.records.entry(portal).or_default();
        if record.viewed_this_tick {
            return;
        }
        record.viewed_this_tick = true;

        if !record.was_viewed_last_tick {
            debug!(?portal, "portal view-activated");
            hooks.on_view_activate(portal);
        }
        hooks.on_view_update(portal);
    }

    /// Closes out the tick. Call exactly once per tick, after every
    /// activation and view signal for that tick has been delivered.
    ///
    /// Fires the deactivation hooks for portals that missed a tick, rolls
    /// the this-tick flags into the last-tick flags, and drops records that
    /// have gone fully idle.
    pub fn post_update(&mut self, hooks: &mut dyn PortalHooks) {
        let mut idle = Vec::new();
        for (&portal, record) in &mut self.records {
            if record.was_active_last_tick && !record.activated_this_tick {
                debug!(?portal, "portal deactivated");
                hooks.on_deactivate(portal);
            }
            if record.was_viewed_last_tick && !record.viewed_this_tick {
                debug!(?portal, "portal view-deactivated");
                hooks.on_view_deactivate(portal);
            }

            record.was_active_last_tick = record.activated_this_tick;
            record.was_viewed_last_tick = record.viewed_this_tick;
            record.activated_this_tick = false;
            record.viewed_this_tick = false;

            if record.is_idle() {
                idle.push(portal);
            }
        }
        for portal in idle {
            self.records.remove(&portal);
        }
    }

    /// Drops a portal's record without firing hooks. Used when a portal is
    /// removed outright rather than deactivating normally.
    pub fn forget(&mut self, portal: PortalId) {
        self.records.remove(&portal);
    }

    /// Number of portals currently holding an activity record.
    pub fn tracked_portal_count(&self) -> usize {
        self.records.len()
    }
}
