//! Best-effort removal of drops that leaked out of a cancelled break.

use crate::actor::{DroppedItem, ItemKind, Location};
use crate::host::World;
use crate::scheduler::{Scheduler, TaskHandle};
use std::sync::Arc;
use tracing::info;

pub struct ResidueCleanup {
    world: Arc<dyn World>,
}

impl ResidueCleanup {
    pub fn new(world: Arc<dyn World>) -> Self {
        Self { world }
    }

    /// Sweep around `location` after `delay` ticks.
    pub fn schedule_cleanup(
        self: &Arc<Self>,
        scheduler: &Scheduler,
        location: Location,
        kinds: Vec<ItemKind>,
        radius: f64,
        delay: u64,
    ) -> TaskHandle {
        let cleanup = Arc::clone(self);
        scheduler.run_later(delay, move || {
            cleanup.sweep(&location, &kinds, radius);
        })
    }

    /// Remove every item of `kinds` inside the box around `location`. Returns what was removed.
    pub fn sweep(&self, location: &Location, kinds: &[ItemKind], radius: f64) -> Vec<DroppedItem> {
        let mut removed = Vec::new();
        for item in self.world.nearby_items(location, radius) {
            if !kinds.contains(&item.kind) {
                continue;
            }
            if self.world.remove_item(item.id) {
                info!(item = %item.kind, location = %item.location, "removed dropped item");
                removed.push(item);
            }
        }
        removed
    }
}
