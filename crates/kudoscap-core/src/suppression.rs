//! Per-actor timestamp of the most recent denial.
//!
//! Entries are never expired actively: whether an actor is inside the window is
//! decided by comparing timestamps at read time. Entries go away on departure
//! or shutdown.

use crate::actor::ActorId;
use crate::config::ConfigStore;
use dashmap::DashMap;
use std::sync::Arc;

pub const DEFAULT_WINDOW_MS: i64 = 5000;

/// Where the window length comes from.
#[derive(Debug)]
enum WindowLength {
    Fixed(i64),
    /// Read from the active snapshot on every check, so a reload applies at once.
    Configured(Arc<ConfigStore>),
}

#[derive(Debug)]
pub struct SuppressionWindow {
    length: WindowLength,
    last_denial: DashMap<ActorId, i64>,
}

impl Default for SuppressionWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS)
    }
}

impl SuppressionWindow {
    /// Window of a fixed length.
    pub fn new(window_ms: i64) -> Self {
        Self {
            length: WindowLength::Fixed(window_ms),
            last_denial: DashMap::new(),
        }
    }

    /// Window whose length follows `suppression.window-ms` in `config`.
    pub fn configured(config: Arc<ConfigStore>) -> Self {
        Self {
            length: WindowLength::Configured(config),
            last_denial: DashMap::new(),
        }
    }

    pub fn window_ms(&self) -> i64 {
        match &self.length {
            WindowLength::Fixed(ms) => *ms,
            WindowLength::Configured(config) => config.snapshot().suppression.window_ms,
        }
    }

    /// Record (or overwrite) the denial time for `actor`.
    pub fn record_denial(&self, actor: ActorId, now_ms: i64) {
        self.last_denial.insert(actor, now_ms);
    }

    /// True iff a denial was recorded and `now_ms - denial <= window`.
    pub fn is_within_window(&self, actor: ActorId, now_ms: i64) -> bool {
        let window_ms = self.window_ms();
        self.last_denial
            .get(&actor)
            .map(|entry| now_ms - *entry <= window_ms)
            .unwrap_or(false)
    }

    pub fn last_denial(&self, actor: ActorId) -> Option<i64> {
        self.last_denial.get(&actor).map(|entry| *entry)
    }

    pub fn forget(&self, actor: ActorId) {
        self.last_denial.remove(&actor);
    }

    pub fn clear(&self) {
        self.last_denial.clear();
    }

    pub fn len(&self) -> usize {
        self.last_denial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_denial.is_empty()
    }
}
