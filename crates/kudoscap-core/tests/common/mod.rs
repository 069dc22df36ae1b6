//! In-memory host used by the integration tests.

#![allow(dead_code)]

use kudoscap_core::{
    ActorDirectory, ActorId, Clock, ConfigStore, DroppedItem, Enforcer, EventBus,
    ExperienceLedger, HostServices, ItemKind, KudosConfig, Location, Messenger, PermissionLookup,
    ProviderError, RichText, SkillProvider, World,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub struct FakeHost {
    pub available: AtomicBool,
    online: Mutex<HashSet<ActorId>>,
    names: Mutex<HashMap<ActorId, String>>,
    levels: Mutex<HashMap<ActorId, Result<u32, ProviderError>>>,
    permissions: Mutex<HashMap<ActorId, HashSet<String>>>,
    messages: Mutex<Vec<(ActorId, RichText)>>,
    items: Mutex<Vec<DroppedItem>>,
    next_item: AtomicU64,
    experience: Mutex<HashMap<ActorId, i64>>,
    now_ms: AtomicI64,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            online: Mutex::default(),
            names: Mutex::default(),
            levels: Mutex::default(),
            permissions: Mutex::default(),
            messages: Mutex::default(),
            items: Mutex::default(),
            next_item: AtomicU64::new(1),
            experience: Mutex::default(),
            now_ms: AtomicI64::new(1_700_000_000_000),
        })
    }

    pub fn services(self: &Arc<Self>) -> HostServices {
        HostServices {
            skills: self.clone(),
            permissions: self.clone(),
            actors: self.clone(),
            messenger: self.clone(),
            world: self.clone(),
            experience: self.clone(),
            clock: self.clone(),
        }
    }

    /// Bring a new actor online. Its skill profile is not loaded yet.
    pub fn connect(&self, name: &str) -> ActorId {
        let actor = ActorId::new();
        self.names.lock().unwrap().insert(actor, name.to_string());
        self.online.lock().unwrap().insert(actor);
        actor
    }

    pub fn reconnect(&self, actor: ActorId) {
        self.online.lock().unwrap().insert(actor);
    }

    pub fn disconnect(&self, actor: ActorId) {
        self.online.lock().unwrap().remove(&actor);
    }

    pub fn set_level(&self, actor: ActorId, level: u32) {
        self.levels.lock().unwrap().insert(actor, Ok(level));
    }

    pub fn fail_queries(&self, actor: ActorId) {
        self.levels
            .lock()
            .unwrap()
            .insert(actor, Err(ProviderError::Query("database locked".into())));
    }

    pub fn grant(&self, actor: ActorId, permission: &str) {
        self.permissions
            .lock()
            .unwrap()
            .entry(actor)
            .or_default()
            .insert(permission.to_string());
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn messages_for(&self, actor: ActorId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == actor)
            .map(|(_, msg)| msg.plain())
            .collect()
    }

    pub fn drop_item(&self, kind: ItemKind, location: Location) -> u64 {
        let id = self.next_item.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().push(DroppedItem { id, kind, location });
        id
    }

    pub fn items(&self) -> Vec<DroppedItem> {
        self.items.lock().unwrap().clone()
    }

    /// Simulate the primary channel applying a gain before dispatch.
    pub fn apply_experience(&self, actor: ActorId, amount: i64) {
        *self.experience.lock().unwrap().entry(actor).or_insert(0) += amount;
    }
}

impl SkillProvider for FakeHost {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn level(&self, actor: ActorId, _skill: &str) -> Result<u32, ProviderError> {
        self.levels
            .lock()
            .unwrap()
            .get(&actor)
            .cloned()
            .unwrap_or(Err(ProviderError::NotLoaded))
    }
}

impl PermissionLookup for FakeHost {
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool {
        self.permissions
            .lock()
            .unwrap()
            .get(&actor)
            .map(|set| set.contains(permission))
            .unwrap_or(false)
    }
}

impl ActorDirectory for FakeHost {
    fn is_online(&self, actor: ActorId) -> bool {
        self.online.lock().unwrap().contains(&actor)
    }

    fn display_name(&self, actor: ActorId) -> String {
        self.names
            .lock()
            .unwrap()
            .get(&actor)
            .cloned()
            .unwrap_or_else(|| actor.to_string())
    }

    fn online_actors(&self) -> Vec<ActorId> {
        self.online.lock().unwrap().iter().copied().collect()
    }
}

impl Messenger for FakeHost {
    fn send(&self, actor: ActorId, message: &RichText) {
        self.messages.lock().unwrap().push((actor, message.clone()));
    }
}

impl World for FakeHost {
    fn nearby_items(&self, center: &Location, radius: f64) -> Vec<DroppedItem> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| center.within_box(&item.location, radius))
            .cloned()
            .collect()
    }

    fn remove_item(&self, item_id: u64) -> bool {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != item_id);
        items.len() < before
    }
}

impl ExperienceLedger for FakeHost {
    fn total(&self, actor: ActorId) -> i64 {
        self.experience.lock().unwrap().get(&actor).copied().unwrap_or(0)
    }

    fn reset(&self, actor: ActorId) {
        self.experience.lock().unwrap().insert(actor, 0);
    }

    fn grant(&self, actor: ActorId, amount: i64) {
        self.apply_experience(actor, amount);
    }
}

impl Clock for FakeHost {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Enabled enforcer registered on a fresh bus.
pub fn enabled_enforcer(host: &Arc<FakeHost>, config: KudosConfig) -> (Arc<Enforcer>, EventBus) {
    let store = Arc::new(ConfigStore::in_memory(config));
    let enforcer = Arc::new(Enforcer::new(store, host.services()));
    enforcer.enable().expect("enable enforcer");
    let mut bus = EventBus::new();
    enforcer.register(&mut bus);
    (enforcer, bus)
}

pub fn mine_location() -> Location {
    Location::new("world", 100.0, -40.0, 250.0)
}

pub fn ticks(enforcer: &Enforcer, n: usize) {
    for _ in 0..n {
        enforcer.tick();
    }
}
