//! Collaborators owned by the host runtime.
//!
//! The enforcer never owns skill levels, permissions, actors or the world; it
//! queries them through these traits. Every call is synchronous and is made on
//! the thread that drives the event bus and the scheduler.

use crate::actor::{ActorId, DroppedItem, Location};
use crate::error::ProviderError;
use crate::messaging::RichText;
use std::sync::Arc;

/// Skill-tracking service ("what is this actor's proficiency level").
pub trait SkillProvider: Send + Sync {
    /// False when the provider is not installed. Checked once at enable time.
    fn is_available(&self) -> bool {
        true
    }

    /// Current level of `skill` for `actor`. May fail while the profile is still loading.
    fn level(&self, actor: ActorId, skill: &str) -> Result<u32, ProviderError>;
}

/// Yes/no capability lookup.
pub trait PermissionLookup: Send + Sync {
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool;
}

/// Online presence and display names.
pub trait ActorDirectory: Send + Sync {
    fn is_online(&self, actor: ActorId) -> bool;

    fn display_name(&self, actor: ActorId) -> String {
        actor.to_string()
    }

    /// Actors connected right now; used to start tracking when the enforcer is enabled late.
    fn online_actors(&self) -> Vec<ActorId>;
}

/// Outbound user-facing messages.
pub trait Messenger: Send + Sync {
    fn send(&self, actor: ActorId, message: &RichText);
}

/// Item entities lying in the world.
pub trait World: Send + Sync {
    /// Items inside the box of half-size `radius` around `center`.
    fn nearby_items(&self, center: &Location, radius: f64) -> Vec<DroppedItem>;

    /// Removes an item entity. Returns false if it was already gone.
    fn remove_item(&self, item_id: u64) -> bool;
}

/// Accumulated experience of the primary reward channel.
///
/// That channel applies gains before handlers can veto them, so the interceptor
/// needs write access to claw the amount back.
pub trait ExperienceLedger: Send + Sync {
    fn total(&self, actor: ActorId) -> i64;

    /// Resets total, level and progress to zero.
    fn reset(&self, actor: ActorId);

    fn grant(&self, actor: ActorId, amount: i64);
}

/// Wall clock in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Bundle of every host collaborator, cloned cheaply into scheduled tasks.
#[derive(Clone)]
pub struct HostServices {
    pub skills: Arc<dyn SkillProvider>,
    pub permissions: Arc<dyn PermissionLookup>,
    pub actors: Arc<dyn ActorDirectory>,
    pub messenger: Arc<dyn Messenger>,
    pub world: Arc<dyn World>,
    pub experience: Arc<dyn ExperienceLedger>,
    pub clock: Arc<dyn Clock>,
}
