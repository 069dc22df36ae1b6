//! kudoscap-core: skill-gated block break enforcement.
//!
//! Gates breaking of valuable blocks behind a mining level taken from an
//! external skill provider, and neutralizes experience that leaks through side
//! channels right after a denial.
//!
//! - [`ReadinessTracker`]: polls the provider after join until it answers.
//! - [`AuthorizationEngine`]: allow/deny plus the side effects of a denial.
//! - [`SuppressionWindow`]: per-actor time of the last denial.
//! - [`RewardInterceptor`]: zeroes rewards that land inside the window.
//! - [`ResidueCleanup`]: sweeps leaked drops one tick after a denial.
//! - [`Enforcer`]: owns all of the above and receives host events.

pub mod actor;
pub mod authorization;
pub mod commands;
pub mod config;
pub mod dispatch;
mod enforcer;
mod error;
pub mod events;
pub mod host;
pub mod messaging;
pub mod readiness;
pub mod residue;
pub mod rewards;
pub mod rules;
pub mod runtime;
pub mod scheduler;
pub mod suppression;

pub use actor::{ActorId, BlockKind, DroppedItem, HeldTool, ItemKind, Location};
pub use authorization::{AuthorizationEngine, Decision, SideEffects, Verdict};
pub use commands::{handle_command, CommandOutcome, CommandSender};
pub use config::{ConfigStore, KudosConfig, BYPASS_PERMISSION, RELOAD_PERMISSION};
pub use dispatch::{EventBus, EventPriority, HandlerChain};
pub use enforcer::{Enforcer, HANDLER_ID};
pub use error::{KudosError, KudosResult, ProviderError};
pub use events::{ActorJoined, ActorLeft, BlockBreak, BreakAttempt, ExperienceChange, SkillXpGain};
pub use host::{
    ActorDirectory, Clock, ExperienceLedger, HostServices, Messenger, PermissionLookup,
    SkillProvider, SystemClock, World,
};
pub use messaging::RichText;
pub use readiness::{ReadinessState, ReadinessTracker, StopReason};
pub use residue::ResidueCleanup;
pub use rewards::{RewardInterceptor, RewardOutcome};
pub use rules::{RestrictedResource, RestrictionRule, RuleSet};
pub use scheduler::{Scheduler, TaskHandle, TaskStatus};
pub use suppression::SuppressionWindow;
