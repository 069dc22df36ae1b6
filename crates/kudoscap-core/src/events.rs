//! Notifications delivered by the host runtime.
//!
//! Mutable fields are the host's hooks: handlers flip them and the host acts
//! on the final values once the handler chain has run.

use crate::actor::{ActorId, BlockKind, HeldTool, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct ActorJoined {
    pub actor: ActorId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorLeft {
    pub actor: ActorId,
}

/// What the actor is trying to break and with which tool.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakAttempt {
    pub actor: ActorId,
    pub block: BlockKind,
    pub location: Location,
    pub tool: HeldTool,
}

/// Privileged action notification.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockBreak {
    pub attempt: BreakAttempt,
    pub cancelled: bool,
    pub drop_items: bool,
    /// Experience the block would drop inline.
    pub exp_to_drop: i32,
}

impl BlockBreak {
    pub fn new(attempt: BreakAttempt, exp_to_drop: i32) -> Self {
        Self {
            attempt,
            cancelled: false,
            drop_items: true,
            exp_to_drop,
        }
    }
}

/// Primary reward channel: applied before handlers see it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceChange {
    pub actor: ActorId,
    pub amount: i32,
}

/// Secondary reward channel: skill progression, cancellable before effect.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillXpGain {
    pub actor: ActorId,
    pub skill: String,
    pub raw_xp: f32,
    pub cancelled: bool,
}

impl SkillXpGain {
    pub fn new(actor: ActorId, skill: impl Into<String>, raw_xp: f32) -> Self {
        Self {
            actor,
            skill: skill.into(),
            raw_xp,
            cancelled: false,
        }
    }
}

/// Common surface the handler chain needs from every event.
pub trait HostEvent {
    /// Cancelled events skip handlers registered with `ignore_cancelled`.
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl HostEvent for ActorJoined {}

impl HostEvent for ActorLeft {}

impl HostEvent for ExperienceChange {}

impl HostEvent for BlockBreak {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl HostEvent for SkillXpGain {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
