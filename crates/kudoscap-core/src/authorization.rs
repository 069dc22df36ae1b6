//! Decides whether a block break is allowed and which side effects a denial needs.
//!
//! Order of checks:
//! 1. readiness gate (applies even to bypass holders)
//! 2. fresh level query (failure is its own denial)
//! 3. bypass permission
//! 4. the restriction rule for the block kind, if any
//!
//! The engine only decides. Applying the side effects (flags on the event,
//! message, suppression entry, cleanup) is the enforcer's job.

use crate::actor::ActorId;
use crate::config::{KudosConfig, BYPASS_PERMISSION};
use crate::events::BreakAttempt;
use crate::host::{ActorDirectory, PermissionLookup, SkillProvider};
use crate::messaging::{Messages, RichText};
use crate::readiness::ReadinessTracker;
use crate::rules::{RestrictedResource, RuleSet, Violation};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    DeniedNotReady,
    DeniedLevelTooLow,
    DeniedMissingTool,
    DeniedQueryFailure,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allowed
    }
}

/// What must happen as a consequence of a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideEffects {
    pub cancel: bool,
    pub suppress_output: bool,
    pub zero_reward: bool,
    pub message: Option<RichText>,
    pub record_suppression: bool,
    pub schedule_cleanup: bool,
}

impl SideEffects {
    pub fn none() -> Self {
        Self::default()
    }

    /// Full denial: block the action, tell the actor, open the suppression
    /// window and sweep for leaked drops.
    fn deny_with(message: RichText) -> Self {
        Self {
            cancel: true,
            suppress_output: true,
            zero_reward: true,
            message: Some(message),
            record_suppression: true,
            schedule_cleanup: true,
        }
    }

    /// Block the action silently; nothing else.
    fn deny_quietly() -> Self {
        Self {
            cancel: true,
            suppress_output: true,
            zero_reward: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    pub effects: SideEffects,
    /// Level observed for this attempt, when it was queried successfully.
    pub level: Option<u32>,
    /// Restricted group the block belongs to, if any.
    pub resource: Option<RestrictedResource>,
}

impl Verdict {
    fn allowed(level: Option<u32>, resource: Option<RestrictedResource>) -> Self {
        Self {
            decision: Decision::Allowed,
            effects: SideEffects::none(),
            level,
            resource,
        }
    }
}

pub struct AuthorizationEngine {
    readiness: Arc<ReadinessTracker>,
    skills: Arc<dyn SkillProvider>,
    permissions: Arc<dyn PermissionLookup>,
    actors: Arc<dyn ActorDirectory>,
}

impl AuthorizationEngine {
    pub fn new(
        readiness: Arc<ReadinessTracker>,
        skills: Arc<dyn SkillProvider>,
        permissions: Arc<dyn PermissionLookup>,
        actors: Arc<dyn ActorDirectory>,
    ) -> Self {
        Self {
            readiness,
            skills,
            permissions,
            actors,
        }
    }

    pub fn evaluate(&self, attempt: &BreakAttempt, config: &KudosConfig) -> Verdict {
        let actor = attempt.actor;
        let name = self.actors.display_name(actor);
        let resource = RestrictedResource::classify(&attempt.block);
        let verbose = config.verbose_logging;

        if verbose {
            info!(actor = %name, block = %attempt.block, location = %attempt.location, "block break attempt");
        }

        if !self.readiness.is_ready(actor) {
            info!(
                actor = %name,
                location = %attempt.location,
                "blocking early break - skill data not ready"
            );
            let message = Messages::new(&config.messages).not_ready();
            return Verdict {
                decision: Decision::DeniedNotReady,
                effects: SideEffects::deny_with(message),
                level: None,
                resource,
            };
        }

        let level = match self.skills.level(actor, &config.readiness.reference_skill) {
            Ok(level) => level,
            Err(e) => {
                warn!(actor = %name, error = %e, "failed to get skill level");
                return Verdict {
                    decision: Decision::DeniedQueryFailure,
                    effects: SideEffects::deny_quietly(),
                    level: None,
                    resource,
                };
            }
        };

        if self.has_bypass(actor, verbose, &name) {
            return Verdict::allowed(Some(level), resource);
        }

        let rules = RuleSet::from_config(config);
        let Some(rule) = rules.rule_for(&attempt.block) else {
            return Verdict::allowed(Some(level), resource);
        };

        let decision = match rule.check(level, &attempt.tool) {
            None => return Verdict::allowed(Some(level), resource),
            Some(Violation::LevelTooLow) => Decision::DeniedLevelTooLow,
            Some(Violation::MissingTool) => Decision::DeniedMissingTool,
        };

        info!(
            actor = %name,
            resource = rule.resource.label(),
            location = %attempt.location,
            level,
            required = rule.required_level,
            silk_touch = attempt.tool.silk_touch,
            ?decision,
            "cancelling restricted break"
        );

        Verdict {
            decision,
            effects: SideEffects::deny_with(rule.message.clone()),
            level: Some(level),
            resource,
        }
    }

    /// Current bypass status; also backs the informational bypass command.
    pub fn has_bypass(&self, actor: ActorId, verbose: bool, name: &str) -> bool {
        let bypass = self.permissions.has_permission(actor, BYPASS_PERMISSION);
        if verbose {
            info!(actor = %name, bypass, "checking bypass");
        } else {
            debug!(actor = %name, bypass, "checking bypass");
        }
        bypass
    }
}
