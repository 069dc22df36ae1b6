//! The enforcer: single owner of all per-actor state.
//!
//! Every host notification goes through one of the `on_*` methods, which is
//! what keeps the ordering guarantee simple: a denial records its suppression
//! entry before `on_block_break` returns, so any reward event dispatched after
//! it observes the entry.
//!
//! ```text
//! join ──► ReadinessTracker::begin_tracking ──► (poll every N ticks)
//! break ─► AuthorizationEngine::evaluate ──► apply side effects
//!                                             ├─ cancel / no drops / no exp
//!                                             ├─ message
//!                                             ├─ SuppressionWindow::record_denial
//!                                             └─ ResidueCleanup (next tick)
//! xp ────► RewardInterceptor ──► SuppressionWindow::is_within_window
//! ```

use crate::actor::ActorId;
use crate::authorization::{AuthorizationEngine, Verdict};
use crate::config::{ConfigStore, KudosConfig};
use crate::dispatch::{EventBus, EventPriority};
use crate::error::{KudosError, KudosResult};
use crate::events::{ActorJoined, ActorLeft, BlockBreak, ExperienceChange, SkillXpGain};
use crate::host::HostServices;
use crate::readiness::ReadinessTracker;
use crate::residue::ResidueCleanup;
use crate::rewards::{RewardInterceptor, RewardOutcome};
use crate::rules::RuleSet;
use crate::scheduler::Scheduler;
use crate::suppression::SuppressionWindow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Handler id used when registering on an [`EventBus`].
pub const HANDLER_ID: &str = "kudoscap";

pub struct Enforcer {
    config: Arc<ConfigStore>,
    services: HostServices,
    scheduler: Arc<Scheduler>,
    readiness: Arc<ReadinessTracker>,
    suppression: Arc<SuppressionWindow>,
    engine: AuthorizationEngine,
    rewards: RewardInterceptor,
    cleanup: Arc<ResidueCleanup>,
    enabled: AtomicBool,
}

impl Enforcer {
    /// Build a disabled enforcer. Call [`Enforcer::enable`] before feeding events.
    pub fn new(config: Arc<ConfigStore>, services: HostServices) -> Self {
        let readiness = Arc::new(ReadinessTracker::new());
        let suppression = Arc::new(SuppressionWindow::configured(Arc::clone(&config)));
        let engine = AuthorizationEngine::new(
            Arc::clone(&readiness),
            Arc::clone(&services.skills),
            Arc::clone(&services.permissions),
            Arc::clone(&services.actors),
        );
        let rewards = RewardInterceptor::new(
            Arc::clone(&suppression),
            Arc::clone(&services.experience),
            Arc::clone(&services.clock),
            Arc::clone(&services.actors),
        );
        let cleanup = Arc::new(ResidueCleanup::new(Arc::clone(&services.world)));
        Self {
            config,
            services,
            scheduler: Arc::new(Scheduler::new()),
            readiness,
            suppression,
            engine,
            rewards,
            cleanup,
            enabled: AtomicBool::new(false),
        }
    }

    /// Check collaborators and start tracking actors that are already online.
    ///
    /// Fails with [`KudosError::ConfigurationAbsent`] when the skill provider is
    /// missing; the enforcer then stays disabled and ignores every event.
    pub fn enable(&self) -> KudosResult<()> {
        if !self.services.skills.is_available() {
            error!("skill provider not found - enforcer requires it to function, staying disabled");
            return Err(KudosError::ConfigurationAbsent("skill provider".to_string()));
        }
        self.enabled.store(true, Ordering::Release);
        info!("enforcer enabled");

        for actor in self.services.actors.online_actors() {
            self.start_tracking(actor);
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Register handlers on every chain at `Highest`, so the enforcer has the
    /// final say over lower-priority plugins.
    pub fn register(self: &Arc<Self>, bus: &mut EventBus) {
        let this = Arc::clone(self);
        bus.joins.register(
            HANDLER_ID,
            EventPriority::Highest,
            false,
            Box::new(move |event: &mut ActorJoined| this.on_join(event.actor)),
        );
        let this = Arc::clone(self);
        bus.quits.register(
            HANDLER_ID,
            EventPriority::Highest,
            false,
            Box::new(move |event: &mut ActorLeft| this.on_quit(event.actor)),
        );
        let this = Arc::clone(self);
        bus.block_breaks.register(
            HANDLER_ID,
            EventPriority::Highest,
            false,
            Box::new(move |event: &mut BlockBreak| {
                this.on_block_break(event);
            }),
        );
        let this = Arc::clone(self);
        bus.experience.register(
            HANDLER_ID,
            EventPriority::Highest,
            false,
            Box::new(move |event: &mut ExperienceChange| {
                this.on_experience_change(event);
            }),
        );
        let this = Arc::clone(self);
        bus.skill_xp.register(
            HANDLER_ID,
            EventPriority::Highest,
            false,
            Box::new(move |event: &mut SkillXpGain| {
                this.on_skill_xp_gain(event);
            }),
        );
    }

    pub fn on_join(&self, actor: ActorId) {
        if !self.is_enabled() {
            return;
        }
        let name = self.services.actors.display_name(actor);
        info!(actor = %name, "actor joined, checking skill data readiness");
        self.start_tracking(actor);
    }

    pub fn on_quit(&self, actor: ActorId) {
        if !self.is_enabled() {
            return;
        }
        self.readiness.stop_tracking(actor);
        self.suppression.forget(actor);
    }

    /// Evaluate the break and apply the side effects to `event`. `None` when disabled.
    pub fn on_block_break(&self, event: &mut BlockBreak) -> Option<Verdict> {
        if !self.is_enabled() {
            return None;
        }
        let config = self.config.snapshot();
        let verdict = self.engine.evaluate(&event.attempt, &config);
        self.apply(event, &verdict, &config);
        Some(verdict)
    }

    fn apply(&self, event: &mut BlockBreak, verdict: &Verdict, config: &KudosConfig) {
        let effects = &verdict.effects;
        let actor = event.attempt.actor;
        if effects.cancel {
            event.cancelled = true;
        }
        if effects.suppress_output {
            event.drop_items = false;
        }
        if effects.zero_reward {
            event.exp_to_drop = 0;
        }
        if let Some(message) = &effects.message {
            self.services.messenger.send(actor, message);
        }
        if effects.record_suppression {
            self.suppression.record_denial(actor, self.services.clock.now_ms());
        }
        if effects.schedule_cleanup {
            let kinds = RuleSet::from_config(config).residue_kinds();
            self.cleanup.schedule_cleanup(
                &self.scheduler,
                event.attempt.location.clone(),
                kinds,
                config.cleanup.radius,
                config.cleanup.delay_ticks,
            );
        }
    }

    pub fn on_experience_change(&self, event: &mut ExperienceChange) -> RewardOutcome {
        if !self.is_enabled() {
            return RewardOutcome::Passed;
        }
        self.rewards.on_experience_change(event, &self.config.snapshot())
    }

    pub fn on_skill_xp_gain(&self, event: &mut SkillXpGain) -> RewardOutcome {
        if !self.is_enabled() {
            return RewardOutcome::Passed;
        }
        self.rewards.on_skill_xp_gain(event, &self.config.snapshot())
    }

    /// Advance the scheduler by one host tick.
    pub fn tick(&self) -> usize {
        self.scheduler.run_tick()
    }

    /// Re-read configuration. The previous snapshot stays active on failure.
    pub fn reload(&self) -> KudosResult<Arc<KudosConfig>> {
        self.config.reload()
    }

    /// Stop all outstanding work and drop every per-actor entry.
    pub fn shutdown(&self) {
        self.enabled.store(false, Ordering::Release);
        self.scheduler.cancel_all();
        self.readiness.clear();
        self.suppression.clear();
        info!("enforcer disabled");
    }

    pub fn is_ready(&self, actor: ActorId) -> bool {
        self.readiness.is_ready(actor)
    }

    pub fn has_bypass(&self, actor: ActorId) -> bool {
        let name = self.services.actors.display_name(actor);
        self.engine.has_bypass(actor, self.config.snapshot().verbose_logging, &name)
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn services(&self) -> &HostServices {
        &self.services
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn readiness(&self) -> &Arc<ReadinessTracker> {
        &self.readiness
    }

    pub fn suppression(&self) -> &Arc<SuppressionWindow> {
        &self.suppression
    }

    fn start_tracking(&self, actor: ActorId) {
        let policy = self.config.snapshot().readiness.clone();
        self.readiness.begin_tracking(
            actor,
            &self.scheduler,
            Arc::clone(&self.services.skills),
            Arc::clone(&self.services.actors),
            policy,
        );
    }
}
