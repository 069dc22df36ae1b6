//! Neutralizes reward signals that land inside a suppression window.
//!
//! Two channels, handled differently:
//! - primary (experience change): the gain is already applied when the event
//!   fires, so besides zeroing the reported amount the interceptor claws the
//!   applied amount back by resetting the total and re-granting the rest.
//! - secondary (skill progression): fully cancellable before effect; zero the
//!   amount and cancel the event. Only the tracked skill is affected.

use crate::config::KudosConfig;
use crate::events::{ExperienceChange, SkillXpGain};
use crate::host::{ActorDirectory, Clock, ExperienceLedger};
use crate::suppression::SuppressionWindow;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardOutcome {
    /// Event left untouched.
    Passed,
    /// Gain zeroed. `clawed_back` is what was removed from the applied total.
    Suppressed { amount: f64, clawed_back: i64 },
}

impl RewardOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, RewardOutcome::Suppressed { .. })
    }
}

pub struct RewardInterceptor {
    suppression: Arc<SuppressionWindow>,
    experience: Arc<dyn ExperienceLedger>,
    clock: Arc<dyn Clock>,
    actors: Arc<dyn ActorDirectory>,
}

impl RewardInterceptor {
    pub fn new(
        suppression: Arc<SuppressionWindow>,
        experience: Arc<dyn ExperienceLedger>,
        clock: Arc<dyn Clock>,
        actors: Arc<dyn ActorDirectory>,
    ) -> Self {
        Self {
            suppression,
            experience,
            clock,
            actors,
        }
    }

    pub fn on_experience_change(
        &self,
        event: &mut ExperienceChange,
        config: &KudosConfig,
    ) -> RewardOutcome {
        if event.amount <= 0 {
            return RewardOutcome::Passed;
        }
        let actor = event.actor;
        let name = self.actors.display_name(actor);
        self.observed(config, &name, "experience", f64::from(event.amount));

        let now = self.clock.now_ms();
        if !self.suppression.is_within_window(actor, now) {
            return RewardOutcome::Passed;
        }

        let intercepted = i64::from(event.amount);
        event.amount = 0;
        info!(actor = %name, amount = intercepted, "blocking experience - recent restricted break");

        // The ledger already includes the intercepted gain.
        let total = self.experience.total(actor);
        let mut clawed_back = 0;
        if total > 0 {
            let baseline = (total - intercepted).max(0);
            self.experience.reset(actor);
            if baseline > 0 {
                self.experience.grant(actor, baseline);
            }
            clawed_back = total - baseline;
            info!(
                actor = %name,
                clawed_back,
                baseline,
                "deducted experience to counter external gain"
            );
        }

        RewardOutcome::Suppressed {
            amount: intercepted as f64,
            clawed_back,
        }
    }

    pub fn on_skill_xp_gain(&self, event: &mut SkillXpGain, config: &KudosConfig) -> RewardOutcome {
        if !event.skill.eq_ignore_ascii_case(&config.suppression.tracked_skill) || event.raw_xp <= 0.0 {
            return RewardOutcome::Passed;
        }
        let actor = event.actor;
        let name = self.actors.display_name(actor);
        self.observed(config, &name, &event.skill, f64::from(event.raw_xp));

        let now = self.clock.now_ms();
        if !self.suppression.is_within_window(actor, now) {
            return RewardOutcome::Passed;
        }

        let amount = f64::from(event.raw_xp);
        event.raw_xp = 0.0;
        event.cancelled = true;
        info!(actor = %name, skill = %event.skill, amount, "blocking skill xp - recent restricted break");
        RewardOutcome::Suppressed {
            amount,
            clawed_back: 0,
        }
    }

    fn observed(&self, config: &KudosConfig, name: &str, channel: &str, amount: f64) {
        if config.verbose_logging {
            info!(actor = %name, channel, amount, "reward gain observed");
        } else {
            debug!(actor = %name, channel, amount, "reward gain observed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct Ledger(DashMap<ActorId, i64>);

    impl ExperienceLedger for Ledger {
        fn total(&self, actor: ActorId) -> i64 {
            self.0.get(&actor).map(|v| *v).unwrap_or(0)
        }

        fn reset(&self, actor: ActorId) {
            self.0.insert(actor, 0);
        }

        fn grant(&self, actor: ActorId, amount: i64) {
            *self.0.entry(actor).or_insert(0) += amount;
        }
    }

    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct Nobody;

    impl ActorDirectory for Nobody {
        fn is_online(&self, _actor: ActorId) -> bool {
            true
        }

        fn online_actors(&self) -> Vec<ActorId> {
            Vec::new()
        }
    }

    struct Fixture {
        interceptor: RewardInterceptor,
        suppression: Arc<SuppressionWindow>,
        ledger: Arc<Ledger>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let suppression = Arc::new(SuppressionWindow::default());
        let ledger = Arc::new(Ledger::default());
        let clock = Arc::new(ManualClock(AtomicI64::new(100_000)));
        let interceptor = RewardInterceptor::new(
            Arc::clone(&suppression),
            ledger.clone(),
            clock.clone(),
            Arc::new(Nobody),
        );
        Fixture {
            interceptor,
            suppression,
            ledger,
            clock,
        }
    }

    #[test]
    fn primary_gain_outside_window_passes() {
        let f = fixture();
        let actor = ActorId::new();
        let mut event = ExperienceChange { actor, amount: 7 };
        let outcome = f.interceptor.on_experience_change(&mut event, &KudosConfig::default());
        assert_eq!(outcome, RewardOutcome::Passed);
        assert_eq!(event.amount, 7);
    }

    #[test]
    fn primary_gain_inside_window_is_zeroed_and_clawed_back() {
        let f = fixture();
        let actor = ActorId::new();
        // 40 before the event, 7 applied by the host before dispatch
        f.ledger.grant(actor, 47);
        f.suppression.record_denial(actor, 99_000);

        let mut event = ExperienceChange { actor, amount: 7 };
        let outcome = f.interceptor.on_experience_change(&mut event, &KudosConfig::default());
        assert_eq!(event.amount, 0);
        assert_eq!(
            outcome,
            RewardOutcome::Suppressed {
                amount: 7.0,
                clawed_back: 7
            }
        );
        assert_eq!(f.ledger.total(actor), 40);
    }

    #[test]
    fn clawback_never_drives_total_negative() {
        let f = fixture();
        let actor = ActorId::new();
        f.ledger.grant(actor, 3);
        f.suppression.record_denial(actor, 100_000);
        let mut event = ExperienceChange { actor, amount: 10 };
        f.interceptor.on_experience_change(&mut event, &KudosConfig::default());
        assert_eq!(f.ledger.total(actor), 0);
    }

    #[test]
    fn non_positive_primary_changes_are_ignored() {
        let f = fixture();
        let actor = ActorId::new();
        f.suppression.record_denial(actor, 100_000);
        let mut event = ExperienceChange { actor, amount: -5 };
        let outcome = f.interceptor.on_experience_change(&mut event, &KudosConfig::default());
        assert_eq!(outcome, RewardOutcome::Passed);
        assert_eq!(event.amount, -5);
    }

    #[test]
    fn secondary_gain_inside_window_is_cancelled() {
        let f = fixture();
        let actor = ActorId::new();
        f.suppression.record_denial(actor, 95_000);
        let mut event = SkillXpGain::new(actor, "Mining", 12.5);
        let outcome = f.interceptor.on_skill_xp_gain(&mut event, &KudosConfig::default());
        assert!(outcome.is_suppressed());
        assert!(event.cancelled);
        assert_eq!(event.raw_xp, 0.0);
    }

    #[test]
    fn secondary_gain_for_other_skill_is_untouched() {
        let f = fixture();
        let actor = ActorId::new();
        f.suppression.record_denial(actor, 100_000);
        let mut event = SkillXpGain::new(actor, "woodcutting", 12.5);
        let outcome = f.interceptor.on_skill_xp_gain(&mut event, &KudosConfig::default());
        assert_eq!(outcome, RewardOutcome::Passed);
        assert!(!event.cancelled);
        assert_eq!(event.raw_xp, 12.5);
    }

    #[test]
    fn window_expires_by_time() {
        let f = fixture();
        let actor = ActorId::new();
        f.suppression.record_denial(actor, 100_000);
        f.clock.0.store(106_000, Ordering::SeqCst);
        let mut event = SkillXpGain::new(actor, "mining", 4.0);
        assert_eq!(
            f.interceptor.on_skill_xp_gain(&mut event, &KudosConfig::default()),
            RewardOutcome::Passed
        );
        assert_eq!(event.raw_xp, 4.0);
    }
}
