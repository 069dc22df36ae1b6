//! Readiness tracking: has the skill provider loaded this actor yet?
//!
//! On join an actor starts NotReady and a repeating poll asks the provider for
//! the reference skill. The first successful answer flips the actor to Ready
//! for the rest of the session. Polling stops on success, when the actor goes
//! offline, or when the attempt cap is reached; the last two leave the actor
//! NotReady until the next join.

use crate::actor::ActorId;
use crate::config::ReadinessConfig;
use crate::host::{ActorDirectory, SkillProvider};
use crate::scheduler::{Scheduler, TaskHandle, TaskStatus};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    NotReady,
    Ready,
}

/// Why polling for an actor ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Ready { level: u32 },
    Disconnected,
    Timeout { attempts: u32 },
}

#[derive(Debug)]
struct Entry {
    session: u64,
    state: ReadinessState,
    attempts: u32,
    handle: Option<TaskHandle>,
    stopped: Option<StopReason>,
}

#[derive(Debug, Default)]
pub struct ReadinessTracker {
    entries: DashMap<ActorId, Entry>,
    sessions: AtomicU64,
}

impl ReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset `actor` to NotReady and start polling. Any poll left over from an
    /// earlier session is cancelled first.
    pub fn begin_tracking(
        self: &Arc<Self>,
        actor: ActorId,
        scheduler: &Scheduler,
        skills: Arc<dyn SkillProvider>,
        actors: Arc<dyn ActorDirectory>,
        policy: ReadinessConfig,
    ) {
        let session = self.sessions.fetch_add(1, Ordering::AcqRel);
        if let Some(old) = self.entries.insert(
            actor,
            Entry {
                session,
                state: ReadinessState::NotReady,
                attempts: 0,
                handle: None,
                stopped: None,
            },
        ) {
            if let Some(handle) = old.handle {
                handle.cancel();
            }
        }

        let tracker = Arc::clone(self);
        let interval = policy.poll_interval_ticks;
        let handle = scheduler.run_timer(0, interval, move || {
            tracker.poll(actor, session, skills.as_ref(), actors.as_ref(), &policy)
        });

        match self.entries.get_mut(&actor) {
            Some(mut entry) if entry.session == session => entry.handle = Some(handle),
            _ => handle.cancel(),
        }
    }

    /// One poll attempt. Returns `Done` once polling for this session is over.
    pub fn poll(
        &self,
        actor: ActorId,
        session: u64,
        skills: &dyn SkillProvider,
        actors: &dyn ActorDirectory,
        policy: &ReadinessConfig,
    ) -> TaskStatus {
        // never hold the map entry across calls into the host
        match self.entries.get(&actor) {
            Some(entry) if entry.session == session && entry.stopped.is_none() => {}
            _ => return TaskStatus::Done,
        }

        let name = actors.display_name(actor);
        if !actors.is_online(actor) {
            warn!(actor = %name, "stopped checking readiness - disconnected");
            self.finish(actor, session, StopReason::Disconnected);
            return TaskStatus::Done;
        }

        match skills.level(actor, &policy.reference_skill) {
            Ok(level) => {
                info!(actor = %name, level, "skill data ready");
                self.finish(actor, session, StopReason::Ready { level });
                TaskStatus::Done
            }
            Err(e) => {
                let attempts = {
                    let Some(mut entry) = self.entries.get_mut(&actor) else {
                        return TaskStatus::Done;
                    };
                    if entry.session != session {
                        return TaskStatus::Done;
                    }
                    entry.attempts += 1;
                    entry.attempts
                };
                debug!(actor = %name, attempts, error = %e, "skill data not ready");
                if policy.warn_every > 0 && attempts % policy.warn_every == 0 {
                    warn!(actor = %name, attempts, "skill data not ready");
                }

                let online = actors.is_online(actor);
                if !online || attempts >= policy.max_attempts {
                    let reason = if online {
                        StopReason::Timeout { attempts }
                    } else {
                        StopReason::Disconnected
                    };
                    warn!(
                        actor = %name,
                        reason = if online { "timeout" } else { "disconnected" },
                        "stopped checking readiness"
                    );
                    self.finish(actor, session, reason);
                    return TaskStatus::Done;
                }
                TaskStatus::Continue
            }
        }
    }

    fn finish(&self, actor: ActorId, session: u64, reason: StopReason) {
        if let Some(mut entry) = self.entries.get_mut(&actor) {
            if entry.session != session {
                return;
            }
            if matches!(reason, StopReason::Ready { .. }) {
                entry.state = ReadinessState::Ready;
            }
            entry.stopped = Some(reason);
        }
    }

    /// Non-blocking lookup. Unknown actors are not ready.
    pub fn is_ready(&self, actor: ActorId) -> bool {
        self.state(actor) == Some(ReadinessState::Ready)
    }

    pub fn state(&self, actor: ActorId) -> Option<ReadinessState> {
        self.entries.get(&actor).map(|entry| entry.state)
    }

    pub fn attempts(&self, actor: ActorId) -> u32 {
        self.entries.get(&actor).map(|entry| entry.attempts).unwrap_or(0)
    }

    pub fn stop_reason(&self, actor: ActorId) -> Option<StopReason> {
        self.entries.get(&actor).and_then(|entry| entry.stopped.clone())
    }

    /// True while a poll task for `actor` is still scheduled.
    pub fn is_polling(&self, actor: ActorId) -> bool {
        self.entries
            .get(&actor)
            .and_then(|entry| entry.handle.as_ref().map(TaskHandle::is_active))
            .unwrap_or(false)
    }

    /// Cancel polling and drop the entry (departure).
    pub fn stop_tracking(&self, actor: ActorId) {
        if let Some((_, entry)) = self.entries.remove(&actor) {
            if let Some(handle) = entry.handle {
                handle.cancel();
            }
        }
    }

    /// Cancel every poll and drop all entries (shutdown).
    pub fn clear(&self) {
        for entry in self.entries.iter() {
            if let Some(handle) = entry.handle.as_ref() {
                handle.cancel();
            }
        }
        self.entries.clear();
    }

    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}
