//! Ordered handler chains for host events.
//!
//! Handlers run in ascending [`EventPriority`] (Lowest first, Monitor last),
//! FIFO among equal priorities, so a `Highest` handler sees every change made
//! by lower ones and has the final say before Monitor observers.

use crate::events::{ActorJoined, ActorLeft, BlockBreak, ExperienceChange, HostEvent, SkillXpGain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
    /// Observe only; should not modify the event.
    Monitor,
}

pub type Handler<E> = Box<dyn Fn(&mut E) + Send + Sync>;

struct RegisteredHandler<E> {
    id: String,
    priority: EventPriority,
    ignore_cancelled: bool,
    handler: Handler<E>,
}

/// Handlers for one event type.
pub struct HandlerChain<E> {
    handlers: Vec<RegisteredHandler<E>>,
}

impl<E> Default for HandlerChain<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E: HostEvent> HandlerChain<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `handler` after every handler of lower or equal priority.
    ///
    /// With `ignore_cancelled` the handler is skipped once an earlier handler
    /// cancelled the event.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        priority: EventPriority,
        ignore_cancelled: bool,
        handler: Handler<E>,
    ) {
        let pos = self
            .handlers
            .iter()
            .position(|h| h.priority > priority)
            .unwrap_or(self.handlers.len());
        self.handlers.insert(
            pos,
            RegisteredHandler {
                id: id.into(),
                priority,
                ignore_cancelled,
                handler,
            },
        );
    }

    /// Returns `true` if a handler with this id was removed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.id != id);
        self.handlers.len() < before
    }

    /// Run the chain. Returns how many handlers were invoked.
    pub fn dispatch(&self, event: &mut E) -> usize {
        let mut invoked = 0;
        for h in &self.handlers {
            if h.ignore_cancelled && event.is_cancelled() {
                continue;
            }
            (h.handler)(event);
            invoked += 1;
        }
        invoked
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// One chain per host notification.
#[derive(Default)]
pub struct EventBus {
    pub joins: HandlerChain<ActorJoined>,
    pub quits: HandlerChain<ActorLeft>,
    pub block_breaks: HandlerChain<BlockBreak>,
    pub experience: HandlerChain<ExperienceChange>,
    pub skill_xp: HandlerChain<SkillXpGain>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor_joined(&self, event: &mut ActorJoined) -> usize {
        self.joins.dispatch(event)
    }

    pub fn actor_left(&self, event: &mut ActorLeft) -> usize {
        self.quits.dispatch(event)
    }

    pub fn block_break(&self, event: &mut BlockBreak) -> usize {
        self.block_breaks.dispatch(event)
    }

    pub fn experience_change(&self, event: &mut ExperienceChange) -> usize {
        self.experience.dispatch(event)
    }

    pub fn skill_xp_gain(&self, event: &mut SkillXpGain) -> usize {
        self.skill_xp.dispatch(event)
    }

    /// Remove every handler registered under `id` from all chains.
    pub fn unregister_all(&mut self, id: &str) -> usize {
        [
            self.joins.unregister(id),
            self.quits.unregister(id),
            self.block_breaks.unregister(id),
            self.experience.unregister(id),
            self.skill_xp.unregister(id),
        ]
        .into_iter()
        .filter(|removed| *removed)
        .count()
    }
}
