//! Tick-driven task scheduler.
//!
//! Mirrors the host's cooperative model: nothing runs on its own thread. The
//! driver calls [`Scheduler::run_tick`] once per host tick and every due task
//! runs on that call, in due order. Tasks run outside the queue lock, so a task
//! may schedule or cancel other tasks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Returned by repeating tasks to keep going or stop themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

pub type Task = Box<dyn FnMut() -> TaskStatus + Send>;

/// Cancellation handle for a scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    finished: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Prevents any further run. Safe to call on a finished task.
    pub fn cancel(&self) {
        self.finished.store(true, Ordering::Release);
    }

    /// False once the task was cancelled or ran to completion.
    pub fn is_active(&self) -> bool {
        !self.finished.load(Ordering::Acquire)
    }
}

struct Scheduled {
    id: u64,
    due: u64,
    period: Option<u64>,
    finished: Arc<AtomicBool>,
    task: Task,
}

#[derive(Default)]
pub struct Scheduler {
    tick: AtomicU64,
    next_id: AtomicU64,
    /// Bumped by `cancel_all`; tasks drained under an older generation are dropped.
    generation: AtomicU64,
    queue: Mutex<Vec<Scheduled>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Acquire)
    }

    /// Schedule `task` to first run `delay` ticks from now (at least one), then
    /// every `period` ticks if given.
    pub fn schedule(&self, delay: u64, period: Option<u64>, task: Task) -> TaskHandle {
        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        let finished = Arc::new(AtomicBool::new(false));
        let entry = Scheduled {
            id,
            due: self.current_tick() + delay.max(1),
            period: period.map(|p| p.max(1)),
            finished: Arc::clone(&finished),
            task,
        };
        self.lock_queue().push(entry);
        TaskHandle { id, finished }
    }

    /// Run `f` once, `delay` ticks from now.
    pub fn run_later<F>(&self, delay: u64, f: F) -> TaskHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let mut f = Some(f);
        self.schedule(
            delay,
            None,
            Box::new(move || {
                if let Some(f) = f.take() {
                    f();
                }
                TaskStatus::Done
            }),
        )
    }

    /// Run `f` every `period` ticks, starting `delay` ticks from now, until it returns `Done`.
    pub fn run_timer<F>(&self, delay: u64, period: u64, f: F) -> TaskHandle
    where
        F: FnMut() -> TaskStatus + Send + 'static,
    {
        self.schedule(delay, Some(period), Box::new(f))
    }

    /// Advance one tick and run every task that became due. Returns how many ran.
    pub fn run_tick(&self) -> usize {
        let now = self.tick.fetch_add(1, Ordering::AcqRel) + 1;

        let (mut due, generation): (Vec<Scheduled>, u64) = {
            let mut queue = self.lock_queue();
            queue.retain(|s| !s.finished.load(Ordering::Acquire));
            let (ready, waiting): (Vec<_>, Vec<_>) = queue.drain(..).partition(|s| s.due <= now);
            *queue = waiting;
            (ready, self.generation.load(Ordering::Acquire))
        };
        due.sort_by_key(|s| (s.due, s.id));

        let mut ran = 0;
        let mut requeue = Vec::new();
        for mut scheduled in due {
            // an earlier task in this tick may have cancelled this one, or everything
            if scheduled.finished.load(Ordering::Acquire) || self.is_stale(generation) {
                scheduled.finished.store(true, Ordering::Release);
                continue;
            }
            let status = (scheduled.task)();
            ran += 1;
            match (status, scheduled.period) {
                (TaskStatus::Continue, Some(period))
                    if !scheduled.finished.load(Ordering::Acquire) =>
                {
                    scheduled.due = now + period;
                    requeue.push(scheduled);
                }
                _ => scheduled.finished.store(true, Ordering::Release),
            }
        }

        if !requeue.is_empty() {
            let mut queue = self.lock_queue();
            if self.is_stale(generation) {
                for scheduled in &requeue {
                    scheduled.finished.store(true, Ordering::Release);
                }
            } else {
                queue.extend(requeue);
            }
        }
        ran
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) != generation
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.lock_queue()
            .iter()
            .filter(|s| !s.finished.load(Ordering::Acquire))
            .count()
    }

    /// Cancel and drop every queued task, including any the current tick is running.
    pub fn cancel_all(&self) {
        let mut queue = self.lock_queue();
        self.generation.fetch_add(1, Ordering::AcqRel);
        for scheduled in queue.iter() {
            scheduled.finished.store(true, Ordering::Release);
        }
        queue.clear();
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, Vec<Scheduled>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}
