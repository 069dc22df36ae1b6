//! Async driver that stands in for the host's tick loop.
//!
//! Ticks the enforcer's scheduler on a fixed period until `shutdown`
//! resolves, then shuts the enforcer down so no per-actor work outlives it.

use crate::enforcer::Enforcer;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// One host tick (20 ticks per second).
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Returns the number of ticks driven.
pub async fn drive<F>(enforcer: Arc<Enforcer>, tick_period: Duration, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(tick_period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(tick_period_ms = tick_period.as_millis() as u64, "tick driver started");
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let ran = enforcer.tick();
                ticks += 1;
                if ran > 0 {
                    debug!(tick = ticks, tasks = ran, "scheduler tick");
                }
            }
            _ = &mut shutdown => {
                info!(ticks, "shutdown requested; stopping tick driver");
                break;
            }
        }
    }
    enforcer.shutdown();
    ticks
}
