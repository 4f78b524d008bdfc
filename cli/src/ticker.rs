use crate::state::SimState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Real-time length of one server tick
pub fn tick_period(ticks_per_second: u32) -> Duration {
    Duration::from_secs(1) / ticks_per_second.max(1)
}

/// Drive the simulated server in the background.
///
/// Each tick holds the write lock for its whole duration, so ticks never
/// overlap each other or a REPL command. Late ticks are skipped rather than
/// replayed in a burst.
pub fn spawn_ticker(state: Arc<RwLock<SimState>>, ticks_per_second: u32) -> JoinHandle<()> {
    let period = tick_period(ticks_per_second);
    tracing::info!(?period, "Starting background ticker");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let mut s = state.write().await;
            if let Some(report) = s.tick_once() {
                tracing::trace!(pass = report.pass, ops = report.ops.len(), "Reconciled effects");
            }
        }
    })
}
