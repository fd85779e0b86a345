//! Recurring tick driver.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::alerts::NotificationSink;
use crate::session::Session;
use crate::simulation::MotionRandom;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(60);

/// Tick `session` every `period` until `shutdown` resolves or `max_ticks`
/// have run. Returns the number of ticks performed.
///
/// The rules are evaluated once up front, so alerts that already hold fire
/// without waiting a full period.
pub async fn run_session<S, R>(
    session: &mut Session<S>,
    random: &mut R,
    period: Duration,
    max_ticks: Option<u64>,
    shutdown: impl Future<Output = ()>,
) -> u64
where
    S: NotificationSink,
    R: MotionRandom,
{
    session.evaluate();

    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    let mut ticks = 0;
    while max_ticks.is_none_or(|max| ticks < max) {
        tokio::select! {
            _ = &mut shutdown => {
                info!(ticks, "shutting down");
                break;
            }
            _ = interval.tick() => {
                let summary = session.tick(&mut *random);
                ticks += 1;
                debug!(tick = ticks, arrivals = summary.arrivals, alerts = summary.alerts, "tick done");
            }
        }
    }

    ticks
}
