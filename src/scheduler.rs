// Fixed-interval job driver. Each job gets its own loop with clean
// cancellation; a tick runs to completion before the next fires, and the
// jobs carry their own re-entrancy guards on top (see sync::RunGuard).

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run_job<F, Fut>(
    name: &'static str,
    period: Duration,
    start_delay: Duration,
    shutdown: CancellationToken,
    mut tick: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    if !start_delay.is_zero() {
        tokio::select! {
            _ = sleep(start_delay) => {}
            _ = shutdown.cancelled() => {
                info!("Shutting down {} before first tick", name);
                return;
            }
        }
    }

    info!("Starting {} loop (every {:?})", name, period);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tick().await;
            }
            _ = shutdown.cancelled() => {
                info!("Shutting down {} loop", name);
                break;
            }
        }
    }
}
