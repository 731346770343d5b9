//! Shared polling stream for the live dashboard
//!
//! One background task fetches the current dashboard immediately and then once per interval.
//! A tick that fires while a fetch is still in flight drops that fetch and starts a new one.
//! Every consumer subscribes to the same task; a new subscriber first receives the most recent
//! successful snapshot. The task stops once the last handle and subscription are gone.

use crate::consts::cli_consts::polling::UPDATE_BUFFER;
use crate::models::RawBillingDashboard;
use crate::monitor::BillingMonitor;
use crate::monitor::error::MonitorError;
use log::{debug, trace};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Outcome of one polling fetch.
#[derive(Debug, Clone)]
pub enum PollUpdate {
    Snapshot(Arc<RawBillingDashboard>),
    Failed(Arc<MonitorError>),
}

#[derive(Debug)]
struct Shared {
    /// Last successful snapshot; the lock also orders publishing against subscribing.
    latest: Mutex<Option<Arc<RawBillingDashboard>>>,
    updates: broadcast::Sender<PollUpdate>,
    cancel: CancellationToken,
}

impl Shared {
    fn publish(&self, update: PollUpdate) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if let PollUpdate::Snapshot(snapshot) = &update {
            *latest = Some(Arc::clone(snapshot));
        }
        // No receivers is fine: the snapshot is still kept for replay.
        let _ = self.updates.send(update);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Handle to a running polling task.
#[derive(Debug, Clone)]
pub struct DashboardPoller {
    shared: Arc<Shared>,
}

impl DashboardPoller {
    /// Start polling `monitor` every `interval`, beginning immediately.
    pub fn spawn(monitor: Arc<dyn BillingMonitor>, interval: Duration) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        let shared = Arc::new(Shared {
            latest: Mutex::new(None),
            updates,
            cancel: CancellationToken::new(),
        });

        tokio::spawn(run_polling(
            monitor,
            interval,
            Arc::downgrade(&shared),
            shared.cancel.clone(),
        ));

        Self { shared }
    }

    /// Subscribe to the stream, replaying the latest successful snapshot if there is one.
    pub fn subscribe(&self) -> PollSubscription {
        let latest = self
            .shared
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let receiver = self.shared.updates.subscribe();
        PollSubscription {
            replay: latest.clone(),
            receiver,
            poller: self.clone(),
        }
    }

    /// Most recent successful snapshot.
    #[cfg(test)]
    pub fn latest(&self) -> Option<Arc<RawBillingDashboard>> {
        self.shared
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop polling for every consumer, even if handles are still alive.
    pub fn stop(&self) {
        self.shared.cancel.cancel();
    }

    #[cfg(test)]
    pub fn is_stopped(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }
}

/// A consumer of a [`DashboardPoller`]. Keeps the poller alive while it exists.
#[derive(Debug)]
pub struct PollSubscription {
    replay: Option<Arc<RawBillingDashboard>>,
    receiver: broadcast::Receiver<PollUpdate>,
    poller: DashboardPoller,
}

impl PollSubscription {
    /// Wait for the next update. Returns `None` once the poller has been stopped.
    pub async fn next(&mut self) -> Option<PollUpdate> {
        if let Some(snapshot) = self.replay.take() {
            return Some(PollUpdate::Snapshot(snapshot));
        }
        let cancel = self.poller.shared.cancel.clone();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                received = self.receiver.recv() => match received {
                    Ok(update) => return Some(update),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Polling subscriber lagged, skipped {} updates", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }
}

async fn run_polling(
    monitor: Arc<dyn BillingMonitor>,
    interval: Duration,
    shared: Weak<Shared>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        trace!("Polling tick, fetching current dashboard");
        let mut fetch = monitor.get_dashboard();
        let result = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = &mut fetch => break result,
                _ = ticker.tick() => {
                    debug!("Dashboard fetch superseded by a newer tick");
                    fetch = monitor.get_dashboard();
                }
            }
        };

        let Some(target) = shared.upgrade() else {
            break;
        };
        match result {
            Ok(snapshot) => target.publish(PollUpdate::Snapshot(Arc::new(snapshot))),
            Err(e) => {
                debug!("Dashboard polling error: {}", e);
                target.publish(PollUpdate::Failed(Arc::new(e)));
            }
        }
    }
    debug!("Dashboard polling stopped");
}
