//! Connectivity probing and the reconnect-driven sync loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::processor::{PassOutcome, SyncProcessor, SyncTrigger};
use crate::remote::{HttpRemoteApi, RemoteApi};

/// Answers whether the remote API is currently reachable.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> impl Future<Output = bool> + Send;
}

impl ConnectivityProbe for HttpRemoteApi {
    async fn is_online(&self) -> bool {
        self.is_reachable().await
    }
}

impl<P: ConnectivityProbe> ConnectivityProbe for Arc<P> {
    async fn is_online(&self) -> bool {
        self.as_ref().is_online().await
    }
}

/// Polls a probe and runs a sync pass at startup and on every reconnect.
pub struct ConnectivityMonitor<R, P> {
    processor: Arc<SyncProcessor<R>>,
    probe: P,
    interval: Duration,
}

impl<R: RemoteApi, P: ConnectivityProbe> ConnectivityMonitor<R, P> {
    pub const fn new(processor: Arc<SyncProcessor<R>>, probe: P, interval: Duration) -> Self {
        Self {
            processor,
            probe,
            interval,
        }
    }

    /// Poll until `shutdown` resolves, returning the number of passes that ran.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> usize {
        tokio::pin!(shutdown);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut was_online = None;
        let mut passes = 0;

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!(passes, "Connectivity monitor stopped");
                    return passes;
                }
                _ = ticker.tick() => {
                    let online = self.probe.is_online().await;
                    if was_online != Some(online) {
                        tracing::info!(online, "Connectivity changed");
                    }
                    if let Some(trigger) = transition_trigger(was_online, online) {
                        if self.run_pass(trigger).await {
                            passes += 1;
                        }
                    }
                    was_online = Some(online);
                }
            }
        }
    }

    async fn run_pass(&self, trigger: SyncTrigger) -> bool {
        match self.processor.process_queue(trigger).await {
            Ok(PassOutcome::Completed(_)) => true,
            Ok(PassOutcome::AlreadyRunning) => false,
            Err(error) => {
                tracing::error!(%trigger, "Sync pass failed: {error}");
                false
            }
        }
    }
}

/// Pass to run for an observed connectivity state, if any.
const fn transition_trigger(previous: Option<bool>, online: bool) -> Option<SyncTrigger> {
    match (previous, online) {
        (None, true) => Some(SyncTrigger::Startup),
        (Some(false), true) => Some(SyncTrigger::Reconnected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewQueueItem, SyncAction};
    use crate::services::SyncQueueService;
    use crate::sync::testing::{sample_report, FakeRemote, ScriptedProbe};

    #[test]
    fn transition_trigger_fires_on_startup_and_reconnect_only() {
        assert_eq!(transition_trigger(None, true), Some(SyncTrigger::Startup));
        assert_eq!(transition_trigger(None, false), None);
        assert_eq!(
            transition_trigger(Some(false), true),
            Some(SyncTrigger::Reconnected)
        );
        assert_eq!(transition_trigger(Some(true), true), None);
        assert_eq!(transition_trigger(Some(true), false), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn monitor_runs_pass_on_startup_and_each_reconnect() {
        let queue = SyncQueueService::open_in_memory().unwrap();
        let processor = Arc::new(SyncProcessor::new(queue, FakeRemote::new()));
        let item = NewQueueItem::from_entity(&sample_report(1), SyncAction::Create).unwrap();
        processor.queue().enqueue(&item).await.unwrap();

        // online, steady, drop, steady, back
        let probe = Arc::new(ScriptedProbe::new(&[true, true, false, false, true]));
        let monitor = ConnectivityMonitor::new(
            Arc::clone(&processor),
            Arc::clone(&probe),
            Duration::from_millis(5),
        );

        let passes = monitor.run_until(probe.exhausted.notified()).await;

        assert_eq!(passes, 2);
        assert_eq!(processor.remote().calls().len(), 1);
        assert_eq!(processor.queue().count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn monitor_stays_idle_while_offline() {
        let queue = SyncQueueService::open_in_memory().unwrap();
        let processor = Arc::new(SyncProcessor::new(queue, FakeRemote::new()));
        let item = NewQueueItem::from_entity(&sample_report(1), SyncAction::Create).unwrap();
        processor.queue().enqueue(&item).await.unwrap();

        let probe = Arc::new(ScriptedProbe::new(&[false, false]));
        let monitor = ConnectivityMonitor::new(
            Arc::clone(&processor),
            Arc::clone(&probe),
            Duration::from_millis(5),
        );

        let passes = monitor.run_until(probe.exhausted.notified()).await;

        assert_eq!(passes, 0);
        assert!(processor.remote().calls().is_empty());
        assert_eq!(processor.queue().count().await.unwrap(), 1);
    }
}
