//! Entry point tying mutation recording, delivery, and connectivity together.

use std::sync::Arc;
use std::time::Duration;

use super::connectivity::{ConnectivityMonitor, ConnectivityProbe};
use super::processor::{ItemSettlement, PassOutcome, SyncProcessor, SyncTrigger};
use super::recorder::ChangeRecorder;
use crate::models::{EntityType, SyncAction, SyncEntity, SyncQueueItem};
use crate::remote::RemoteApi;
use crate::services::SyncQueueService;
use crate::Result;

/// What happened to a freshly recorded mutation before the call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateDelivery {
    /// The remote API was unreachable when the mutation was recorded
    Offline,
    /// No pass settled the item: one was already running, or the store failed
    Deferred,
    Settled(ItemSettlement),
}

/// A recorded mutation and the outcome of the immediate delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMutation {
    /// Queue row as inserted
    pub item: SyncQueueItem,
    pub delivery: ImmediateDelivery,
}

/// Records mutations unconditionally and delivers them whenever the probe
/// reports the remote API reachable.
pub struct SyncManager<R, P> {
    recorder: ChangeRecorder,
    processor: Arc<SyncProcessor<R>>,
    probe: P,
}

impl<R: RemoteApi, P: ConnectivityProbe> SyncManager<R, P> {
    pub fn new(queue: SyncQueueService, remote: R, probe: P) -> Self {
        Self {
            recorder: ChangeRecorder::new(queue.clone()),
            processor: Arc::new(SyncProcessor::new(queue, remote)),
            probe,
        }
    }

    pub const fn recorder(&self) -> &ChangeRecorder {
        &self.recorder
    }

    pub const fn processor(&self) -> &Arc<SyncProcessor<R>> {
        &self.processor
    }

    /// Queue a mutation, then try to deliver right away if online.
    ///
    /// Delivery problems are left to the queue; only recording errors are
    /// returned.
    pub async fn record_mutation<E: SyncEntity>(
        &self,
        entity: &E,
        action: SyncAction,
    ) -> Result<RecordedMutation> {
        let item = self.recorder.record(entity, action).await?;
        let delivery = self.deliver_if_online(&item).await;
        Ok(RecordedMutation { item, delivery })
    }

    /// Queue a raw JSON snapshot, then try to deliver right away if online.
    pub async fn record_snapshot(
        &self,
        entity_type: EntityType,
        action: SyncAction,
        data: &str,
    ) -> Result<RecordedMutation> {
        let item = self.recorder.record_json(entity_type, action, data).await?;
        let delivery = self.deliver_if_online(&item).await;
        Ok(RecordedMutation { item, delivery })
    }

    async fn deliver_if_online(&self, item: &SyncQueueItem) -> ImmediateDelivery {
        if !self.probe.is_online().await {
            tracing::debug!(item_id = item.id, "Offline; mutation left queued");
            return ImmediateDelivery::Offline;
        }
        match self
            .processor
            .process_queue_for(SyncTrigger::LocalMutation, item.id)
            .await
        {
            Ok((_, Some(settlement))) => ImmediateDelivery::Settled(settlement),
            Ok((_, None)) => ImmediateDelivery::Deferred,
            Err(error) => {
                tracing::error!("Immediate sync after local mutation failed: {error}");
                ImmediateDelivery::Deferred
            }
        }
    }

    /// Run a manual pass.
    pub async fn sync_now(&self) -> Result<PassOutcome> {
        self.processor.process_queue(SyncTrigger::Manual).await
    }
}

impl<R: RemoteApi, P: ConnectivityProbe + Clone> SyncManager<R, P> {
    /// Build a reconnect monitor sharing this manager's processor.
    pub fn monitor(&self, interval: Duration) -> ConnectivityMonitor<R, P> {
        ConnectivityMonitor::new(Arc::clone(&self.processor), self.probe.clone(), interval)
    }
}
