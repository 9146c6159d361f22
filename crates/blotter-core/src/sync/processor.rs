//! Sync queue processor.
//!
//! A pass reads every pending item once, delivers them strictly one after
//! another, and settles each item independently:
//!
//! - delivered: flagged synced, then bulk-removed when the pass ends
//! - any failure other than a remote rejection: `retry_count + 1` and
//!   `last_error` persisted, unless the count had already reached
//!   [`MAX_RETRIES`], in which case it is dropped. Unknown entity types and
//!   undecodable snapshots take this path too.
//! - remote rejection: dropped immediately
//!
//! Only one pass runs at a time per processor; an overlapping call returns
//! [`PassOutcome::AlreadyRunning`] without touching the queue.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use uuid::Uuid;

use crate::models::{SyncPayload, SyncQueueItem, MAX_RETRIES};
use crate::remote::{DeliveryError, DeliveryResult, RemoteApi, RetryClass};
use crate::services::SyncQueueService;
use crate::Result;

/// What started a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    Startup,
    Reconnected,
    Manual,
    LocalMutation,
}

impl fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Startup => "startup",
            Self::Reconnected => "reconnected",
            Self::Manual => "manual",
            Self::LocalMutation => "local_mutation",
        })
    }
}

/// Per-pass counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub attempted: usize,
    pub delivered: usize,
    pub retried: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Completed(PassSummary),
    /// Another pass held the processor; nothing was done
    AlreadyRunning,
}

/// How a single queue item left a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSettlement {
    Delivered,
    Retried,
    Dropped,
}

/// Delivers queued mutations to a [`RemoteApi`].
pub struct SyncProcessor<R> {
    queue: SyncQueueService,
    remote: R,
    in_progress: AtomicBool,
}

impl<R: RemoteApi> SyncProcessor<R> {
    pub const fn new(queue: SyncQueueService, remote: R) -> Self {
        Self {
            queue,
            remote,
            in_progress: AtomicBool::new(false),
        }
    }

    pub const fn queue(&self) -> &SyncQueueService {
        &self.queue
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Whether a pass is currently running.
    pub fn is_processing(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Run one pass over the pending queue.
    ///
    /// Delivery failures never surface here; they only change the queue.
    /// Errors returned are local store failures, which abort the pass.
    pub async fn process_queue(&self, trigger: SyncTrigger) -> Result<PassOutcome> {
        self.run_pass(trigger, |_, _| {}).await
    }

    /// Run one pass and report how `item_id` settled, if the pass reached it.
    pub async fn process_queue_for(
        &self,
        trigger: SyncTrigger,
        item_id: i64,
    ) -> Result<(PassOutcome, Option<ItemSettlement>)> {
        let mut settled = None;
        let outcome = self
            .run_pass(trigger, |id, settlement| {
                if id == item_id {
                    settled = Some(settlement);
                }
            })
            .await?;
        Ok((outcome, settled))
    }

    async fn run_pass(
        &self,
        trigger: SyncTrigger,
        mut on_settled: impl FnMut(i64, ItemSettlement) + Send,
    ) -> Result<PassOutcome> {
        let Some(_guard) = PassGuard::acquire(&self.in_progress) else {
            tracing::debug!(%trigger, "Sync pass already in progress; skipping");
            return Ok(PassOutcome::AlreadyRunning);
        };

        let items = self.queue.list_pending().await?;
        if items.is_empty() {
            tracing::debug!(%trigger, "Sync queue empty");
            return Ok(PassOutcome::Completed(PassSummary::default()));
        }

        let pass_id = Uuid::now_v7();
        tracing::info!(%pass_id, %trigger, pending = items.len(), "Starting sync pass");

        let mut summary = PassSummary::default();
        for item in &items {
            summary.attempted += 1;
            let settlement = match self.deliver(item).await {
                Ok(()) => {
                    self.queue.mark_synced(item.id).await?;
                    tracing::debug!(
                        %pass_id,
                        item_id = item.id,
                        entity_type = %item.entity_type,
                        entity_id = %item.entity_id,
                        "Delivered queue item"
                    );
                    ItemSettlement::Delivered
                }
                Err(error) => self.settle_failure(item, &error).await?,
            };
            match settlement {
                ItemSettlement::Delivered => summary.delivered += 1,
                ItemSettlement::Retried => summary.retried += 1,
                ItemSettlement::Dropped => summary.dropped += 1,
            }
            on_settled(item.id, settlement);
        }

        let removed = self.queue.delete_synced().await?;
        tracing::info!(
            %pass_id,
            attempted = summary.attempted,
            delivered = summary.delivered,
            retried = summary.retried,
            dropped = summary.dropped,
            removed,
            "Sync pass finished"
        );

        Ok(PassOutcome::Completed(summary))
    }

    /// Route a decoded payload to its create call.
    pub async fn dispatch(&self, payload: &SyncPayload) -> DeliveryResult {
        match payload {
            SyncPayload::User(user) => self.remote.register_user(user).await,
            SyncPayload::Report(report) => self.remote.create_report(report).await,
            SyncPayload::Respondent(respondent) => {
                self.remote.create_respondent(respondent).await
            }
            SyncPayload::Suspect(suspect) => self.remote.create_suspect(suspect).await,
            SyncPayload::Witness(witness) => self.remote.create_witness(witness).await,
            SyncPayload::Evidence(evidence) => self.remote.create_evidence(evidence).await,
            SyncPayload::Hearing(hearing) => self.remote.create_hearing(hearing).await,
            SyncPayload::Resolution(resolution) => {
                self.remote.create_resolution(resolution).await
            }
            SyncPayload::PersonHistory(history) => {
                self.remote.create_person_history(history).await
            }
        }
    }

    async fn deliver(&self, item: &SyncQueueItem) -> DeliveryResult {
        let Some(kind) = item.entity_kind() else {
            return Err(DeliveryError::UnknownEntityType(item.entity_type.clone()));
        };
        let payload = SyncPayload::decode(kind, &item.data)
            .map_err(|error| DeliveryError::Decode(error.to_string()))?;
        self.dispatch(&payload).await
    }

    async fn settle_failure(
        &self,
        item: &SyncQueueItem,
        error: &DeliveryError,
    ) -> Result<ItemSettlement> {
        let message = error.to_string();

        match error.retry_class() {
            RetryClass::Permanent => {
                tracing::warn!(
                    item_id = item.id,
                    entity_type = %item.entity_type,
                    entity_id = %item.entity_id,
                    "Dropping queue item rejected by the remote API: {message}"
                );
                self.queue.delete(item.id).await?;
                Ok(ItemSettlement::Dropped)
            }
            RetryClass::Retryable if item.retries_exhausted() => {
                tracing::warn!(
                    item_id = item.id,
                    entity_type = %item.entity_type,
                    entity_id = %item.entity_id,
                    retry_count = item.retry_count,
                    "Dropping queue item after {MAX_RETRIES} retries: {message}"
                );
                self.queue.delete(item.id).await?;
                Ok(ItemSettlement::Dropped)
            }
            RetryClass::Retryable => {
                let retry_count = item.retry_count + 1;
                tracing::info!(
                    item_id = item.id,
                    entity_type = %item.entity_type,
                    retry_count,
                    "Delivery failed, will retry: {message}"
                );
                self.queue.record_retry(item.id, retry_count, &message).await?;
                Ok(ItemSettlement::Retried)
            }
        }
    }
}

/// Holds the in-progress flag for the lifetime of a pass.
struct PassGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PassGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
