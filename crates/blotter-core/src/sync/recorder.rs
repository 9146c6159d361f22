//! Recording local mutations into the sync queue.

use crate::models::{EntityType, NewQueueItem, SyncAction, SyncEntity, SyncPayload, SyncQueueItem};
use crate::services::SyncQueueService;
use crate::{Error, Result};

/// Insert-only handle on the queue for code that mutates local records.
#[derive(Clone)]
pub struct ChangeRecorder {
    queue: SyncQueueService,
}

impl ChangeRecorder {
    pub const fn new(queue: SyncQueueService) -> Self {
        Self { queue }
    }

    /// Snapshot `entity` and queue it for delivery.
    pub async fn record<E: SyncEntity>(&self, entity: &E, action: SyncAction) -> Result<SyncQueueItem> {
        let item = NewQueueItem::from_entity(entity, action)?;
        let queued = self.queue.enqueue(&item).await?;
        tracing::debug!(
            item_id = queued.id,
            entity_type = %E::ENTITY_TYPE,
            entity_id = %queued.entity_id,
            %action,
            "Recorded local mutation"
        );
        Ok(queued)
    }

    /// Queue a raw JSON snapshot after checking it decodes as `entity_type`.
    pub async fn record_json(
        &self,
        entity_type: EntityType,
        action: SyncAction,
        data: &str,
    ) -> Result<SyncQueueItem> {
        let payload = SyncPayload::decode(entity_type, data).map_err(|error| {
            Error::InvalidInput(format!("snapshot is not a valid {entity_type} record: {error}"))
        })?;

        let item = NewQueueItem {
            entity_type: entity_type.as_str().to_string(),
            entity_id: payload.entity_id(),
            action,
            data: data.trim().to_string(),
        };
        self.queue.enqueue(&item).await
    }
}
