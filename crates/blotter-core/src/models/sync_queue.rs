//! Sync queue item model

use serde::{Deserialize, Serialize};

use super::entity::{EntityType, SyncAction, SyncEntity};
use crate::error::Result;

/// Retry ceiling for a queue item. Once `retry_count` has reached this value a
/// further failure drops the item instead of retrying it.
pub const MAX_RETRIES: u32 = 3;

/// A pending local mutation waiting to be delivered to the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueItem {
    /// Auto-generated row id; also the queue read order
    pub id: i64,
    /// Stored entity type name. Kept raw so rows written by newer clients
    /// remain readable; see [`SyncQueueItem::entity_kind`].
    pub entity_type: String,
    pub entity_id: String,
    pub action: SyncAction,
    /// JSON snapshot of the entity at mutation time
    pub data: String,
    pub retry_count: u32,
    pub last_error: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Delivered during the current pass, awaiting bulk removal
    pub synced: bool,
}

impl SyncQueueItem {
    /// Parsed entity type, or `None` when the stored name is not recognized.
    pub fn entity_kind(&self) -> Option<EntityType> {
        self.entity_type.parse().ok()
    }

    /// Whether a further retryable failure would drop this item.
    pub const fn retries_exhausted(&self) -> bool {
        self.retry_count >= MAX_RETRIES
    }
}

/// Insert shape for a queue item; id, counters and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQueueItem {
    pub entity_type: String,
    pub entity_id: String,
    pub action: SyncAction,
    pub data: String,
}

impl NewQueueItem {
    /// Snapshot a record for the queue.
    pub fn from_entity<E: SyncEntity>(entity: &E, action: SyncAction) -> Result<Self> {
        Ok(Self {
            entity_type: E::ENTITY_TYPE.as_str().to_string(),
            entity_id: entity.entity_id(),
            action,
            data: serde_json::to_string(entity)?,
        })
    }
}
