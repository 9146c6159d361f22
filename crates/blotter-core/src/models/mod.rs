//! Data models for Blotter

mod entity;
mod records;
mod sync_queue;

pub use entity::{EntityType, SyncAction, SyncEntity, SyncPayload};
pub use records::{
    BlotterReport, Evidence, Hearing, PersonHistory, Resolution, Respondent, Suspect, User,
    Witness,
};
pub use sync_queue::{NewQueueItem, SyncQueueItem, MAX_RETRIES};
