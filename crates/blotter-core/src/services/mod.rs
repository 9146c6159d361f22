//! Shared services used across clients.

mod sync_queue;

pub use sync_queue::SyncQueueService;
