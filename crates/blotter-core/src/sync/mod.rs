//! Offline sync: recording local mutations and delivering them to the remote API.

mod connectivity;
mod manager;
mod processor;
mod recorder;

pub use connectivity::{ConnectivityMonitor, ConnectivityProbe};
pub use manager::{ImmediateDelivery, RecordedMutation, SyncManager};
pub use processor::{ItemSettlement, PassOutcome, PassSummary, SyncProcessor, SyncTrigger};
pub use recorder::ChangeRecorder;

#[cfg(test)]
pub(crate) mod testing;
