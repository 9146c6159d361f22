//! Database layer for Blotter

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{SqliteSyncQueueRepository, SyncQueueRepository};
