//! blotter-core - Core library for Blotter
//!
//! This crate contains the entity records, the local sync queue store, the
//! remote delivery contract, and the sync processor shared by every Blotter
//! client.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{EntityType, SyncAction, SyncPayload, SyncQueueItem};
