//! Shared sync queue store wrapper used across clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{Database, SqliteSyncQueueRepository, SyncQueueRepository};
use crate::models::{NewQueueItem, SyncQueueItem};
use crate::Result;

/// Thread-safe service for queue store operations.
///
/// Each call takes the database lock for the duration of one repository
/// operation only, so callers never hold it across network I/O.
#[derive(Clone)]
pub struct SyncQueueService {
    db: Arc<Mutex<Database>>,
    db_path: Option<PathBuf>,
}

impl SyncQueueService {
    /// Open the queue store at the given filesystem path.
    ///
    /// A file that is not a `SQLite` database is moved aside and the store is
    /// recreated once.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = match Database::open(&db_path) {
            Ok(db) => db,
            Err(error) if Self::is_corrupted_db_error(&error) => {
                tracing::warn!(
                    "Local queue store at {} is unreadable: {}. Moving it aside and recreating.",
                    db_path.display(),
                    error
                );
                Self::quarantine_corrupted_db_files(&db_path)?;
                Database::open(&db_path)?
            }
            Err(error) => return Err(error),
        };

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory queue store (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            db_path: None,
        })
    }

    /// Filesystem location of the store, if file-backed.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn is_corrupted_db_error(error: &crate::Error) -> bool {
        let message = error.to_string().to_ascii_lowercase();
        message.contains("file is not a database") || message.contains("malformed")
    }

    fn quarantine_corrupted_db_files(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            let timestamp = chrono::Utc::now().timestamp_millis();
            let base_name = db_path
                .file_name()
                .map_or_else(|| "blotter.db".into(), |name| name.to_string_lossy());
            let backup_path = db_path.with_file_name(format!("{base_name}.corrupt-{timestamp}"));

            std::fs::rename(db_path, &backup_path)?;
            tracing::warn!(
                "Moved corrupted local DB file from {} to {}",
                db_path.display(),
                backup_path.display()
            );
        }

        let Some(parent) = db_path.parent() else {
            return Ok(());
        };
        let Some(base_name) = db_path.file_name().and_then(|name| name.to_str()) else {
            return Ok(());
        };
        // WAL and shared-memory sidecars belong to the old file
        let sidecars = [format!("{base_name}-wal"), format!("{base_name}-shm")];

        for sidecar in sidecars {
            let path = parent.join(sidecar);
            if path.is_file() {
                std::fs::remove_file(&path)?;
                tracing::warn!("Removed stale sidecar file {}", path.display());
            }
        }

        Ok(())
    }

    /// Insert a new pending item.
    pub async fn enqueue(&self, item: &NewQueueItem) -> Result<SyncQueueItem> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.enqueue(item)
    }

    /// Fetch an item by id.
    pub async fn get(&self, id: i64) -> Result<Option<SyncQueueItem>> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.get(id)
    }

    /// List undelivered items in queue order.
    pub async fn list_pending(&self) -> Result<Vec<SyncQueueItem>> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.list_pending()
    }

    /// Count undelivered rows.
    pub async fn count(&self) -> Result<usize> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.count()
    }

    /// Flag an item as delivered.
    pub async fn mark_synced(&self, id: i64) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.mark_synced(id)
    }

    /// Persist a retry count and its error.
    pub async fn record_retry(&self, id: i64, retry_count: u32, error: &str) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.record_retry(id, retry_count, error)
    }

    /// Remove an item.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.delete(id)
    }

    /// Remove every delivered item.
    pub async fn delete_synced(&self) -> Result<usize> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.delete_synced()
    }

    /// Remove every item.
    pub async fn clear(&self) -> Result<usize> {
        let db = self.db.lock().await;
        let repo = SqliteSyncQueueRepository::new(db.connection());
        repo.clear()
    }
}
